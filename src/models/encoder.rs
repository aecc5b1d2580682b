//! Label encoder - class id to label name.

use serde::{Deserialize, Serialize};

use crate::ensemble::{LabelDecoder, PredictError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelEncoder {
    pub classes: Vec<String>,
}

impl LabelDecoder for LabelEncoder {
    fn decode(&self, class_id: usize) -> Result<String, PredictError> {
        self.classes
            .get(class_id)
            .cloned()
            .ok_or(PredictError::UnknownClass(class_id))
    }
}
