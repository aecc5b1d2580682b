//! Export formats
//!
//! Each format renders a [`Report`](crate::Report) into bytes; writing them
//! anywhere is the caller's job.

mod csv;
mod pdf;

use thiserror::Error;

pub use self::csv::{CSV_FILE_NAME, report_to_csv};
pub use self::pdf::{PDF_FILE_NAME, report_to_pdf};

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to write CSV: {0}")]
    Csv(#[from] ::csv::Error),
    #[error("Failed to render PDF: {0}")]
    Pdf(#[from] printpdf::Error),
    #[error("{field} contains characters the PDF font cannot encode")]
    Unencodable { field: String },
    #[error("Export I/O error: {0}")]
    Io(#[from] std::io::Error),
}
