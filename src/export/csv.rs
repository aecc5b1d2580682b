//! Single-row spreadsheet export.

use csv::Writer;
use secrecy::ExposeSecret;

use super::ExportError;
use crate::ensemble::ClassifierName;
use crate::report::Report;

/// Suggested download name.
pub const CSV_FILE_NAME: &str = "password_result.csv";

/// Leading characters spreadsheet applications evaluate as a formula.
const FORMULA_TRIGGERS: [char; 6] = ['=', '+', '-', '@', '\t', '\r'];

/// Prefixes `'` to a cell that would otherwise be read as a formula.
fn neutralize_formula(cell: String) -> String {
    if cell.starts_with(FORMULA_TRIGGERS) {
        format!("'{}", cell)
    } else {
        cell
    }
}

/// Renders a header row and one data row:
/// `Password`, one column per classifier in fixed order, `Timestamp`.
///
/// Text cells starting with `=`, `+`, `-`, `@`, tab or carriage return get
/// a leading `'` so spreadsheet applications show them as text.
pub fn report_to_csv(report: &Report) -> Result<Vec<u8>, ExportError> {
    let mut wtr = Writer::from_writer(vec![]);

    let mut header = vec!["Password"];
    header.extend(ClassifierName::ALL.iter().map(|n| n.as_str()));
    header.push("Timestamp");
    wtr.write_record(&header)?;

    let mut row = vec![neutralize_formula(report.password().expose_secret().to_string())];
    row.extend(
        report
            .predictions()
            .iter()
            .map(|(_, p)| neutralize_formula(p.to_string())),
    );
    row.push(report.formatted_timestamp());
    wtr.write_record(&row)?;

    let data = wtr.into_inner().map_err(|e| e.into_error())?;
    Ok(data)
}
