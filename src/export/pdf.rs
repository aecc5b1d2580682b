//! Printable document export.

use printpdf::{BuiltinFont, Mm, PdfDocument};
use secrecy::ExposeSecret;

use super::ExportError;
use crate::report::Report;

/// Suggested download name.
pub const PDF_FILE_NAME: &str = "password_result.pdf";

const TITLE: &str = "Password Strength Report";
const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 10.0;
const LINE_HEIGHT: f32 = 10.0;

/// Characters Windows-1252 maps into 0x80..=0x9F.
const WIN_ANSI_EXTRAS: [char; 27] = [
    '€', '‚', 'ƒ', '„', '…', '†', '‡', 'ˆ', '‰', 'Š', '‹', 'Œ', 'Ž', '‘', '’', '“', '”', '•', '–',
    '—', '˜', '™', 'š', '›', 'œ', 'ž', 'Ÿ',
];

/// True when the builtin (WinAnsi-encoded) fonts can draw `c`.
fn is_win_ansi(c: char) -> bool {
    matches!(c, '\u{20}'..='\u{7e}' | '\u{a0}'..='\u{ff}') || WIN_ANSI_EXTRAS.contains(&c)
}

/// The builtin fonts drop anything outside WinAnsi without complaint, so
/// such text is refused up front.
fn check_encodable(field: &str, text: &str) -> Result<(), ExportError> {
    if text.chars().all(is_win_ansi) {
        return Ok(());
    }
    #[cfg(feature = "tracing")]
    tracing::error!("PDF export refused: {} is not WinAnsi-encodable", field);
    Err(ExportError::Unencodable {
        field: field.to_string(),
    })
}

/// Renders a one-page A4 document: title, password, timestamp, then one
/// `<classifier>: <result>` line per classifier.
///
/// # Errors
///
/// [`ExportError::Unencodable`] if the password or a prediction holds a
/// character the builtin Helvetica fonts cannot encode.
pub fn report_to_pdf(report: &Report) -> Result<Vec<u8>, ExportError> {
    check_encodable("Password", report.password().expose_secret())?;
    for (name, prediction) in report.predictions().iter() {
        check_encodable(name.as_str(), &prediction.to_string())?;
    }

    let (doc, page, layer) =
        PdfDocument::new(TITLE, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Report");
    let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;
    let regular = doc.add_builtin_font(BuiltinFont::Helvetica)?;
    let canvas = doc.get_page(page).get_layer(layer);

    // Helvetica bold at 16pt averages roughly 3.4mm per glyph
    let title_width = TITLE.len() as f32 * 3.4;
    let mut y = PAGE_HEIGHT - MARGIN - LINE_HEIGHT;
    canvas.use_text(TITLE, 16.0, Mm((PAGE_WIDTH - title_width) / 2.0), Mm(y), &bold);
    y -= LINE_HEIGHT * 2.0;

    let mut lines = vec![
        format!("Password: {}", report.password().expose_secret()),
        format!("Timestamp: {}", report.formatted_timestamp()),
        String::new(),
    ];
    lines.extend(
        report
            .predictions()
            .iter()
            .map(|(name, prediction)| format!("{}: {}", name, prediction)),
    );

    for line in lines {
        if !line.is_empty() {
            canvas.use_text(line, 12.0, Mm(MARGIN), Mm(y), &regular);
            y -= LINE_HEIGHT;
        } else {
            y -= LINE_HEIGHT / 2.0;
        }
    }

    let data = doc.save_to_bytes()?;
    Ok(data)
}
