//! Export of list views as delimited text or `.xlsx` workbooks.
//!
//! Both renderers are pure functions of the rows and columns they are
//! given. Delimited text does not quote or escape: a value containing the
//! delimiter or a newline corrupts its row.

use std::fmt::Write;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use rust_xlsxwriter::{Format, Workbook, XlsxError};
use thiserror::Error;

use crate::components::{Cells, TableColumn};

/// Errors from rendering or saving an export.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("spreadsheet error: {0}")]
    Xlsx(#[from] XlsxError),

    #[error("export too large: {0}")]
    TooLarge(String),

    #[error("export I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Output format of an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Delimited text with the given separator.
    Delimited(char),
    /// Single-sheet `.xlsx` workbook.
    Spreadsheet,
}

impl ExportFormat {
    /// Comma-separated values.
    pub const CSV: Self = Self::Delimited(',');

    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Delimited('\t') => "tsv",
            Self::Delimited(_) => "csv",
            Self::Spreadsheet => "xlsx",
        }
    }

    #[must_use]
    pub const fn content_type(self) -> &'static str {
        match self {
            Self::Delimited('\t') => "text/tab-separated-values",
            Self::Delimited(_) => "text/csv",
            Self::Spreadsheet => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
        }
    }
}

/// A rendered export ready to be saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Render rows as delimited text: a header line of column labels, then one
/// line per row. Empty cells are written as empty strings.
pub fn to_delimited_text<R: Cells>(rows: &[R], columns: &[TableColumn], delimiter: char) -> String {
    let separator = delimiter.to_string();
    let header: Vec<&str> = columns.iter().map(|c| c.label).collect();
    let mut out = header.join(&separator);
    out.push('\n');

    for row in rows {
        let line: Vec<String> = columns
            .iter()
            .map(|c| row.cell(c.key).unwrap_or_default())
            .collect();
        let _ = writeln!(out, "{}", line.join(&separator));
    }
    out
}

/// Render rows as a single-sheet `.xlsx` workbook.
///
/// Cells that parse as decimals are written as numbers, everything else as
/// text. The header row is bold.
///
/// # Errors
///
/// Returns [`ExportError::TooLarge`] past the worksheet limits and
/// [`ExportError::Xlsx`] if the workbook cannot be built.
pub fn to_spreadsheet<R: Cells>(rows: &[R], columns: &[TableColumn]) -> Result<Vec<u8>, ExportError> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Export")?;

    for (index, column) in columns.iter().enumerate() {
        worksheet.write_string_with_format(0, column_index(index)?, column.label, &bold)?;
    }

    for (index, row) in rows.iter().enumerate() {
        let row_number = u32::try_from(index + 1)
            .map_err(|_| ExportError::TooLarge(format!("{} rows", rows.len())))?;
        for (col, column) in columns.iter().enumerate() {
            let Some(value) = row.cell(column.key) else {
                continue;
            };
            let col = column_index(col)?;
            match value.parse::<Decimal>().ok().and_then(|d| d.to_f64()) {
                Some(number) => worksheet.write_number(row_number, col, number)?,
                None => worksheet.write_string(row_number, col, &value)?,
            };
        }
    }

    Ok(workbook.save_to_buffer()?)
}

fn column_index(index: usize) -> Result<u16, ExportError> {
    u16::try_from(index).map_err(|_| ExportError::TooLarge(format!("column {index}")))
}

/// Render rows in `format` as a file named `{base_name}.{ext}`.
///
/// # Errors
///
/// Returns [`ExportError`] if spreadsheet rendering fails.
pub fn export_rows<R: Cells>(
    rows: &[R],
    columns: &[TableColumn],
    format: ExportFormat,
    base_name: &str,
) -> Result<ExportFile, ExportError> {
    let bytes = match format {
        ExportFormat::Delimited(delimiter) => to_delimited_text(rows, columns, delimiter).into_bytes(),
        ExportFormat::Spreadsheet => to_spreadsheet(rows, columns)?,
    };
    tracing::debug!(rows = rows.len(), bytes = bytes.len(), format = format.extension(), "Rendered export");
    Ok(ExportFile {
        file_name: format!("{base_name}.{}", format.extension()),
        content_type: format.content_type(),
        bytes,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    struct Row(HashMap<&'static str, String>);

    impl Cells for Row {
        fn cell(&self, key: &str) -> Option<String> {
            self.0.get(key).cloned()
        }
    }

    const COLUMNS: &[TableColumn] = &[
        TableColumn::new("name", "Name"),
        TableColumn::new("price", "Price"),
    ];

    fn rows() -> Vec<Row> {
        vec![
            Row(HashMap::from([("name", "Lamp".to_string()), ("price", "19.99".to_string())])),
            Row(HashMap::from([("name", "Rug".to_string())])),
        ]
    }

    #[test]
    fn delimited_text_has_header_and_rows() {
        let text = to_delimited_text(&rows(), COLUMNS, ',');
        assert_eq!(text, "Name,Price\nLamp,19.99\nRug,\n");
        let tsv = to_delimited_text(&rows(), COLUMNS, '\t');
        assert!(tsv.starts_with("Name\tPrice\n"));
    }

    #[test]
    fn delimited_text_of_empty_view_is_header_only() {
        assert_eq!(to_delimited_text::<Row>(&[], COLUMNS, ';'), "Name;Price\n");
    }

    #[test]
    fn spreadsheet_is_a_zip_container() {
        let bytes = to_spreadsheet(&rows(), COLUMNS).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }

    #[test]
    fn export_file_naming() {
        let file = export_rows(&rows(), COLUMNS, ExportFormat::CSV, "products").unwrap();
        assert_eq!(file.file_name, "products.csv");
        assert_eq!(file.content_type, "text/csv");

        let file = export_rows(&rows(), COLUMNS, ExportFormat::Spreadsheet, "products").unwrap();
        assert_eq!(file.file_name, "products.xlsx");
    }
}
