use crate::{Error, Result};

pub const TEXT_COLUMN: &str = "text";
pub const MISSING_TEXT_COLUMN: &str = "CSV must contain a 'text' column.";

/// A parsed CSV upload: header row plus records. Ragged rows are kept as is.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl CsvTable {
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let content = std::str::from_utf8(bytes)
            .map_err(|e| Error::internal(format!("CSV is not valid UTF-8: {}", e)))?;

        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(content.as_bytes());

        let headers = reader.headers()?.iter().map(str::to_string).collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        Ok(Self { headers, rows })
    }

    pub fn text_column(&self) -> Option<usize> {
        self.headers.iter().position(|h| h == TEXT_COLUMN)
    }

    /// The `text` cell of every row, in order. Missing cells read as "".
    pub fn text_cells(&self) -> Result<Vec<String>> {
        let index = self
            .text_column()
            .ok_or_else(|| Error::bad_request(MISSING_TEXT_COLUMN))?;

        Ok(self
            .rows
            .iter()
            .map(|row| row.get(index).cloned().unwrap_or_default())
            .collect())
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .from_writer(Vec::new());

        writer.write_record(&self.headers)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }

        writer
            .into_inner()
            .map_err(|e| Error::internal(format!("failed to serialize CSV: {}", e)))
    }
}
