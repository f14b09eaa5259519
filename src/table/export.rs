//! Export projection of a table and its CSV/JSON writers

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use super::errors::ExportError;
use super::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn as_str(&self) -> &str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }

    pub fn file_extension(&self) -> &str {
        self.as_str()
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            other => Err(ExportError::UnknownFormat(other.to_string())),
        }
    }
}

/// Rows projected onto the exported columns, headed by column labels.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl ExportTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), ExportError> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(&self.headers)?;
        for row in &self.rows {
            wtr.write_record(row.iter().map(|v| v.to_string()))?;
        }
        wtr.flush()?;
        Ok(())
    }

    /// Array of objects keyed by column label, keys in column order
    pub fn write_json<W: Write>(&self, writer: W) -> Result<(), ExportError> {
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    pub fn write<W: Write>(&self, writer: W, format: ExportFormat) -> Result<(), ExportError> {
        match format {
            ExportFormat::Csv => self.write_csv(writer),
            ExportFormat::Json => self.write_json(writer),
        }
    }

    pub fn write_to_path(&self, path: &Path, format: ExportFormat) -> Result<(), ExportError> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.write(&mut writer, format)?;
        writer.flush()?;
        Ok(())
    }

    pub fn to_csv_string(&self) -> Result<String, ExportError> {
        let mut buf = Vec::new();
        self.write_csv(&mut buf)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

impl Serialize for ExportTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.rows.len()))?;
        for row in &self.rows {
            seq.serialize_element(&RowObject {
                headers: &self.headers,
                values: row,
            })?;
        }
        seq.end()
    }
}

struct RowObject<'a> {
    headers: &'a [String],
    values: &'a [Value],
}

impl Serialize for RowObject<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.headers.len()))?;
        for (header, value) in self.headers.iter().zip(self.values) {
            map.serialize_entry(header, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample() -> ExportTable {
        ExportTable {
            headers: vec!["Invoice".to_string(), "Price".to_string()],
            rows: vec![
                vec![Value::from("INV-001"), Value::from(2500.0)],
                vec![Value::from("INV, 002"), Value::from(91.2)],
            ],
        }
    }

    #[test]
    fn test_csv_quotes_fields_with_separators() {
        let csv = sample().to_csv_string().unwrap();
        assert_eq!(csv, "Invoice,Price\nINV-001,2500\n\"INV, 002\",91.2\n");
    }

    #[test]
    fn test_json_keeps_column_order_and_raw_values() {
        let mut buf = Vec::new();
        sample().write_json(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.find("\"Invoice\"").unwrap() < text.find("\"Price\"").unwrap());

        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed[0]["Price"], serde_json::json!(2500.0));
        assert_eq!(parsed[1]["Invoice"], serde_json::json!("INV, 002"));
    }

    #[test]
    fn test_write_to_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("export.csv");
        sample().write_to_path(&path, ExportFormat::Csv).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("Invoice,Price"));
    }

    #[test]
    fn test_parse_format() {
        assert_eq!("CSV".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert!("xlsx".parse::<ExportFormat>().is_err());
    }
}
