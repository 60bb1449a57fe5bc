// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Minimal CSV table with data-frame style cell typing.
//!
//! Cells keep their original text for matching and are typed only when a
//! row is rendered as JSON: integers become JSON integers, decimals become
//! floats, empty cells become `null` and everything else stays a string.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde_json::{Map, Number, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TableError {
    #[error("cannot open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("column '{0}' not found")]
    MissingColumn(String),
}

#[derive(Debug, Clone)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Load a CSV file whose first record is the header row.
    pub fn load(path: &Path) -> Result<Self, TableError> {
        let file = File::open(path).map_err(|source| TableError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, TableError> {
        let mut rdr = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);
        let headers = rdr.headers()?.iter().map(|h| h.trim().to_string()).collect();
        let rows = rdr
            .records()
            .map(|r| r.map(|rec| rec.iter().map(str::to_string).collect()))
            .collect::<Result<Vec<Vec<String>>, csv::Error>>()?;
        Ok(Self { headers, rows })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of the named column.
    pub fn column(&self, name: &str) -> Result<usize, TableError> {
        self.headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| TableError::MissingColumn(name.to_string()))
    }

    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        self.rows.iter().map(move |cells| Row { headers: &self.headers, cells })
    }
}

/// Borrowed view of one record.
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    headers: &'a [String],
    cells: &'a [String],
}

impl<'a> Row<'a> {
    /// Raw text of the cell at `col`; missing trailing cells read as empty.
    pub fn get(&self, col: usize) -> &'a str {
        self.cells.get(col).map(String::as_str).unwrap_or("")
    }

    /// The record as a JSON object keyed by header, with typed cells.
    pub fn to_json(&self) -> Value {
        let mut obj = Map::with_capacity(self.headers.len());
        for (i, h) in self.headers.iter().enumerate() {
            obj.insert(h.clone(), typed_cell(self.get(i)));
        }
        Value::Object(obj)
    }
}

fn typed_cell(raw: &str) -> Value {
    let t = raw.trim();
    if t.is_empty() {
        return Value::Null;
    }
    if let Ok(i) = t.parse::<i64>() {
        return Value::Number(i.into());
    }
    // Rust accepts "inf" and "NaN" as floats; those stay text.
    if let Some(n) = t.parse::<f64>().ok().filter(|f| f.is_finite()).and_then(Number::from_f64) {
        return Value::Number(n);
    }
    Value::String(raw.to_string())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    const ORDERS: &str = "id,customer,total,status,notes\n\
                          1001,Ana Pérez,59.90,enviado,\n\
                          1002,Luis Gómez,120,pendiente,\"frágil, con cuidado\"\n";

    #[test]
    fn cells_are_typed_like_a_data_frame() {
        let t = Table::from_reader(ORDERS.as_bytes()).unwrap();
        assert_eq!(t.len(), 2);
        let first = t.rows().next().unwrap().to_json();
        assert_eq!(
            first,
            json!({
                "id": 1001,
                "customer": "Ana Pérez",
                "total": 59.9,
                "status": "enviado",
                "notes": null
            })
        );
        let second = t.rows().nth(1).unwrap().to_json();
        assert_eq!(second["total"], 120);
        assert_eq!(second["notes"], "frágil, con cuidado");
    }

    #[test]
    fn raw_cell_text_is_kept_for_matching() {
        let t = Table::from_reader(ORDERS.as_bytes()).unwrap();
        let id = t.column("id").unwrap();
        let ids: Vec<&str> = t.rows().map(|r| r.get(id)).collect();
        assert_eq!(ids, vec!["1001", "1002"]);
    }

    #[test]
    fn missing_column_is_reported() {
        let t = Table::from_reader(ORDERS.as_bytes()).unwrap();
        let err = t.column("sku").unwrap_err();
        assert_eq!(err.to_string(), "column 'sku' not found");
    }

    #[test]
    fn non_finite_numbers_stay_text() {
        assert_eq!(typed_cell("NaN"), json!("NaN"));
        assert_eq!(typed_cell("inf"), json!("inf"));
        assert_eq!(typed_cell("-3"), json!(-3));
    }

    #[test]
    fn ragged_record_is_an_error() {
        let err = Table::from_reader("a,b\n1,2,3\n".as_bytes()).unwrap_err();
        assert!(matches!(err, TableError::Csv(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = Table::load(Path::new("/nonexistent/helpdesk/orders.csv")).unwrap_err();
        assert!(matches!(err, TableError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/helpdesk/orders.csv"));
    }
}
