use serde::{ser::SerializeMap, Serialize, Serializer};

use crate::process::coerce::{coerce, Value};

/// One data row: a cell per header, in header order.
///
/// Header names are kept as the file spells them; duplicates are allowed and
/// lookups see the first one.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    cells: Vec<(String, Value)>,
}

impl Row {
    /// Build a row from header names and raw fields. Missing trailing fields
    /// become `""`; extra fields are dropped.
    pub fn from_fields(headers: &[String], fields: &[String]) -> Self {
        let cells = headers
            .iter()
            .enumerate()
            .map(|(i, header)| {
                let raw = fields.get(i).map(String::as_str).unwrap_or("");
                (header.clone(), coerce(raw))
            })
            .collect();
        Row { cells }
    }

    pub fn from_cells<K, V, I>(cells: I) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        Row {
            cells: cells
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn cells(&self) -> &[(String, Value)] {
        &self.cells
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(k, _)| k.as_str())
    }

    /// Exact-name lookup; first occurrence wins.
    pub fn get(&self, header: &str) -> Option<&Value> {
        self.cells
            .iter()
            .find(|(k, _)| k == header)
            .map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (k, v) in &self.cells {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// The normalised sheet: header names plus typed rows.
///
/// Built once per ingestion and replaced wholesale on refresh.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct RawTable {
    /// Column names from the first non-blank line.
    pub headers: Vec<String>,
    /// Each data line, coerced against `headers`.
    pub rows: Vec<Row>,
}

impl RawTable {
    /// Assemble a table from tokenized records; the first record is the header.
    pub fn from_records(records: Vec<Vec<String>>) -> Self {
        let mut records = records.into_iter();
        let headers = match records.next() {
            Some(h) => h,
            None => return RawTable::default(),
        };
        let rows = records
            .map(|fields| Row::from_fields(&headers, &fields))
            .collect();
        RawTable { headers, rows }
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty() && self.rows.is_empty()
    }

    /// Same headers, only the rows accepted by `keep`.
    pub fn filtered<F>(&self, mut keep: F) -> RawTable
    where
        F: FnMut(&Row) -> bool,
    {
        RawTable {
            headers: self.headers.clone(),
            rows: self.rows.iter().filter(|r| keep(r)).cloned().collect(),
        }
    }
}
