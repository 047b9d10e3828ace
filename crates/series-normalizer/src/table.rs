use crate::coerce::{parse_date, parse_number};
use chrono::NaiveDate;
use monitor_core::MonitorError;
use std::collections::HashMap;
use std::io::Read;

/// One spreadsheet cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Number(f64),
    Text(String),
    Date(NaiveDate),
}

impl Cell {
    /// Type a raw CSV field the way a spreadsheet would: plain numbers and ISO dates
    /// become typed cells, everything else stays text.
    pub fn from_field(field: &str) -> Self {
        let trimmed = field.trim();
        if trimmed.is_empty() {
            return Cell::Empty;
        }
        if let Ok(v) = trimmed.parse::<f64>() {
            if v.is_finite() {
                return Cell::Number(v);
            }
        }
        if let Ok(d) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
            return Cell::Date(d);
        }
        Cell::Text(field.to_string())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(v) if v.is_finite() => Some(*v),
            Cell::Text(s) => parse_number(s),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Cell::Date(d) => Some(*d),
            Cell::Text(s) => parse_date(s),
            Cell::Number(v) if v.fract() == 0.0 && *v > 0.0 => parse_date(&format!("{}", *v as i64)),
            _ => None,
        }
    }

    /// Text used when the cell serves as a column name.
    pub fn label(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Number(v) => v.to_string(),
            Cell::Text(s) => s.clone(),
            Cell::Date(d) => d.format("%Y-%m-%d").to_string(),
        }
    }
}

/// Header-less grid of cells, rows padded to a common width.
#[derive(Debug, Clone, Default)]
pub struct Table {
    rows: Vec<Vec<Cell>>,
    width: usize,
}

impl Table {
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Self {
        let width = rows.iter().map(|r| r.len()).max().unwrap_or(0);
        let rows = rows
            .into_iter()
            .map(|mut r| {
                r.resize(width, Cell::Empty);
                r
            })
            .collect();
        Self { rows, width }
    }

    /// Read every CSV record as data; no row is assumed to be the header.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, MonitorError> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut rows = Vec::new();
        for record in rdr.records() {
            let record = record?;
            rows.push(record.iter().map(Cell::from_field).collect());
        }
        Ok(Self::from_rows(rows))
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Promote `header_row` to column names and keep the rows below it.
    pub fn with_header(&self, header_row: usize) -> Frame {
        let names: Vec<String> = self
            .rows
            .get(header_row)
            .map(|r| r.iter().map(Cell::label).collect())
            .unwrap_or_else(|| vec![String::new(); self.width]);

        let rows = self.rows.iter().skip(header_row + 1).cloned().collect();
        Frame {
            columns: clean_names(&names),
            rows,
        }
    }
}

/// Named columns over data rows.
#[derive(Debug, Clone, Default)]
pub struct Frame {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Frame {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn column(&self, idx: usize) -> impl Iterator<Item = &Cell> + '_ {
        self.rows.iter().map(move |r| r.get(idx).unwrap_or(&Cell::Empty))
    }

    pub fn head(&self, n: usize) -> Frame {
        Frame {
            columns: self.columns.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }
}

/// Collapse whitespace, trim, then suffix repeats with `.1`, `.2`, …
pub fn clean_names(names: &[String]) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    names
        .iter()
        .map(|raw| {
            let name = raw.split_whitespace().collect::<Vec<_>>().join(" ");
            let count = seen.entry(name.clone()).or_insert(0);
            let out = if *count == 0 {
                name
            } else {
                format!("{}.{}", name, count)
            };
            *count += 1;
            out
        })
        .collect()
}
