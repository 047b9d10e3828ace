use monitor_core::{BreachRow, MonitorError};
use std::fs::File;
use std::io::Read;
use std::path::Path;

const BREACH_PREFIX: &str = "breach";

/// A cell is truthy when it reads `TRUE` (case and surrounding whitespace ignored).
pub fn is_truthy(cell: &str) -> bool {
    cell.trim().eq_ignore_ascii_case("true")
}

/// Breach table as named text columns, whether built in memory or read back from disk.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BreachTable {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl BreachTable {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { columns, rows }
    }

    pub fn from_rows(rows: &[BreachRow]) -> Self {
        Self {
            columns: BreachRow::COLUMNS.iter().map(|c| c.to_string()).collect(),
            rows: rows.iter().map(BreachRow::cells).collect(),
        }
    }

    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, MonitorError> {
        let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
        let columns = rdr.headers()?.iter().map(|h| h.trim().to_string()).collect();
        let mut rows = Vec::new();
        for record in rdr.records() {
            rows.push(record?.iter().map(|c| c.to_string()).collect());
        }
        Ok(Self { columns, rows })
    }

    pub fn from_path(path: &Path) -> Result<Self, MonitorError> {
        Self::from_csv_reader(File::open(path)?)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[String]> + '_ {
        self.rows.iter().map(|r| r.as_slice())
    }

    fn index_of(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    /// Non-blank cell text of `column` in row `row`.
    pub fn cell(&self, row: usize, column: &str) -> Option<&str> {
        let idx = self.index_of(column)?;
        self.rows
            .get(row)?
            .get(idx)
            .map(|c| c.trim())
            .filter(|c| !c.is_empty())
    }

    /// Every column whose name starts with `breach`, in table order.
    pub fn breach_columns(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.starts_with(BREACH_PREFIX))
            .map(|c| c.as_str())
            .collect()
    }

    /// Names of the breach columns that are explicitly true in row `row`.
    /// Blank or unparseable cells count as false here.
    pub fn breached_in(&self, row: usize) -> Vec<&str> {
        self.breach_columns()
            .into_iter()
            .filter(|col| self.cell(row, col).map(is_truthy).unwrap_or(false))
            .collect()
    }

    /// True when any cell of the row, in any column, is truthy.
    pub fn row_has_true(&self, row: usize) -> bool {
        self.rows
            .get(row)
            .map(|cells| cells.iter().any(|c| is_truthy(c)))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truthy_cells() {
        assert!(is_truthy("TRUE"));
        assert!(is_truthy(" true "));
        assert!(!is_truthy("FALSE"));
        assert!(!is_truthy(""));
        assert!(!is_truthy("1"));
    }

    #[test]
    fn test_breached_in_ignores_blank_cells() {
        let csv = "metric,breach_1d,breach_10d,breach_custom,note\n\
                   a,,TRUE,,x\n\
                   b,,,,\n\
                   c,FALSE,false,True,\n";
        let table = BreachTable::from_csv_reader(csv.as_bytes()).unwrap();
        assert_eq!(table.breach_columns(), vec!["breach_1d", "breach_10d", "breach_custom"]);
        assert_eq!(table.breached_in(0), vec!["breach_10d"]);
        assert!(table.breached_in(1).is_empty());
        assert_eq!(table.breached_in(2), vec!["breach_custom"]);
        assert_eq!(table.cell(1, "note"), None);
    }

    #[test]
    fn test_from_rows_keeps_report_columns() {
        let rows = vec![BreachRow::new("m", "t").with_one_day(None, "±1bp", Some(true))];
        let table = BreachTable::from_rows(&rows);
        assert_eq!(table.columns().len(), BreachRow::COLUMNS.len());
        assert_eq!(table.cell(0, "breach_1d"), Some("TRUE"));
        assert!(table.row_has_true(0));
    }
}
