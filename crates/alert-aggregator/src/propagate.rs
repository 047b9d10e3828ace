use crate::table::BreachTable;
use monitor_core::{Flag, MonitorError};
use serde::Serialize;
use std::io::Write;

pub const DEFAULT_START_INDICATOR: u32 = 500;
pub const DEFAULT_MAX_INDICATOR: u32 = 700;

/// Flag carried from one breach-table row to its indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RowFlag {
    pub indicator: u32,
    pub flag: Flag,
}

impl RowFlag {
    pub fn indicator_id(&self, prefix: &str) -> String {
        format!("{}{:03}", prefix, self.indicator)
    }
}

/// Map data row `i` to indicator `start + i` (stopping past `max`); `Y` when any cell of
/// the row is truthy, else `G`.
pub fn propagate_flags(table: &BreachTable, start: u32, max: u32) -> Vec<RowFlag> {
    (0..table.len())
        .map_while(|row| {
            let indicator = start.checked_add(u32::try_from(row).ok()?)?;
            if indicator > max {
                return None;
            }
            let flag = if table.row_has_true(row) { Flag::Y } else { Flag::G };
            Some(RowFlag { indicator, flag })
        })
        .collect()
}

pub fn write_row_flags<W: Write>(flags: &[RowFlag], prefix: &str, writer: W) -> Result<(), MonitorError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["indicator", "flag"])?;
    for f in flags {
        wtr.write_record([f.indicator_id(prefix).as_str(), f.flag.as_str()])?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(rows: usize) -> BreachTable {
        let columns = vec!["metric".to_string(), "breach_1d".to_string()];
        let rows = (0..rows)
            .map(|i| {
                let cell = if i % 2 == 0 { "TRUE" } else { "" };
                vec![format!("m{}", i), cell.to_string()]
            })
            .collect();
        BreachTable::new(columns, rows)
    }

    #[test]
    fn test_row_offsets_map_to_indicators() {
        let flags = propagate_flags(&table(3), 500, 700);
        assert_eq!(
            flags,
            vec![
                RowFlag { indicator: 500, flag: Flag::Y },
                RowFlag { indicator: 501, flag: Flag::G },
                RowFlag { indicator: 502, flag: Flag::Y },
            ]
        );
        assert_eq!(flags[1].indicator_id("IND"), "IND501");
    }

    #[test]
    fn test_stops_past_max_indicator() {
        let flags = propagate_flags(&table(10), 500, 503);
        assert_eq!(flags.len(), 4);
        assert_eq!(flags.last().map(|f| f.indicator), Some(503));
    }

    #[test]
    fn test_write_row_flags() {
        let mut buf = Vec::new();
        write_row_flags(&propagate_flags(&table(2), 7, 700), "IND", &mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "indicator,flag\nIND007,Y\nIND008,G\n");
    }
}
