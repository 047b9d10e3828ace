use chrono::{DateTime, NaiveDate, NaiveDateTime};

const MISSING_TOKENS: [&str; 8] = ["", "-", "—", "–", "_", "nan", "NaN", "None"];

const DATE_FORMATS: [&str; 5] = ["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d", "%Y%m%d", "%m/%d/%Y"];

const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// Parse a loosely formatted number.
///
/// `"1,234.56"` → 1234.56, `"(123)"` → -123, `"5.2%"` → 0.052. Placeholders and
/// anything non-numeric yield `None`.
pub fn parse_number(raw: &str) -> Option<f64> {
    let s = raw.trim();
    if MISSING_TOKENS.contains(&s) {
        return None;
    }

    let (negative, body) = match s.strip_prefix('(').and_then(|r| r.strip_suffix(')')) {
        Some(inner) => (true, inner.trim()),
        None => (false, s),
    };

    let cleaned: String = body.chars().filter(|c| *c != ',').collect();
    let (percent, digits) = match cleaned.strip_suffix('%') {
        Some(d) => (true, d.trim_end()),
        None => (false, cleaned.as_str()),
    };

    let mut value = digits.parse::<f64>().ok().filter(|v| v.is_finite())?;
    if negative {
        value = -value.abs();
    }
    if percent {
        value /= 100.0;
    }
    Some(value)
}

/// Parse a date in any of the accepted layouts; time components are dropped.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive())
}
