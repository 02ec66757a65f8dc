use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;

use super::sort::SortKey;

// ---------------------------------------------------------------------------
// Record – one financial period
// ---------------------------------------------------------------------------

/// One period's figures as delivered by the upstream provider.
///
/// Numeric fields are optional: a provider may omit a figure or send
/// something that is not a number. Such a record is still kept; it just
/// cannot satisfy a bound on the missing axis.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    #[serde(default, deserialize_with = "lenient_string")]
    pub date: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub revenue: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub net_income: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub gross_profit: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub eps: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub operating_income: Option<f64>,
}

impl Record {
    /// Shorthand used by tests and the sample generator.
    pub fn new(date: impl Into<String>, revenue: f64, net_income: f64) -> Self {
        Self {
            date: date.into(),
            revenue: Some(revenue),
            net_income: Some(net_income),
            ..Default::default()
        }
    }

    /// Calendar year of `date`, or `None` when the date does not parse.
    pub fn year(&self) -> Option<i32> {
        parse_date(&self.date).map(|d| d.year())
    }

    /// Numeric value of a sortable column. `Date` has no numeric value.
    pub fn numeric(&self, key: SortKey) -> Option<f64> {
        match key {
            SortKey::Date => None,
            SortKey::Revenue => self.revenue,
            SortKey::NetIncome => self.net_income,
        }
    }
}

/// Parse `YYYY-MM-DD`, optionally followed by a time part (`T...` or ` ...`).
/// The reduced ISO forms `YYYY-MM` and `YYYY` resolve to the first day of
/// the month or year.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if let Ok((date, rest)) = NaiveDate::parse_and_remainder(s, "%Y-%m-%d") {
        return (rest.is_empty() || rest.starts_with('T') || rest.starts_with(' '))
            .then_some(date);
    }

    let mut parts = s.split('-');
    let year = parts.next().filter(|y| is_digits(y, 4))?.parse().ok()?;
    let month = match parts.next() {
        None => 1,
        Some(m) if is_digits(m, 2) => m.parse().ok()?,
        Some(_) => return None,
    };
    if parts.next().is_some() {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month, 1)
}

fn is_digits(s: &str, len: usize) -> bool {
    s.len() == len && s.bytes().all(|b| b.is_ascii_digit())
}

/// Interpret a loosely typed cell as a number. Blank and non-numeric text
/// yield `None`; non-finite values are rejected as well.
pub fn coerce_f64(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = JsonValue::deserialize(deserializer)?;
    Ok(match value {
        JsonValue::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        JsonValue::String(s) => coerce_f64(&s),
        _ => None,
    })
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = JsonValue::deserialize(deserializer)?;
    Ok(match value {
        JsonValue::String(s) => s,
        JsonValue::Null => String::new(),
        other => other.to_string(),
    })
}
