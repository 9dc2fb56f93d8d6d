//! Monthly ticket volume.
//!
//! Date cells are coerced into a separate vector; the table itself is left
//! untouched. Cells that do not parse are counted and otherwise ignored.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use log::debug;

use crate::columns::ColumnRole;
use crate::insights::{Outcome, SkipReason};
use crate::office::excel_serial_to_datetime;
use crate::table::{Cell, Table};

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %I:%M %p",
    "%d.%m.%Y %H:%M:%S",
    "%d.%m.%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    // two-digit years first, `%Y` would read "24" as year 24
    "%m/%d/%y",
    "%m/%d/%Y",
    "%d.%m.%Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%d %b %Y",
    "%d %B %Y",
    "%d-%b-%Y",
];

const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M:%S%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S %z",
];

/// Year and month only; the first of the month is assumed.
const MONTH_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlyDistribution {
    pub column: String,
    /// `YYYY-MM` -> tickets, ascending by key.
    pub months: BTreeMap<String, usize>,
    pub unparsed: usize,
}

/// Parses a free-form timestamp. Offsets are dropped; the wall time is kept.
pub fn parse_datetime_str(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt.naive_local());
        }
    }
    let s = s
        .strip_suffix(" UTC")
        .or_else(|| s.strip_suffix('Z'))
        .unwrap_or(s);
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }
    parse_year_month(s)
}

/// `2024-03` or `2024/03`, read as the first of the month.
fn parse_year_month(s: &str) -> Option<NaiveDateTime> {
    if !s.get(..4)?.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let separator = s.get(4..5)?;
    MONTH_FORMATS
        .iter()
        .find(|fmt| fmt.get(2..3) == Some(separator))
        .and_then(|fmt| NaiveDate::parse_from_str(&format!("{s}{separator}01"), fmt).ok())
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

pub fn parse_cell(cell: &Cell) -> Option<NaiveDateTime> {
    match cell {
        Cell::DateTime(dt) => Some(*dt),
        Cell::Number(n) => excel_serial_to_datetime(*n),
        Cell::Text(s) => parse_datetime_str(s),
        Cell::Bool(_) => None,
    }
}

pub fn analyze_monthly(table: &Table, column: Option<&str>) -> Outcome<MonthlyDistribution> {
    let Some(col) = column.and_then(|name| table.column(name)) else {
        return Outcome::Skipped(SkipReason::UnresolvedColumn(ColumnRole::Date));
    };

    let parsed: Vec<Option<NaiveDateTime>> = col
        .values
        .iter()
        .map(|v| v.as_ref().and_then(parse_cell))
        .collect();

    let mut months = BTreeMap::new();
    for dt in parsed.iter().flatten() {
        *months.entry(dt.format("%Y-%m").to_string()).or_insert(0) += 1;
    }
    let unparsed = col.non_null().count() - parsed.iter().flatten().count();
    if unparsed > 0 {
        debug!("{unparsed} values in '{}' are not dates", col.name);
    }

    Outcome::Analyzed(MonthlyDistribution {
        column: col.name.clone(),
        months,
        unparsed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn month(raw: &str) -> Option<String> {
        parse_datetime_str(raw).map(|d| d.format("%Y-%m").to_string())
    }

    #[test]
    fn accepted_formats() {
        for raw in [
            "2024-03-05",
            "2024-03-05 14:02:11",
            "2024-03-05T14:02:11.123Z",
            "2024-03-05T23:30:00+02:00",
            "2024-03-05T14:02:11+0000",
            "2024-03-05T14:02:11-0800",
            "2024-03-05T14:02:11.123+0000",
            "2024-03-05 14:02:11+0100",
            "2024-03",
            "2024/03",
            "2024-03-05 14:02:11 UTC",
            "2024/03/05",
            "03/05/2024",
            "03/05/2024 2:15 PM",
            "3/5/24",
            "05.03.2024",
            "Mar 5, 2024",
            "5 Mar 2024",
            "05-Mar-2024",
        ] {
            assert_eq!(month(raw).as_deref(), Some("2024-03"), "{raw}");
        }
    }

    #[test]
    fn two_digit_years_land_in_this_century() {
        let dt = parse_datetime_str("3/5/24").unwrap();
        assert_eq!(dt.format("%Y-%m-%d").to_string(), "2024-03-05");
    }

    #[test]
    fn offset_keeps_wall_time() {
        for raw in ["2024-01-31T23:30:00-05:00", "2024-01-31T23:30:00-0500"] {
            let dt = parse_datetime_str(raw).unwrap();
            assert_eq!(dt.format("%Y-%m-%d %H:%M").to_string(), "2024-01-31 23:30", "{raw}");
        }
    }

    #[test]
    fn garbage_is_none() {
        assert_eq!(parse_datetime_str("yesterday"), None);
        assert_eq!(parse_datetime_str("2024-13-01"), None);
        assert_eq!(parse_datetime_str("2024-13"), None);
        assert_eq!(parse_datetime_str("03/05"), None);
        assert_eq!(parse_cell(&Cell::Bool(true)), None);
    }

    #[test]
    fn spreadsheet_serials() {
        let dt = parse_cell(&Cell::Number(45352.0)).unwrap();
        assert_eq!(dt.format("%Y-%m-%d").to_string(), "2024-03-01");
    }

    #[test]
    fn buckets_by_month_and_counts_failures() {
        let table = Table::from_rows(
            vec!["Id".into(), "Created at".into()],
            vec![
                vec![Cell::from_text("1"), Cell::from_text("2024-02-10")],
                vec![Cell::from_text("2"), Cell::from_text("not a date")],
                vec![Cell::from_text("3"), Cell::from_text("2024-01-03 09:00")],
                vec![Cell::from_text("4"), Cell::from_text("2024-02-28")],
                vec![Cell::from_text("5"), None],
            ],
        );
        let dist = analyze_monthly(&table, Some("Created at"));
        let dist = dist.value().unwrap();
        let months: Vec<_> = dist.months.iter().map(|(k, v)| (k.as_str(), *v)).collect();
        assert_eq!(months, vec![("2024-01", 1), ("2024-02", 2)]);
        assert_eq!(dist.unparsed, 1);
        // the source column is untouched
        assert_eq!(
            table.column("Created at").unwrap().values[1],
            Cell::from_text("not a date")
        );
    }

    #[test]
    fn unresolved_date_is_skipped() {
        let table = Table::from_rows(vec!["Subject".into()], Vec::new());
        assert_eq!(
            analyze_monthly(&table, None),
            Outcome::Skipped(SkipReason::UnresolvedColumn(ColumnRole::Date))
        );
    }
}
