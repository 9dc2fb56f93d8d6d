//! JSON summary file.
//!
//! Lists and mappings are written as-is; scalars are stored as strings so the
//! file shape never depends on the number type.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use log::info;
use serde_json::{Map, Value};

use crate::error::{InsightsError, Result};
use crate::insights::{InsightKey, InsightValue, InsightsAggregate};

pub const DEFAULT_OUTPUT_NAME: &str = "ticket_insights.json";

/// `0.0` -> `"0.0"`, `-0.25` -> `"-0.25"`.
pub fn scalar_string(value: f64) -> String {
    let s = value.to_string();
    if s.contains(['.', 'e', 'i', 'N']) {
        s
    } else {
        format!("{s}.0")
    }
}

fn value_to_json(value: &InsightValue) -> Value {
    match value {
        InsightValue::Pairs(pairs) => Value::Array(
            pairs
                .iter()
                .map(|(term, count)| Value::Array(vec![Value::from(term.as_str()), Value::from(*count)]))
                .collect(),
        ),
        InsightValue::Terms(terms) => {
            Value::Array(terms.iter().map(|t| Value::from(t.as_str())).collect())
        }
        InsightValue::Distribution(entries) => Value::Object(
            entries
                .iter()
                .map(|(label, count)| (label.clone(), Value::from(*count)))
                .collect::<Map<String, Value>>(),
        ),
        InsightValue::Scalar(v) => Value::String(scalar_string(*v)),
    }
}

pub fn to_json(insights: &InsightsAggregate) -> Value {
    Value::Object(
        insights
            .iter()
            .map(|(key, value)| (key.as_str().to_string(), value_to_json(value)))
            .collect(),
    )
}

/// Pretty JSON with two-space indentation and no trailing newline.
pub fn render_json(insights: &InsightsAggregate) -> String {
    // serializing a Value never fails
    serde_json::to_string_pretty(&to_json(insights)).unwrap_or_default()
}

/// Joins `output_name` onto the input file's directory.
pub fn output_path(input: &Path, output_name: &str) -> PathBuf {
    input
        .parent()
        .map(|dir| dir.join(output_name))
        .unwrap_or_else(|| PathBuf::from(output_name))
}

/// Writes (or truncates) the summary file.
pub fn write_insights(insights: &InsightsAggregate, path: &Path) -> Result<PathBuf> {
    let persist = |source| InsightsError::PersistFailure {
        path: path.to_path_buf(),
        source,
    };
    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
        .map_err(persist)?;
    file.write_all(render_json(insights).as_bytes())
        .map_err(persist)?;
    info!("Wrote {} insights to {}", insights.len(), path.display());
    Ok(path.to_path_buf())
}

fn json_to_value(key: InsightKey, value: &Value) -> std::result::Result<InsightValue, String> {
    let count = |v: &Value| {
        v.as_u64()
            .map(|n| n as usize)
            .ok_or_else(|| format!("{key}: expected a count, got {v}"))
    };
    let items = |v: &Value| {
        v.as_array()
            .cloned()
            .ok_or_else(|| format!("{key}: expected an array"))
    };
    match key {
        InsightKey::AvgSentiment => value
            .as_str()
            .ok_or_else(|| format!("{key}: expected a string"))?
            .parse::<f64>()
            .map(InsightValue::Scalar)
            .map_err(|e| format!("{key}: {e}")),
        InsightKey::TopKeywords => {
            let mut pairs: Vec<(String, usize)> = Vec::new();
            for item in items(value)? {
                match item.as_array().map(Vec::as_slice) {
                    Some([Value::String(term), n]) => pairs.push((term.clone(), count(n)?)),
                    _ => return Err(format!("{key}: expected [term, count], got {item}")),
                }
            }
            Ok(InsightValue::Pairs(pairs))
        }
        InsightKey::TfidfTerms => {
            let mut terms = Vec::new();
            for item in items(value)? {
                match item {
                    Value::String(term) => terms.push(term),
                    other => return Err(format!("{key}: expected a term, got {other}")),
                }
            }
            Ok(InsightValue::Terms(terms))
        }
        _ => {
            let map = value
                .as_object()
                .ok_or_else(|| format!("{key}: expected an object"))?;
            let mut entries: Vec<(String, usize)> = Vec::with_capacity(map.len());
            for (label, n) in map {
                entries.push((label.clone(), count(n)?));
            }
            Ok(InsightValue::Distribution(entries))
        }
    }
}

/// Parses a summary document. Unknown top-level names are ignored.
pub fn parse_insights(json: &str) -> std::result::Result<InsightsAggregate, String> {
    let root: Value = serde_json::from_str(json).map_err(|e| e.to_string())?;
    let object = root.as_object().ok_or("summary is not a JSON object")?;
    let mut entries = Vec::new();
    for (name, value) in object {
        if let Some(key) = InsightKey::from_name(name) {
            entries.push((key, json_to_value(key, value)?));
        }
    }
    Ok(InsightsAggregate::from_entries(entries))
}

pub fn read_insights(path: &Path) -> Result<InsightsAggregate> {
    let json =
        std::fs::read_to_string(path).map_err(|e| InsightsError::parse(path, e.to_string()))?;
    parse_insights(&json).map_err(|e| InsightsError::parse(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample() -> InsightsAggregate {
        InsightsAggregate::from_entries([
            (
                InsightKey::TopKeywords,
                InsightValue::Pairs(vec![("issue".to_string(), 3), ("login".to_string(), 2)]),
            ),
            (
                InsightKey::TfidfTerms,
                InsightValue::Terms(vec!["billing".to_string(), "login".to_string()]),
            ),
            (InsightKey::AvgSentiment, InsightValue::Scalar(-0.25)),
            (
                InsightKey::StatusDistribution,
                InsightValue::Distribution(vec![("solved".to_string(), 4), ("open".to_string(), 1)]),
            ),
        ])
    }

    #[test]
    fn scalars_keep_a_decimal_point() {
        assert_eq!(scalar_string(0.0), "0.0");
        assert_eq!(scalar_string(-0.25), "-0.25");
        assert_eq!(scalar_string(3.0), "3.0");
    }

    #[test]
    fn layout_is_stable() {
        let json = render_json(&sample());
        assert!(json.starts_with("{\n  \"top_keywords\": [\n    [\n      \"issue\",\n      3\n"));
        assert!(json.contains("\"avg_sentiment\": \"-0.25\""));
        // distribution order is kept, not alphabetised
        assert!(json.find("\"solved\"").unwrap() < json.find("\"open\"").unwrap());
        assert!(!json.ends_with('\n'));
    }

    #[test]
    fn write_then_read_round_trips() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(DEFAULT_OUTPUT_NAME);
        write_insights(&sample(), &path).unwrap();
        let first = std::fs::read(&path).unwrap();
        write_insights(&sample(), &path).unwrap();
        assert_eq!(first, std::fs::read(&path).unwrap());
        assert_eq!(read_insights(&path).unwrap(), sample());
    }

    #[test]
    fn output_lands_beside_input() {
        let input = Path::new("/data/exports/tickets.csv");
        assert_eq!(
            output_path(input, DEFAULT_OUTPUT_NAME),
            Path::new("/data/exports/ticket_insights.json")
        );
        assert_eq!(
            output_path(input, "/tmp/out.json"),
            Path::new("/tmp/out.json")
        );
    }

    #[test]
    fn unwritable_target_is_persist_failure() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("out.json");
        assert!(matches!(
            write_insights(&sample(), &path),
            Err(InsightsError::PersistFailure { .. })
        ));
    }

    #[test]
    fn malformed_summary_is_rejected() {
        assert!(parse_insights("[1, 2]").is_err());
        assert!(parse_insights(r#"{"top_keywords": [["a"]]}"#).is_err());
        assert!(parse_insights(r#"{"avg_sentiment": 0.5}"#).is_err());
    }

    #[test]
    fn empty_lists_keep_their_kind() {
        let agg = InsightsAggregate::from_entries([(
            InsightKey::TopKeywords,
            InsightValue::Pairs(Vec::new()),
        )]);
        assert_eq!(parse_insights(&render_json(&agg)).unwrap(), agg);
    }
}
