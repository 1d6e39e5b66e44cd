use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde_json::Value;

/// questionNumber -> explanation HTML
pub type ExplanationMap = BTreeMap<u64, String>;

// SOA-C03: why the right answer is right and why the other options are wrong
const SOA_C03: &str = include_str!("../data/soa-c03-explanations.json");

/// The SOA-C03 explanations compiled into the binary.
pub fn embedded() -> Result<ExplanationMap> {
    parse(SOA_C03).context("parsing embedded SOA-C03 explanations")
}

/// Read an explanation mapping from a JSON file.
pub fn load(path: &Path) -> Result<ExplanationMap> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    parse(&raw).with_context(|| format!("parsing {}", path.display()))
}

/// Parse `{"<questionNumber>": "<html>", ...}`.
///
/// Keys must be positive integers and values non-empty strings. Two keys that
/// name the same number (`"7"` and `"07"`) are rejected.
pub fn parse(raw: &str) -> Result<ExplanationMap> {
    let json: Value = serde_json::from_str(raw)?;
    let Value::Object(entries) = json else {
        bail!("explanation mapping must be a JSON object keyed by question number");
    };

    let mut map = ExplanationMap::new();
    for (key, value) in entries {
        let num: u64 = key
            .trim()
            .parse()
            .with_context(|| format!("key {key:?} is not a question number"))?;
        if num == 0 {
            bail!("key {key:?}: question numbers start at 1");
        }

        let text = match value {
            Value::String(s) => s,
            other => bail!("question {num}: explanation must be a string (found {other})"),
        };
        if text.trim().is_empty() {
            bail!("question {num}: explanation is empty");
        }

        if map.insert(num, text).is_some() {
            bail!("question {num} appears more than once");
        }
    }
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_covers_all_65_questions() {
        let map = embedded().unwrap();
        assert_eq!(map.len(), 65);
        assert_eq!(map.keys().copied().collect::<Vec<_>>(), (1..=65).collect::<Vec<u64>>());
        assert!(map.values().all(|v| v.starts_with("<p><strong>")));
    }

    #[test]
    fn embedded_keeps_markup_and_cjk_text() {
        let map = embedded().unwrap();
        let first = &map[&1];
        assert!(first.contains("PrivateDnsName"));
        assert!(first.contains("正确答案 C"));
        assert!(first.contains("\n<ul>\n"));
    }

    #[test]
    fn parse_accepts_plain_mapping() {
        let map = parse(r#"{"1": "<p>X</p>", "12": "<p>Y</p>"}"#).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map[&1], "<p>X</p>");
        assert_eq!(map[&12], "<p>Y</p>");
    }

    #[test]
    fn parse_rejects_bad_shapes() {
        assert!(parse("[]").is_err());
        assert!(parse("not json").is_err());
        assert!(parse(r#"{"abc": "<p>X</p>"}"#).is_err());
        assert!(parse(r#"{"0": "<p>X</p>"}"#).is_err());
        assert!(parse(r#"{"-3": "<p>X</p>"}"#).is_err());
        assert!(parse(r#"{"1": 5}"#).is_err());
        assert!(parse(r#"{"1": "  "}"#).is_err());
    }

    #[test]
    fn parse_rejects_same_number_twice() {
        let err = parse(r#"{"7": "<p>a</p>", "07": "<p>b</p>"}"#).unwrap_err();
        assert!(err.to_string().contains("question 7"));
    }
}
