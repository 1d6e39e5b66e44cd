use std::collections::HashSet;
use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use log::{info, warn};
use serde::Serialize;
use serde_json::{Number, Value};

use crate::explanations::ExplanationMap;

/// What a single merge pass did to the document.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct MergeReport {
    /// Question numbers whose record received a mapped explanation
    pub applied: Vec<u64>,
    /// Subset of `applied` that replaced a different, non-empty explanation
    pub overwritten: Vec<u64>,
    /// Mapping keys with no record in the document
    pub unmatched: Vec<u64>,
    /// Question numbers carried by more than one record
    pub duplicates: Vec<u64>,
}

impl MergeReport {
    /// Number of records that were updated.
    pub fn count(&self) -> usize {
        self.applied.len()
    }

    /// One-line outcome printed at the end of a run.
    pub fn summary(&self, dry_run: bool) -> String {
        let verb = if dry_run { "Would update" } else { "Updated" };
        format!("{verb} {} questions with explanations.", self.count())
    }
}

/// Set `explanation` on every record of `doc["questions"]` whose
/// `questionNumber` is a key of `map`.
///
/// The first record carrying a number wins; later records with the same
/// number are left alone and listed in `duplicates`. Everything other than the
/// touched `explanation` fields is left as it was.
pub fn apply(doc: &mut Value, map: &ExplanationMap) -> Result<MergeReport> {
    let Value::Object(root) = doc else {
        bail!("top-level JSON must be an object with a \"questions\" array");
    };
    let questions = match root.get_mut("questions") {
        Some(Value::Array(arr)) => arr,
        Some(other) => bail!("\"questions\" must be an array (found {})", kind(other)),
        None => bail!("document has no \"questions\" field"),
    };

    let mut report = MergeReport::default();
    let mut seen = HashSet::new();

    for (idx, entry) in questions.iter_mut().enumerate() {
        let Value::Object(record) = entry else {
            bail!("questions[{idx}] is not an object");
        };
        let Some(Value::Number(raw)) = record.get("questionNumber") else {
            bail!("questions[{idx}] has no numeric questionNumber");
        };
        // negative or fractional numbers can never match a mapping key
        let Some(num) = mapping_key(raw) else { continue };

        if !seen.insert(num) {
            if !report.duplicates.contains(&num) {
                warn!("question {num} appears more than once; only the first record is updated");
                report.duplicates.push(num);
            }
            continue;
        }

        let Some(text) = map.get(&num) else { continue };

        if let Some(prev) = record.get("explanation").and_then(Value::as_str) {
            if !prev.trim().is_empty() && prev != text {
                warn!(
                    "question {num}: replacing existing explanation ({} chars)",
                    prev.chars().count()
                );
                report.overwritten.push(num);
            }
        }
        record.insert("explanation".to_string(), Value::String(text.clone()));
        report.applied.push(num);
    }

    report.unmatched = map.keys().copied().filter(|k| !seen.contains(k)).collect();
    for num in &report.unmatched {
        info!("question {num}: no record in document, skipped");
    }

    Ok(report)
}

/// Load `path`, merge `map` into it and write it back in place.
pub fn merge_file(path: &Path, map: &ExplanationMap) -> Result<MergeReport> {
    merge_file_with(path, map, false)
}

/// Same as [`merge_file`]; with `dry_run` the file is left untouched.
///
/// The output uses two-space indentation and keeps non-ASCII text unescaped.
/// There is no backup and no atomic rename.
pub fn merge_file_with(path: &Path, map: &ExplanationMap, dry_run: bool) -> Result<MergeReport> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let mut doc: Value = serde_json::from_str(&content)
        .with_context(|| format!("parsing {}", path.display()))?;

    let report = apply(&mut doc, map).with_context(|| format!("updating {}", path.display()))?;

    if dry_run {
        info!("dry run, {} left untouched", path.display());
        return Ok(report);
    }

    let pretty = serde_json::to_string_pretty(&doc)?;
    fs::write(path, pretty).with_context(|| format!("writing {}", path.display()))?;
    info!("wrote {} ({} explanations applied)", path.display(), report.count());

    Ok(report)
}

/// `3` and `3.0` both name question 3.
fn mapping_key(n: &Number) -> Option<u64> {
    if let Some(u) = n.as_u64() {
        return Some(u);
    }
    if n.is_i64() {
        return None;
    }
    let f = n.as_f64()?;
    if f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64 {
        Some(f as u64)
    } else {
        None
    }
}

fn kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
