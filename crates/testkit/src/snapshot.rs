//! Golden-file snapshots.
//!
//! Values are serialized as pretty JSON with object keys sorted and a
//! trailing newline, then compared byte for byte against a file on disk.
//! Rerun with `SPITROAST_UPDATE_SNAPSHOTS=1` to rewrite the goldens.

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

const UPDATE_SNAPSHOTS_ENV: &str = "SPITROAST_UPDATE_SNAPSHOTS";

/// Assert that `value` matches the JSON snapshot stored at `path`.
///
/// With `SPITROAST_UPDATE_SNAPSHOTS=1` the file is (re)written instead.
pub fn assert_json_snapshot<P: AsRef<Path>, T: Serialize>(path: P, value: &T) -> Result<()> {
    let path = path.as_ref();
    let actual = canonical_json(value)?;

    if updating_snapshots() {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        return fs::write(path, &actual)
            .with_context(|| format!("Failed to write snapshot {}", path.display()));
    }

    let expected = fs::read_to_string(path).with_context(|| {
        format!(
            "No snapshot at {}; set {UPDATE_SNAPSHOTS_ENV}=1 to record it",
            path.display()
        )
    })?;

    match first_difference(&expected, &actual) {
        None => Ok(()),
        Some(diff) => anyhow::bail!(
            "Snapshot {} differs at line {}\n  expected: {}\n  actual:   {}\nset {UPDATE_SNAPSHOTS_ENV}=1 to accept",
            path.display(),
            diff.line,
            diff.expected,
            diff.actual
        ),
    }
}

fn updating_snapshots() -> bool {
    std::env::var(UPDATE_SNAPSHOTS_ENV).is_ok_and(|v| matches!(v.as_str(), "1" | "true" | "yes"))
}

fn canonical_json<T: Serialize>(value: &T) -> Result<String> {
    let mut value = serde_json::to_value(value).context("Snapshot value is not JSON")?;
    sort_keys(&mut value);
    let mut text = serde_json::to_string_pretty(&value)?;
    text.push('\n');
    Ok(text)
}

fn sort_keys(value: &mut Value) {
    match value {
        Value::Object(map) => {
            let sorted: BTreeMap<String, Value> = std::mem::take(map).into_iter().collect();
            *map = sorted
                .into_iter()
                .map(|(key, mut child)| {
                    sort_keys(&mut child);
                    (key, child)
                })
                .collect();
        }
        Value::Array(items) => items.iter_mut().for_each(sort_keys),
        _ => {}
    }
}

#[derive(Debug, PartialEq, Eq)]
struct LineDiff<'a> {
    /// One-based.
    line: usize,
    expected: &'a str,
    actual: &'a str,
}

fn first_difference<'a>(expected: &'a str, actual: &'a str) -> Option<LineDiff<'a>> {
    if expected == actual {
        return None;
    }
    let mut expected_lines = expected.lines();
    let mut actual_lines = actual.lines();
    let mut line = 1;
    loop {
        match (expected_lines.next(), actual_lines.next()) {
            (Some(e), Some(a)) if e == a => line += 1,
            (e, a) => {
                return Some(LineDiff {
                    line,
                    expected: e.unwrap_or("<end of file>"),
                    actual: a.unwrap_or("<end of file>"),
                })
            }
        }
    }
}
