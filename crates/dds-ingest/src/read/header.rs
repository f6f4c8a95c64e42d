//! CSV header normalization.

use std::collections::BTreeSet;

/// Normalizes a header value: trims, drops a stray BOM and collapses
/// internal whitespace runs to a single space.
pub fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    let mut parts = trimmed.split_whitespace();
    let mut normalized = String::new();
    if let Some(first) = parts.next() {
        normalized.push_str(first);
        for part in parts {
            normalized.push(' ');
            normalized.push_str(part);
        }
    }
    normalized
}

/// Builds unique column names from a raw header record.
///
/// Blank headers become `column_<n>` (1-based position); repeated names get a
/// `_<n>` suffix starting at 2.
pub fn build_column_names<'a>(raw: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut seen = BTreeSet::new();
    let mut names = Vec::new();
    for (idx, value) in raw.into_iter().enumerate() {
        let mut base = normalize_header(value);
        if base.is_empty() {
            base = format!("column_{}", idx + 1);
        }
        let mut name = base.clone();
        let mut suffix = 2;
        while seen.contains(&name) {
            name = format!("{base}_{suffix}");
            suffix += 1;
        }
        seen.insert(name.clone());
        names.push(name);
    }
    names
}
