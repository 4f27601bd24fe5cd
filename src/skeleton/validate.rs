//! Structural validation of skeleton JSON
//!
//! Runs on the untyped JSON value so every problem can be reported at once,
//! before any element is synthesized.

use std::collections::HashSet;

use serde_json::Value;

/// Kinds that may omit an `id`
const ID_OPTIONAL_KINDS: &[&str] = &["text"];

/// How serious a validation issue is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueKind {
    /// Malformed skeleton; always fatal
    Structural,
    /// Connector endpoint naming no skeleton element; fatal only for fresh documents
    UnknownReference,
}

/// One validation finding
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationIssue {
    pub kind: IssueKind,
    pub message: String,
}

impl ValidationIssue {
    fn structural(message: impl Into<String>) -> Self {
        Self {
            kind: IssueKind::Structural,
            message: message.into(),
        }
    }
}

/// Validate a skeleton, returning every issue found
pub fn validate(skeleton: &Value) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    let Some(root) = skeleton.as_object() else {
        issues.push(ValidationIssue::structural("Skeleton must be a JSON object"));
        return issues;
    };
    let Some(elements) = root.get("elements").and_then(Value::as_array) else {
        issues.push(ValidationIssue::structural("skeleton.elements must be an array"));
        return issues;
    };

    if let Some(remove) = root.get("remove") {
        let valid = remove
            .as_array()
            .is_some_and(|ids| ids.iter().all(Value::is_string));
        if !valid {
            issues.push(ValidationIssue::structural(
                "skeleton.remove must be an array of element ids",
            ));
        }
    }

    let mut ids = HashSet::new();
    for (i, el) in elements.iter().enumerate() {
        let Some(obj) = el.as_object() else {
            issues.push(ValidationIssue::structural(format!(
                "Element at index {i} must be an object"
            )));
            continue;
        };
        let kind = obj.get("type").and_then(Value::as_str);
        let id = obj.get("id").and_then(Value::as_str).filter(|s| !s.is_empty());

        match kind {
            None => issues.push(ValidationIssue::structural(format!(
                "Element at index {i} is missing required \"type\" field"
            ))),
            Some(kind) if id.is_none() && !ID_OPTIONAL_KINDS.contains(&kind) => {
                issues.push(ValidationIssue::structural(format!(
                    "Element at index {i} (type: {kind}) is missing required \"id\" field"
                )));
            }
            Some(_) => {}
        }

        if let Some(id) = id {
            if !ids.insert(id) {
                issues.push(ValidationIssue::structural(format!(
                    "Element at index {i} reuses id \"{id}\""
                )));
            }
        }
    }

    for (i, el) in elements.iter().enumerate() {
        if el.get("type").and_then(Value::as_str) != Some("arrow") {
            continue;
        }
        for end in ["from", "to"] {
            if let Some(target) = el.get(end).and_then(Value::as_str) {
                if !ids.contains(target) {
                    issues.push(ValidationIssue {
                        kind: IssueKind::UnknownReference,
                        message: unknown_reference_message(i, end, target, &ids),
                    });
                }
            }
        }
    }

    issues
}

fn unknown_reference_message(index: usize, end: &str, target: &str, ids: &HashSet<&str>) -> String {
    let mut message = format!("Arrow at index {index} references unknown \"{end}\" id: \"{target}\"");
    let suggestions = find_similar(ids, target, 2);
    if !suggestions.is_empty() {
        let quoted: Vec<String> = suggestions.iter().map(|s| format!("\"{s}\"")).collect();
        message.push_str(&format!(" (did you mean {}?)", quoted.join(", ")));
    }
    message
}

/// Compute Levenshtein edit distance between two strings
fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let m = a_chars.len();
    let n = b_chars.len();

    if m == 0 {
        return n;
    }
    if n == 0 {
        return m;
    }

    let mut prev: Vec<usize> = (0..=n).collect();
    let mut curr = vec![0usize; n + 1];

    for i in 1..=m {
        curr[0] = i;
        for j in 1..=n {
            let cost = if a_chars[i - 1] == b_chars[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[n]
}

/// Find similar identifiers within a maximum edit distance
fn find_similar(defined: &HashSet<&str>, target: &str, max_distance: usize) -> Vec<String> {
    let mut candidates: Vec<(&str, usize)> = defined
        .iter()
        .filter_map(|name| {
            let dist = levenshtein_distance(name, target);
            (dist <= max_distance && dist > 0).then_some((*name, dist))
        })
        .collect();

    candidates.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(b.0)));
    candidates
        .into_iter()
        .map(|(name, _)| name.to_string())
        .take(3)
        .collect()
}
