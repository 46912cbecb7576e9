use std::collections::HashSet;

/// Drop blank names and later duplicates, keeping first-seen order and the
/// original spelling of every surviving name.
pub fn normalize_targets<S: AsRef<str>>(names: &[S]) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    names
        .iter()
        .map(|n| n.as_ref())
        .filter(|n| !n.trim().is_empty())
        .filter(|n| seen.insert(n))
        .map(|n| n.to_string())
        .collect()
}
