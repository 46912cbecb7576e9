//! Clustering of target names into named groups.
//!
//! Grouping runs as a split followed by three merge passes. Every pass takes
//! a [`GroupedTargets`] by value and returns the next one, so each can be
//! exercised on its own.

use crate::error::{Error, Result};
use crate::target::normalize_targets;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

pub const DEFAULT_FALLBACK_GROUP: &str = "default";
pub const DEFAULT_GROUP_PATTERN: &str = r"^([^-_.:/]+)[-_.:/]";

static DELIMITED: Lazy<Regex> =
    Lazy::new(|| Regex::new(DEFAULT_GROUP_PATTERN).expect("default group pattern compiles"));

pub type GroupFn = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// How a target name maps to its group name.
#[derive(Clone)]
pub enum GroupRule {
    /// The named capture `group`, or else capture 1, is the group name.
    Pattern(Regex),
    Custom(GroupFn),
}

impl GroupRule {
    /// Text before the first `-`, `_`, `.`, `:` or `/`.
    pub fn delimited() -> Self {
        GroupRule::Pattern(DELIMITED.clone())
    }

    pub fn pattern(pattern: &str) -> Result<Self> {
        Regex::new(pattern)
            .map(GroupRule::Pattern)
            .map_err(|source| Error::Pattern {
                pattern: pattern.to_string(),
                source,
            })
    }

    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        GroupRule::Custom(Arc::new(f))
    }

    pub fn extract(&self, name: &str) -> Result<Option<String>> {
        match self {
            GroupRule::Pattern(re) => Ok(re.captures(name).and_then(|caps| {
                caps.name("group")
                    .or_else(|| caps.get(1))
                    .map(|m| m.as_str().to_string())
                    .filter(|g| !g.is_empty())
            })),
            GroupRule::Custom(f) => match f(name) {
                Some(g) if g.is_empty() => Err(Error::EmptyGroupName(name.to_string())),
                other => Ok(other),
            },
        }
    }
}

impl Default for GroupRule {
    fn default() -> Self {
        GroupRule::delimited()
    }
}

impl fmt::Debug for GroupRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupRule::Pattern(re) => f.debug_tuple("Pattern").field(&re.as_str()).finish(),
            GroupRule::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct GroupOptions {
    pub fallback: String,
    pub rule: GroupRule,
    pub merge_prefix_targets: bool,
    pub merge_prefix_groups_threshold: Option<usize>,
    pub merge_dangling_threshold: Option<usize>,
}

impl Default for GroupOptions {
    fn default() -> Self {
        Self {
            fallback: DEFAULT_FALLBACK_GROUP.to_string(),
            rule: GroupRule::default(),
            merge_prefix_targets: true,
            merge_prefix_groups_threshold: Some(1),
            merge_dangling_threshold: Some(1),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Group {
    pub name: String,
    pub targets: Vec<String>,
}

impl Group {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            targets: Vec::new(),
        }
    }
}

/// The fallback group plus every named group.
///
/// The fallback group is kept apart so it can never collide with a named
/// group; [`GroupedTargets::iter`] yields it first, and only when it holds
/// targets.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GroupedTargets {
    pub fallback: Group,
    pub groups: Vec<Group>,
}

impl GroupedTargets {
    pub fn new(fallback_name: impl Into<String>) -> Self {
        Self {
            fallback: Group::new(fallback_name),
            groups: Vec::new(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Group> {
        std::iter::once(&self.fallback)
            .filter(|g| !g.targets.is_empty())
            .chain(self.groups.iter())
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, name: &str) -> Option<&Group> {
        self.iter().find(|g| g.name == name)
    }

    pub fn target_count(&self) -> usize {
        self.iter().map(|g| g.targets.len()).sum()
    }

    /// Longest group or target name, in characters.
    pub fn widest_name(&self) -> usize {
        self.iter()
            .flat_map(|g| std::iter::once(&g.name).chain(g.targets.iter()))
            .map(|s| s.chars().count())
            .max()
            .unwrap_or(0)
    }
}

/// Split names into groups with `rule`; anything without a group, or whose
/// group is the fallback name, lands in the fallback group.
pub fn split_groups(names: &[String], opts: &GroupOptions) -> Result<GroupedTargets> {
    let mut out = GroupedTargets::new(opts.fallback.clone());
    let mut slots: HashMap<String, usize> = HashMap::new();
    for name in names {
        match opts.rule.extract(name)? {
            Some(g) if g != opts.fallback => {
                let slot = *slots.entry(g.clone()).or_insert_with(|| {
                    out.groups.push(Group::new(g.clone()));
                    out.groups.len() - 1
                });
                out.groups[slot].targets.push(name.clone());
            }
            _ => out.fallback.targets.push(name.clone()),
        }
    }
    Ok(out)
}

/// Move each fallback target into the smallest-named group whose name starts
/// with it, ahead of that group's own targets. Moved targets keep their
/// fallback order.
pub fn merge_prefix_targets(mut grouped: GroupedTargets) -> GroupedTargets {
    let fallback = std::mem::take(&mut grouped.fallback.targets);
    let mut kept = Vec::with_capacity(fallback.len());
    // next insertion slot per group
    let mut front = vec![0usize; grouped.groups.len()];
    for name in fallback {
        let dest = grouped
            .groups
            .iter()
            .enumerate()
            .filter(|(_, g)| g.name.starts_with(name.as_str()))
            .min_by(|a, b| a.1.name.cmp(&b.1.name))
            .map(|(i, _)| i);
        match dest {
            Some(i) => {
                debug!(name = %name, group = %grouped.groups[i].name, "merged fallback target into prefix group");
                grouped.groups[i].targets.insert(front[i], name);
                front[i] += 1;
            }
            None => kept.push(name),
        }
    }
    grouped.fallback.targets = kept;
    grouped
}

// smallest-named other group whose name is a prefix of groups[i]'s name
fn prefix_group(groups: &[Group], i: usize) -> Option<usize> {
    let name = &groups[i].name;
    groups
        .iter()
        .enumerate()
        .filter(|(j, g)| *j != i && name.starts_with(g.name.as_str()))
        .min_by(|a, b| a.1.name.cmp(&b.1.name))
        .map(|(j, _)| j)
}

/// Splice groups with at most `threshold` targets onto a group whose name is
/// a prefix of theirs, until none is left.
pub fn merge_prefix_groups(mut grouped: GroupedTargets, threshold: usize) -> GroupedTargets {
    loop {
        let candidate = grouped
            .groups
            .iter()
            .enumerate()
            .filter(|(_, g)| g.targets.len() <= threshold)
            .filter_map(|(i, _)| prefix_group(&grouped.groups, i).map(|p| (i, p)))
            .min_by(|a, b| grouped.groups[a.0].name.cmp(&grouped.groups[b.0].name));
        let Some((small, into)) = candidate else {
            break;
        };
        let removed = grouped.groups.remove(small);
        let into = if into > small { into - 1 } else { into };
        debug!(group = %removed.name, into = %grouped.groups[into].name, "merged small group into prefix group");
        grouped.groups[into].targets.extend(removed.targets);
    }
    grouped
}

/// Dissolve groups with at most `threshold` targets into the fallback group.
pub fn merge_dangling(mut grouped: GroupedTargets, threshold: usize) -> GroupedTargets {
    let (dangling, kept): (Vec<Group>, Vec<Group>) = grouped
        .groups
        .into_iter()
        .partition(|g| g.targets.len() <= threshold);
    for g in dangling {
        debug!(group = %g.name, targets = g.targets.len(), "dissolved dangling group");
        grouped.fallback.targets.extend(g.targets);
    }
    grouped.groups = kept;
    grouped
}

pub fn apply_merges(mut grouped: GroupedTargets, opts: &GroupOptions) -> GroupedTargets {
    if opts.merge_prefix_targets {
        grouped = merge_prefix_targets(grouped);
    }
    if let Some(threshold) = opts.merge_prefix_groups_threshold {
        grouped = merge_prefix_groups(grouped, threshold);
    }
    if let Some(threshold) = opts.merge_dangling_threshold {
        grouped = merge_dangling(grouped, threshold);
    }
    grouped
}

/// Normalize, split and merge. The result is in pre-sort order.
pub fn group_targets<S: AsRef<str>>(names: &[S], opts: &GroupOptions) -> Result<GroupedTargets> {
    let names = normalize_targets(names);
    let grouped = split_groups(&names, opts)?;
    Ok(apply_merges(grouped, opts))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    fn group_of<'a>(g: &'a GroupedTargets, name: &str) -> Vec<&'a str> {
        g.get(name)
            .map(|g| g.targets.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    #[test]
    fn build_targets_cluster_and_test_stays_in_fallback() {
        let g = group_targets(
            &["build", "build_debug", "build_release", "test"],
            &GroupOptions::default(),
        )
        .unwrap();
        assert_eq!(g.len(), 2);
        assert_eq!(group_of(&g, "default"), vec!["test"]);
        assert_eq!(
            group_of(&g, "build"),
            vec!["build", "build_debug", "build_release"]
        );
        assert_eq!(g.iter().next().unwrap().name, "default");
    }

    #[test]
    fn target_equal_to_group_name_moves_into_group() {
        let opts = GroupOptions {
            merge_dangling_threshold: None,
            ..GroupOptions::default()
        };
        let g = group_targets(&["foo", "foo_a"], &opts).unwrap();
        assert!(g.fallback.targets.is_empty());
        assert_eq!(group_of(&g, "foo"), vec!["foo", "foo_a"]);
    }

    #[test]
    fn without_prefix_merge_target_stays_in_fallback() {
        let opts = GroupOptions {
            merge_prefix_targets: false,
            merge_dangling_threshold: None,
            ..GroupOptions::default()
        };
        let g = group_targets(&["foo", "foo_a"], &opts).unwrap();
        assert_eq!(group_of(&g, "default"), vec!["foo"]);
        assert_eq!(group_of(&g, "foo"), vec!["foo_a"]);
    }

    #[test]
    fn group_named_like_fallback_is_folded() {
        let g = group_targets(&["default-a", "default-b", "x"], &GroupOptions::default()).unwrap();
        assert_eq!(g.groups.len(), 0);
        assert_eq!(group_of(&g, "default"), vec!["default-a", "default-b", "x"]);
    }

    #[test]
    fn prefix_target_tie_breaks_on_smallest_group_name() {
        let split = GroupedTargets {
            fallback: Group {
                name: "default".into(),
                targets: names(&["te"]),
            },
            groups: vec![
                Group {
                    name: "tests".into(),
                    targets: names(&["tests_a"]),
                },
                Group {
                    name: "test".into(),
                    targets: names(&["test_a"]),
                },
            ],
        };
        let g = merge_prefix_targets(split);
        assert!(g.fallback.targets.is_empty());
        assert_eq!(group_of(&g, "test"), vec!["te", "test_a"]);
    }

    #[test]
    fn moved_targets_lead_in_fallback_order() {
        let split = GroupedTargets {
            fallback: Group {
                name: "default".into(),
                targets: names(&["bu", "x", "b"]),
            },
            groups: vec![Group {
                name: "build".into(),
                targets: names(&["build_a", "build_b"]),
            }],
        };
        let g = merge_prefix_targets(split);
        assert_eq!(g.fallback.targets, names(&["x"]));
        assert_eq!(group_of(&g, "build"), vec!["bu", "b", "build_a", "build_b"]);
    }

    #[test]
    fn small_group_splices_onto_prefix_group() {
        let g = group_targets(
            &["lint_a", "lint_b", "lints_x", "docs_a", "docs_b"],
            &GroupOptions::default(),
        )
        .unwrap();
        assert!(g.get("lints").is_none());
        assert_eq!(group_of(&g, "lint"), vec!["lint_a", "lint_b", "lints_x"]);
        assert_eq!(group_of(&g, "docs"), vec!["docs_a", "docs_b"]);
    }

    #[test]
    fn prefix_group_merge_is_order_independent() {
        let a = GroupedTargets {
            fallback: Group::new("default"),
            groups: vec![
                Group { name: "abc".into(), targets: names(&["abc_1"]) },
                Group { name: "ab".into(), targets: names(&["ab_1"]) },
                Group { name: "a".into(), targets: names(&["a_1", "a_2"]) },
            ],
        };
        let mut b = a.clone();
        b.groups.reverse();
        let ga = merge_prefix_groups(a, 1);
        let gb = merge_prefix_groups(b, 1);
        assert_eq!(group_of(&ga, "a"), vec!["a_1", "a_2", "ab_1", "abc_1"]);
        assert_eq!(group_of(&ga, "a"), group_of(&gb, "a"));
        assert_eq!(ga.groups.len(), 1);
    }

    #[test]
    fn dangling_groups_dissolve_into_fallback() {
        let g = group_targets(&["x", "solo_1", "pair_1", "pair_2"], &GroupOptions::default()).unwrap();
        assert_eq!(group_of(&g, "default"), vec!["x", "solo_1"]);
        assert_eq!(group_of(&g, "pair"), vec!["pair_1", "pair_2"]);
    }

    #[test]
    fn disabled_thresholds_keep_singletons() {
        let opts = GroupOptions {
            merge_prefix_groups_threshold: None,
            merge_dangling_threshold: None,
            ..GroupOptions::default()
        };
        let g = group_targets(&["solo_1"], &opts).unwrap();
        assert_eq!(group_of(&g, "solo"), vec!["solo_1"]);
        assert!(g.fallback.targets.is_empty());
        assert_eq!(g.len(), 1);
    }

    #[test]
    fn merges_are_idempotent_at_fixed_point() {
        let opts = GroupOptions::default();
        let g = group_targets(
            &["build", "build_a", "build_b", "lint_a", "lint_b", "lints_x", "one_1", "z"],
            &opts,
        )
        .unwrap();
        assert_eq!(apply_merges(g.clone(), &opts), g);
    }

    #[test]
    fn custom_rule_and_empty_name_error() {
        let opts = GroupOptions {
            rule: GroupRule::custom(|n| n.split(':').next().map(str::to_string).filter(|_| n.contains(':'))),
            merge_dangling_threshold: None,
            ..GroupOptions::default()
        };
        let g = group_targets(&["web:up", "web:down", "plain"], &opts).unwrap();
        assert_eq!(group_of(&g, "web"), vec!["web:up", "web:down"]);

        let bad = GroupOptions {
            rule: GroupRule::custom(|_| Some(String::new())),
            ..GroupOptions::default()
        };
        assert!(matches!(group_targets(&["a"], &bad), Err(Error::EmptyGroupName(_))));
    }

    #[test]
    fn named_capture_wins_over_first_capture() {
        let rule = GroupRule::pattern(r"^(x)?(?P<group>[a-z]+)-").unwrap();
        assert_eq!(rule.extract("xab-1").unwrap().as_deref(), Some("ab"));
        assert!(GroupRule::pattern("(").is_err());
    }

    #[test]
    fn empty_input_groups_to_nothing() {
        let empty: [&str; 0] = [];
        let g = group_targets(&empty, &GroupOptions::default()).unwrap();
        assert!(g.is_empty());
        assert_eq!(g.widest_name(), 0);
    }
}
