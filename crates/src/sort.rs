use crate::error::{Error, Result};
use crate::group::GroupedTargets;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

pub type OrderFn = Arc<dyn Fn(&str, &[String]) -> Vec<String> + Send + Sync>;

/// Order of targets inside each group.
#[derive(Clone, Default)]
pub enum TargetOrder {
    #[default]
    Insertion,
    Alphabetical,
    /// Called with the group name and its targets; must return a permutation.
    Custom(OrderFn),
}

impl fmt::Debug for TargetOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetOrder::Insertion => f.write_str("Insertion"),
            TargetOrder::Alphabetical => f.write_str("Alphabetical"),
            TargetOrder::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

fn is_permutation(original: &[String], reordered: &[String]) -> bool {
    if original.len() != reordered.len() {
        return false;
    }
    let a: HashSet<&str> = original.iter().map(String::as_str).collect();
    let b: HashSet<&str> = reordered.iter().map(String::as_str).collect();
    a == b && b.len() == reordered.len()
}

fn order_targets(group: &str, targets: Vec<String>, order: &TargetOrder) -> Result<Vec<String>> {
    match order {
        TargetOrder::Insertion => Ok(targets),
        TargetOrder::Alphabetical => {
            let mut targets = targets;
            targets.sort();
            Ok(targets)
        }
        TargetOrder::Custom(f) => {
            let reordered = f(group, &targets);
            if is_permutation(&targets, &reordered) {
                Ok(reordered)
            } else {
                Err(Error::InvalidOrder {
                    group: group.to_string(),
                })
            }
        }
    }
}

/// Named groups ascend by name; the fallback group stays in front.
pub fn sort_groups(mut grouped: GroupedTargets, order: &TargetOrder) -> Result<GroupedTargets> {
    grouped.groups.sort_by(|a, b| a.name.cmp(&b.name));
    let fallback = std::mem::take(&mut grouped.fallback.targets);
    grouped.fallback.targets = order_targets(&grouped.fallback.name, fallback, order)?;
    for g in grouped.groups.iter_mut() {
        let targets = std::mem::take(&mut g.targets);
        g.targets = order_targets(&g.name, targets, order)?;
    }
    Ok(grouped)
}
