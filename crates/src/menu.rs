//! Grouped, sorted and key-assigned targets, ready for layout.

use crate::acekey::{assign_keys, KeyAssignment, KeyOptions, KeySource, Labelled};
use crate::error::Result;
use crate::group::{group_targets, GroupOptions, GroupedTargets};
use crate::sort::{sort_groups, TargetOrder};
use tracing::{debug, warn};

#[derive(Clone, Debug)]
pub struct MenuOptions {
    pub group: GroupOptions,
    pub order: TargetOrder,
    pub keys: KeyOptions,
    /// Prefix each target shortcut with its group's key.
    pub prefix_group_keys: bool,
}

impl Default for MenuOptions {
    fn default() -> Self {
        Self {
            group: GroupOptions::default(),
            order: TargetOrder::default(),
            keys: KeyOptions::default(),
            prefix_group_keys: true,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellKind {
    Header,
    Target,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MenuCell {
    pub kind: CellKind,
    pub label: Labelled,
    pub key: char,
    pub shortcut: String,
    pub group: String,
    /// The exact target name to hand back on activation; `None` for headers.
    pub target: Option<String>,
}

impl MenuCell {
    pub fn header(assignment: &KeyAssignment) -> Self {
        Self {
            kind: CellKind::Header,
            label: assignment.labelled(),
            key: assignment.key,
            shortcut: assignment.key.to_string(),
            group: assignment.word.clone(),
            target: None,
        }
    }

    pub fn target(group: &MenuCell, assignment: &KeyAssignment, prefix_group_key: bool) -> Self {
        let shortcut = if prefix_group_key {
            format!("{}{}", group.key, assignment.key)
        } else {
            assignment.key.to_string()
        };
        Self {
            kind: CellKind::Target,
            label: assignment.labelled(),
            key: assignment.key,
            shortcut,
            group: group.group.clone(),
            target: Some(assignment.word.clone()),
        }
    }

    pub fn is_header(&self) -> bool {
        self.kind == CellKind::Header
    }
}

/// One group's header followed by its targets.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupBlock {
    pub header: MenuCell,
    pub targets: Vec<MenuCell>,
}

impl GroupBlock {
    pub fn name(&self) -> &str {
        &self.header.group
    }

    pub fn key(&self) -> char {
        self.header.key
    }

    pub fn target_by_key(&self, key: char) -> Option<&MenuCell> {
        self.targets.iter().find(|c| c.key == key)
    }

    pub fn cells(&self) -> impl Iterator<Item = &MenuCell> {
        std::iter::once(&self.header).chain(self.targets.iter())
    }

    pub fn height(&self) -> usize {
        1 + self.targets.len()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Menu {
    pub blocks: Vec<GroupBlock>,
    /// Longest group or target name, in characters.
    pub widest: usize,
}

impl Menu {
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn group_by_key(&self, key: char) -> Option<&GroupBlock> {
        self.blocks.iter().find(|b| b.key() == key)
    }

    pub fn find_target(&self, name: &str) -> Option<&MenuCell> {
        self.blocks
            .iter()
            .flat_map(|b| b.targets.iter())
            .find(|c| c.target.as_deref() == Some(name))
    }

    pub fn target_count(&self) -> usize {
        self.blocks.iter().map(|b| b.targets.len()).sum()
    }
}

fn warn_placeholder(a: &KeyAssignment) {
    if a.source == KeySource::Placeholder {
        warn!(word = %a.word, key = %a.key, "ran out of shortcut characters");
    }
}

/// Assign keys to the group names, then to each group's targets.
pub fn label_blocks(grouped: &GroupedTargets, opts: &MenuOptions) -> Result<Vec<GroupBlock>> {
    let names: Vec<&str> = grouped.iter().map(|g| g.name.as_str()).collect();
    let header_keys = assign_keys(&names, true, &opts.keys)?;

    let mut blocks = Vec::with_capacity(names.len());
    for group in grouped.iter() {
        let Some(assignment) = header_keys.get(&group.name) else {
            continue;
        };
        warn_placeholder(assignment);
        let header = MenuCell::header(assignment);
        let target_keys = assign_keys(&group.targets, false, &opts.keys)?;
        let targets = group
            .targets
            .iter()
            .filter_map(|t| target_keys.get(t))
            .inspect(|a| warn_placeholder(a))
            .map(|a| MenuCell::target(&header, a, opts.prefix_group_keys))
            .collect();
        blocks.push(GroupBlock { header, targets });
    }
    Ok(blocks)
}

/// Normalize, group, sort and key the raw target names.
pub fn build_menu<S: AsRef<str>>(names: &[S], opts: &MenuOptions) -> Result<Menu> {
    let grouped = group_targets(names, &opts.group)?;
    let grouped = sort_groups(grouped, &opts.order)?;
    debug!(
        groups = grouped.len(),
        targets = grouped.target_count(),
        "grouped targets"
    );
    let blocks = label_blocks(&grouped, opts)?;
    Ok(Menu {
        blocks,
        widest: grouped.widest_name(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_menu_end_to_end() {
        let menu = build_menu(
            &["build", "build_debug", "build_release", "test"],
            &MenuOptions::default(),
        )
        .unwrap();
        let names: Vec<&str> = menu.blocks.iter().map(|b| b.name()).collect();
        assert_eq!(names, vec!["default", "build"]);
        assert_eq!(menu.blocks[0].key(), 'd');
        assert_eq!(menu.blocks[1].key(), 'b');

        let build = menu.group_by_key('b').unwrap();
        let shortcuts: Vec<&str> = build.targets.iter().map(|c| c.shortcut.as_str()).collect();
        assert_eq!(shortcuts, vec!["bb", "bd", "br"]);
        let debug = build.target_by_key('d').unwrap();
        assert_eq!(debug.target.as_deref(), Some("build_debug"));
        assert_eq!(debug.label.before, "build_");
        assert_eq!(debug.label.after, "ebug");

        let test = menu.find_target("test").unwrap();
        assert_eq!(test.shortcut, "dt");
        assert_eq!(menu.target_count(), 4);
        assert_eq!(menu.widest, "build_release".len());
    }

    #[test]
    fn unprefixed_shortcuts_are_the_target_key() {
        let opts = MenuOptions {
            prefix_group_keys: false,
            ..MenuOptions::default()
        };
        let menu = build_menu(&["build_a", "build_b"], &opts).unwrap();
        let block = &menu.blocks[0];
        assert!(block.header.is_header());
        assert_eq!(block.header.shortcut, "b");
        let shortcuts: Vec<&str> = block.targets.iter().map(|c| c.shortcut.as_str()).collect();
        assert_eq!(shortcuts, vec!["a", "b"]);
        assert_eq!(block.height(), 3);
        assert_eq!(block.cells().count(), 3);
    }

    #[test]
    fn empty_names_build_an_empty_menu() {
        let empty: [&str; 0] = [];
        let menu = build_menu(&empty, &MenuOptions::default()).unwrap();
        assert!(menu.is_empty());
        assert_eq!(menu.widest, 0);
    }
}
