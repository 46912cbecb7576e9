use crate::group::GroupedTargets;
use crate::menu::{GroupBlock, Menu, MenuCell};

pub const DEFAULT_COLUMN_PADDING: usize = 6;

#[derive(Clone, Debug)]
pub struct LayoutOptions {
    pub heading: Option<String>,
    pub column_limit: Option<usize>,
    /// Give every column `total_width / columns` instead of its intrinsic width.
    pub spread: bool,
    /// Added to the widest name when computing the natural column count.
    pub padding: usize,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            heading: None,
            column_limit: None,
            spread: false,
            padding: DEFAULT_COLUMN_PADDING,
        }
    }
}

/// Group blocks packed into columns, read row by row.
///
/// Row `r` holds the `r`-th block of each column that has one. Blocks are
/// dealt round-robin, so columns never grow from left to right and a short
/// row only ever lacks its trailing columns.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Grid {
    pub heading: Option<String>,
    pub columns: usize,
    pub column_width: Option<usize>,
    pub rows: Vec<Vec<GroupBlock>>,
}

impl Grid {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column(&self, c: usize) -> impl Iterator<Item = &GroupBlock> {
        self.rows.iter().filter_map(move |row| row.get(c))
    }

    pub fn blocks(&self) -> impl Iterator<Item = &GroupBlock> {
        self.rows.iter().flatten()
    }

    pub fn cells(&self) -> impl Iterator<Item = &MenuCell> {
        self.blocks().flat_map(GroupBlock::cells)
    }

    pub fn find_shortcut(&self, shortcut: &str) -> Option<&MenuCell> {
        self.cells().find(|c| c.shortcut == shortcut)
    }
}

/// How many columns of `widest + padding` fit in `total_width`, at least one
/// and at most `limit`.
pub fn natural_columns(widest: usize, total_width: usize, padding: usize, limit: Option<usize>) -> usize {
    let natural = (total_width / (widest + padding).max(1)).max(1);
    match limit {
        Some(l) => natural.min(l.max(1)),
        None => natural,
    }
}

pub fn column_count(
    grouped: &GroupedTargets,
    total_width: usize,
    padding: usize,
    limit: Option<usize>,
) -> usize {
    natural_columns(grouped.widest_name(), total_width, padding, limit)
}

pub fn layout(
    heading: Option<String>,
    columns: usize,
    items: Vec<GroupBlock>,
    spread: bool,
    total_width: usize,
) -> Grid {
    let columns = columns.max(1);
    let mut buckets: Vec<Vec<GroupBlock>> = vec![Vec::new(); columns];
    for (i, block) in items.into_iter().enumerate() {
        buckets[i % columns].push(block);
    }
    let row_count = buckets.first().map_or(0, Vec::len);
    let mut drains: Vec<_> = buckets.into_iter().map(Vec::into_iter).collect();
    let rows = (0..row_count)
        .map(|_| drains.iter_mut().filter_map(|col| col.next()).collect())
        .collect();
    Grid {
        heading,
        columns,
        column_width: spread.then(|| total_width / columns),
        rows,
    }
}

pub fn layout_menu(menu: &Menu, opts: &LayoutOptions, total_width: usize) -> Grid {
    let columns = natural_columns(menu.widest, total_width, opts.padding, opts.column_limit);
    layout(
        opts.heading.clone(),
        columns,
        menu.blocks.clone(),
        opts.spread,
        total_width,
    )
}
