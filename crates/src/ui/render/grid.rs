use crate::layout::Grid;
use crate::ui::render::decorate::{cell_segments, cell_width, paint};

// blank columns after the widest cell when columns take their natural width
pub const COLUMN_GAP: usize = 2;

pub fn column_widths(grid: &Grid) -> Vec<usize> {
    match grid.column_width {
        Some(w) => vec![w; grid.columns],
        None => (0..grid.columns)
            .map(|c| {
                grid.column(c)
                    .flat_map(|b| b.cells())
                    .map(cell_width)
                    .max()
                    .map_or(0, |w| w + COLUMN_GAP)
            })
            .collect(),
    }
}

/// One string per screen line, never wider than `total_width`. Blocks outside
/// the focused group are dimmed. Grid rows are separated by a blank line.
pub fn render_grid(grid: &Grid, focused: Option<char>, total_width: usize) -> Vec<String> {
    let widths = column_widths(grid);
    let mut lines = Vec::new();
    for (r, row) in grid.rows.iter().enumerate() {
        if r > 0 {
            lines.push(String::new());
        }
        let height = row.iter().map(|b| b.height()).max().unwrap_or(0);
        for line in 0..height {
            let mut out = String::new();
            let mut remaining = total_width;
            for (c, block) in row.iter().enumerate() {
                let w = widths.get(c).copied().unwrap_or(0).min(remaining);
                if w == 0 {
                    break;
                }
                let last = c + 1 == row.len();
                let budget = if last { w } else { w.saturating_sub(1) };
                let dimmed = focused.is_some_and(|k| k != block.key());
                let (text, used) = block
                    .cells()
                    .nth(line)
                    .map(|cell| paint(&cell_segments(cell, dimmed), budget))
                    .unwrap_or_default();
                out.push_str(&text);
                if !last {
                    out.push_str(&" ".repeat(w - used));
                }
                remaining -= w;
            }
            lines.push(out.trim_end().to_string());
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{layout_menu, LayoutOptions};
    use crate::menu::{build_menu, Menu, MenuOptions};
    use regex::Regex;

    fn strip_ansi(s: &str) -> String {
        let re = Regex::new(r"\x1b\[[0-9;?]*[ -/]*[@-~]").unwrap();
        re.replace_all(s, "").to_string()
    }

    fn menu() -> Menu {
        build_menu(
            &["build", "build_debug", "build_release", "test"],
            &MenuOptions::default(),
        )
        .unwrap()
    }

    fn plain(lines: &[String]) -> Vec<String> {
        lines.iter().map(|l| strip_ansi(l)).collect()
    }

    #[test]
    fn columns_take_their_natural_width() {
        let grid = layout_menu(&menu(), &LayoutOptions::default(), 80);
        assert_eq!(column_widths(&grid)[..2], [9, 17]);
        let lines = plain(&render_grid(&grid, None, 80));
        assert_eq!(
            lines,
            vec![
                "default  build",
                "  test     build",
                "           build_debug",
                "           build_release",
            ]
        );
    }

    #[test]
    fn spread_columns_share_the_width() {
        let opts = LayoutOptions {
            spread: true,
            ..LayoutOptions::default()
        };
        let grid = layout_menu(&menu(), &opts, 40);
        assert_eq!(grid.columns, 2);
        let lines = plain(&render_grid(&grid, None, 40));
        assert_eq!(lines[0], format!("default{}build", " ".repeat(13)));
    }

    #[test]
    fn rows_are_separated_and_clipped() {
        let grid = layout_menu(&menu(), &LayoutOptions::default(), 10);
        assert_eq!(grid.columns, 1);
        let lines = plain(&render_grid(&grid, None, 10));
        assert_eq!(lines.len(), 2 + 1 + 4);
        assert_eq!(lines[2], "");
        assert_eq!(lines[4], "  build");
        assert_eq!(lines[5], "  build_de");
        assert!(lines.iter().all(|l| l.chars().count() <= 10));
    }

    #[test]
    fn focus_keeps_the_text() {
        let grid = layout_menu(&menu(), &LayoutOptions::default(), 80);
        let focused = plain(&render_grid(&grid, Some('b'), 80));
        let unfocused = plain(&render_grid(&grid, None, 80));
        assert_eq!(focused, unfocused);
    }

    #[test]
    fn empty_grid_renders_nothing() {
        let grid = layout_menu(&Menu::default(), &LayoutOptions::default(), 80);
        assert!(render_grid(&grid, None, 80).is_empty());
    }
}
