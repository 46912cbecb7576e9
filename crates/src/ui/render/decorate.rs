use crate::menu::{CellKind, MenuCell};
use crate::ui::render::styles::{STYLE_ACE, STYLE_DIM, STYLE_HEADER, STYLE_LABEL};
use lipgloss::Style;

pub const TARGET_INDENT: &str = "  ";

/// A run of text sharing one style.
#[derive(Clone)]
pub struct Segment {
    pub text: String,
    pub style: &'static Style,
}

pub fn seg(text: impl Into<String>, style: &'static Style) -> Segment {
    Segment {
        text: text.into(),
        style,
    }
}

/// Split a cell into styled runs. The key is highlighted unless `dimmed`.
pub fn cell_segments(cell: &MenuCell, dimmed: bool) -> Vec<Segment> {
    let base: &'static Style = match (dimmed, cell.kind) {
        (true, _) => &*STYLE_DIM,
        (false, CellKind::Header) => &*STYLE_HEADER,
        (false, CellKind::Target) => &*STYLE_LABEL,
    };
    let ace: &'static Style = if dimmed { &*STYLE_DIM } else { &*STYLE_ACE };
    let label = &cell.label;
    let mut out = Vec::with_capacity(5);
    if cell.kind == CellKind::Target {
        out.push(seg(TARGET_INDENT, base));
    }
    out.push(seg(label.before.as_str(), base));
    if label.in_word {
        out.push(seg(label.key, ace));
        out.push(seg(label.after.as_str(), base));
    } else {
        out.push(seg(" (", base));
        out.push(seg(label.key, ace));
        out.push(seg(")", base));
    }
    out
}

pub fn cell_width(cell: &MenuCell) -> usize {
    let indent = match cell.kind {
        CellKind::Header => 0,
        CellKind::Target => TARGET_INDENT.len(),
    };
    indent + cell.label.width()
}

/// Render runs up to `budget` characters; returns the text and its plain width.
pub fn paint(segments: &[Segment], budget: usize) -> (String, usize) {
    let mut out = String::new();
    let mut used = 0usize;
    for seg in segments {
        if used >= budget {
            break;
        }
        let text: String = seg.text.chars().take(budget - used).collect();
        if text.is_empty() {
            continue;
        }
        used += text.chars().count();
        out.push_str(&seg.style.render(&text));
    }
    (out, used)
}
