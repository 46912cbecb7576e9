use crate::ui::model::{Model, MODELINE_LINES};
use crate::ui::render::decorate::{paint, seg};
use crate::ui::render::styles::STYLE_TITLE;
use crate::ui::render::util::pad_screen;

/// Heading, grid and modeline, exactly `width` x `height` after ANSI stripping.
pub fn render_full(m: &Model) -> String {
    let width = m.width();
    let height = m.height();
    let mut lines = Vec::new();
    if let Some(heading) = &m.grid.heading {
        lines.push(paint(&[seg(heading.as_str(), &*STYLE_TITLE)], width).0);
        lines.push(String::new());
    }
    lines.extend(m.render_main_content());
    let modeline = crate::ui::render::modeline::render_modeline_padded(m)
        .lines()
        .next()
        .unwrap_or("")
        .to_string();
    let body_height = height.saturating_sub(MODELINE_LINES);
    if body_height == 0 {
        return modeline;
    }
    format!("{}\n{modeline}", pad_screen(lines, width, body_height))
}
