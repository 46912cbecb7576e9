use lipgloss::Style;

/// Pad every line to `total_width` and the block to exactly `height` lines.
pub fn pad_screen(mut lines: Vec<String>, total_width: usize, height: usize) -> String {
    let line_style = Style::new().width(total_width as i32);
    lines.truncate(height);
    lines.resize(height, String::new());
    lines
        .iter()
        .map(|l| line_style.render(l))
        .collect::<Vec<_>>()
        .join("\n")
}

/// First `width` characters of `s`.
pub fn fit(s: &str, width: usize) -> String {
    s.chars().take(width).collect()
}
