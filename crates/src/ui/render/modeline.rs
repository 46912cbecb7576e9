use crate::ui::model::Model;
use crate::ui::render::styles::STYLE_MODELINE;
use crate::ui::render::util::fit;
use lipgloss::Color;

fn key_pairs(m: &Model) -> Vec<(&'static str, &'static str)> {
    if m.focused.is_some() {
        vec![("key", "run"), ("⏎", "only"), ("⌫", "back"), ("⎋", "back")]
    } else {
        vec![("key", "group"), ("⎋", "quit")]
    }
}

pub fn render_modeline(m: &Model, inner_max: usize, mode: &str) -> String {
    let inner_style = STYLE_MODELINE.clone().padding(0, 0, 0, 0);
    let key_style = STYLE_MODELINE
        .clone()
        .foreground(Color::from_rgb(238, 0, 238))
        .bold(true)
        .padding(0, 0, 0, 0);
    let err_style = STYLE_MODELINE
        .clone()
        .foreground(Color::from_rgb(255, 95, 95))
        .padding(0, 0, 0, 0);

    let pairs: Vec<(String, usize)> = key_pairs(m)
        .iter()
        .map(|(k, d)| {
            let plain_len = d.chars().count() + 1 + k.chars().count();
            let rendered = format!(
                "{}{}{}",
                inner_style.render(d),
                inner_style.render(":"),
                key_style.render(k)
            );
            (rendered, plain_len)
        })
        .collect();
    let pair_sep_width = 2usize;

    let mode_style = STYLE_MODELINE
        .clone()
        .background(Color::from_rgb(101, 101, 101))
        .padding(0, 1, 0, 1)
        .bold(true);
    let sep_w = " | ".chars().count();
    let mode = fit(mode, inner_max.saturating_sub(2 + sep_w));
    let mode_w = mode.chars().count() + 2;
    let avail = inner_max.saturating_sub(mode_w + sep_w);

    // the error message wins over the key hints
    let err = fit(&m.err, avail);
    let err_w = err.chars().count();
    let mut pairs_count = pairs.len();
    let width_of = |n: usize| {
        pairs.iter().take(n).map(|(_, w)| *w).sum::<usize>() + pair_sep_width * n.saturating_sub(1)
    };
    while pairs_count > 0 && width_of(pairs_count) + err_w + 1 > avail {
        pairs_count -= 1;
    }
    let left_width = width_of(pairs_count);
    let left = pairs
        .iter()
        .take(pairs_count)
        .map(|(r, _)| r.clone())
        .collect::<Vec<_>>()
        .join(&inner_style.render("  "));

    let pad = avail.saturating_sub(left_width + err_w);
    let filler = if pad > 0 {
        STYLE_MODELINE.clone().width(pad as i32).render("")
    } else {
        String::new()
    };
    let right = if err.is_empty() {
        String::new()
    } else {
        err_style.render(&err)
    };

    format!(
        "{}{}{left}{filler}{right}",
        mode_style.render(&mode),
        inner_style.render(" | ")
    )
}

pub fn render_modeline_padded(m: &Model) -> String {
    let total_width = m.width();
    // leave room for the outer padding plus one column
    let inner_max = total_width.saturating_sub(3);
    let modeline = render_modeline(m, inner_max, &m.mode());
    let modeline_single = modeline.replace('\n', " ");
    STYLE_MODELINE
        .clone()
        .width(total_width as i32)
        .render(&modeline_single)
}
