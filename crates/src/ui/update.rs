use crate::menu::MenuCell;
use crate::ui::model::Model;
use tracing::debug;

pub fn handle_update(m: &mut Model, msg: crate::ui::Msg) {
    match msg {
        crate::ui::Msg::WindowSize { width, height } => handle_window_size(m, width, height),
        crate::ui::Msg::KeyBackspace => handle_key_backspace(m),
        crate::ui::Msg::KeyEnter => handle_key_enter(m),
        crate::ui::Msg::KeyEsc => handle_key_esc(m),
        crate::ui::Msg::Rune(r) => handle_rune(m, r),
    }
}

fn handle_window_size(m: &mut Model, width: usize, height: usize) {
    m.screen_width = width;
    m.screen_height = height;
    m.relayout();
}

fn handle_key_backspace(m: &mut Model) {
    m.err.clear();
    m.focused = None;
}

fn handle_key_esc(m: &mut Model) {
    m.err.clear();
    if m.focused.take().is_none() {
        m.quit = true;
    }
}

fn handle_key_enter(m: &mut Model) {
    let Some(block) = m.focused_block() else {
        m.err = "pick a group first".to_string();
        return;
    };
    match block.targets.as_slice() {
        [only] => {
            let only = only.clone();
            select(m, only);
        }
        _ => m.err = format!("{} has {} targets", block.name(), block.targets.len()),
    }
}

// Exact key first, then the other case.
fn match_key<T>(r: char, find: impl Fn(char) -> Option<T>) -> Option<T> {
    find(r).or_else(|| {
        let flipped = if r.is_uppercase() {
            r.to_lowercase().next()
        } else {
            r.to_uppercase().next()
        };
        flipped.filter(|&f| f != r).and_then(&find)
    })
}

fn handle_rune(m: &mut Model, r: char) {
    m.err.clear();
    match m.focused_block() {
        None => match match_key(r, |k| m.menu.group_by_key(k).map(|b| b.key())) {
            Some(key) => {
                debug!(key = %key, "focused group");
                m.focused = Some(key);
            }
            None => m.err = format!("no group on '{r}'"),
        },
        Some(block) => match match_key(r, |k| block.target_by_key(k).cloned()) {
            Some(cell) => select(m, cell),
            None => m.err = format!("no target on '{r}' in {}", block.name()),
        },
    }
}

fn select(m: &mut Model, cell: MenuCell) {
    debug!(shortcut = %cell.shortcut, "selected target");
    m.selected = cell.target;
    m.quit = true;
}
