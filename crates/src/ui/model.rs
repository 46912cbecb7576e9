use crate::layout::{layout_menu, Grid, LayoutOptions};
use crate::menu::{GroupBlock, Menu};

pub const MODELINE_LINES: usize = 1;
pub const DEFAULT_WIDTH: usize = 80;
pub const DEFAULT_HEIGHT: usize = 24;

#[derive(Clone, Debug, Default)]
pub struct Model {
    pub menu: Menu,
    pub layout: LayoutOptions,
    pub grid: Grid,
    pub screen_width: usize,
    pub screen_height: usize,
    // group key pressed, waiting for a target key
    pub focused: Option<char>,
    pub selected: Option<String>,
    pub err: String,
    pub quit: bool,
}

pub fn initial_model(menu: Menu, layout: LayoutOptions) -> Model {
    let mut m = Model {
        menu,
        layout,
        screen_width: DEFAULT_WIDTH,
        screen_height: DEFAULT_HEIGHT,
        ..Model::default()
    };
    m.relayout();
    m
}

impl Model {
    pub fn update(&mut self, msg: crate::ui::Msg) {
        crate::ui::update::handle_update(self, msg);
    }

    pub fn width(&self) -> usize {
        if self.screen_width > 0 {
            self.screen_width
        } else {
            DEFAULT_WIDTH
        }
    }

    pub fn height(&self) -> usize {
        if self.screen_height > 0 {
            self.screen_height
        } else {
            DEFAULT_HEIGHT
        }
    }

    pub fn relayout(&mut self) {
        self.grid = layout_menu(&self.menu, &self.layout, self.width());
    }

    pub fn focused_block(&self) -> Option<&GroupBlock> {
        self.focused.and_then(|k| self.menu.group_by_key(k))
    }

    pub fn mode(&self) -> String {
        match self.focused_block() {
            Some(b) => b.name().to_string(),
            None => "groups".to_string(),
        }
    }

    pub fn render_main_content(&self) -> Vec<String> {
        crate::ui::render::render_grid(&self.grid, self.focused, self.width())
    }

    pub fn render_modeline_padded(&self) -> String {
        crate::ui::render::render_modeline_padded(self)
    }

    pub fn render_full(&self) -> String {
        crate::ui::render::render_full(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu::{build_menu, MenuOptions};

    fn model() -> Model {
        let menu = build_menu(
            &["build", "build_debug", "build_release", "test"],
            &MenuOptions::default(),
        )
        .unwrap();
        initial_model(menu, LayoutOptions::default())
    }

    #[test]
    fn initial_model_lays_out_at_default_width() {
        let m = model();
        assert_eq!(m.width(), DEFAULT_WIDTH);
        assert_eq!(m.grid.blocks().count(), 2);
        assert_eq!(m.mode(), "groups");
    }

    #[test]
    fn mode_names_the_focused_group() {
        let mut m = model();
        m.focused = Some('b');
        assert_eq!(m.mode(), "build");
        m.focused = Some('z');
        assert_eq!(m.mode(), "groups");
    }
}
