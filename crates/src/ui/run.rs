use crate::error::{Error, Result};
use crate::layout::{layout_menu, LayoutOptions};
use crate::menu::Menu;
use crate::ui::model::Model;
use crate::ui::render::decorate::{paint, seg};
use crate::ui::render::grid::render_grid;
use crate::ui::render::styles::STYLE_TITLE;
use crate::ui::Msg;
use bubbletea_rs::{
    command::Cmd, event::KeyMsg, event::WindowSizeMsg, model::Model as TeaModel, window_size,
    Program,
};
use crossterm::event::{KeyCode, KeyModifiers};
use once_cell::sync::OnceCell;
use tracing::debug;

// `TeaModel::init` takes no arguments, so the prepared model is parked here.
static INITIAL: OnceCell<Model> = OnceCell::new();

// Adapter type implementing bubbletea-rs Model trait by delegating to our Model
pub struct TeaAdapter {
    pub inner: Model,
}

impl TeaAdapter {
    fn apply(&mut self, msg: Msg) -> Option<Cmd> {
        self.inner.update(msg);
        if self.inner.quit {
            Some(bubbletea_rs::quit())
        } else {
            None
        }
    }
}

impl TeaModel for TeaAdapter {
    fn init() -> (Self, Option<Cmd>) {
        let mut adapter = TeaAdapter {
            inner: INITIAL.get().cloned().unwrap_or_default(),
        };
        let (width, height) = crossterm::terminal::size().unwrap_or((80, 24));
        adapter.inner.update(Msg::WindowSize {
            width: width as usize,
            height: height as usize,
        });
        (adapter, Some(window_size()))
    }

    fn update(&mut self, msg: bubbletea_rs::event::Msg) -> Option<Cmd> {
        if let Some(km) = msg.downcast_ref::<KeyMsg>() {
            return match &km.key {
                KeyCode::Enter => self.apply(Msg::KeyEnter),
                KeyCode::Backspace => self.apply(Msg::KeyBackspace),
                KeyCode::Esc => self.apply(Msg::KeyEsc),
                KeyCode::Char(ch) if km.modifiers.contains(KeyModifiers::CONTROL) => {
                    match ch {
                        'c' | 'C' => Some(bubbletea_rs::quit()),
                        _ => None,
                    }
                }
                KeyCode::Char(ch) => self.apply(Msg::Rune(*ch)),
                _ => None,
            };
        }
        if let Some(ws) = msg.downcast_ref::<WindowSizeMsg>() {
            self.inner.update(Msg::WindowSize {
                width: ws.width as usize,
                height: ws.height as usize,
            });
        }
        None
    }

    fn view(&self) -> String {
        self.inner.render_full()
    }
}

/// Run the interactive picker and return the chosen target, if any.
///
/// Only one picker can run per process.
pub async fn run(model: Model) -> Result<Option<String>> {
    INITIAL
        .set(model)
        .map_err(|_| Error::Program("picker already started".to_string()))?;
    let program = Program::<TeaAdapter>::builder()
        .alt_screen(true)
        .signal_handler(true)
        .build()
        .map_err(|e| Error::Program(format!("failed to build program: {e:?}")))?;
    let final_model = program
        .run()
        .await
        .map_err(|e| Error::Program(format!("{e:?}")))?;
    debug!(selected = ?final_model.inner.selected, "picker closed");
    Ok(final_model.inner.selected)
}

/// The grid for `menu` as it would appear on a `width` column screen, without
/// the modeline.
pub fn print_grid(menu: &Menu, opts: &LayoutOptions, width: usize) -> String {
    let grid = layout_menu(menu, opts, width);
    let mut lines = Vec::new();
    if let Some(heading) = &grid.heading {
        lines.push(paint(&[seg(heading.as_str(), &*STYLE_TITLE)], width).0);
        lines.push(String::new());
    }
    lines.extend(render_grid(&grid, None, width));
    lines.join("\n")
}
