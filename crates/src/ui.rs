// UI module root: split implementation into focused submodules under `ui/`

pub mod model;
pub mod render;
pub mod run;
pub mod update;

pub use model::{initial_model, Model};
pub use render::{render_full, render_grid, render_modeline, render_modeline_padded};
pub use run::{print_grid, run};
pub use update::handle_update;

// Messages used by the update logic
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Msg {
    WindowSize { width: usize, height: usize },
    KeyBackspace,
    KeyEnter,
    KeyEsc,
    Rune(char),
}
