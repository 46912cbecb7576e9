// Render module split into focused submodules.

pub mod decorate;
pub mod full;
pub mod grid;
pub mod modeline;
pub mod styles;
pub mod util;

pub use decorate::{cell_segments, paint};
pub use full::render_full;
pub use grid::render_grid;
pub use modeline::{render_modeline, render_modeline_padded};
