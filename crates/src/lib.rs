//! tmenu - keyed grid menus for build targets
//!
//! Library crate exposing the grouping, sorting, key assignment and layout
//! passes used by the binary, plus the terminal picker built on them.
//!
//! Tests live close to the modules they exercise as unit tests; property
//! tests are under `tests/`.

pub mod acekey;
pub mod config;
pub mod error;
pub mod group;
pub mod layout;
pub mod logging;
pub mod menu;
pub mod sort;
pub mod target;

pub mod ui;

pub use error::{Error, Result};
pub use menu::{build_menu, Menu, MenuOptions};
