//! Reusable building blocks shared by the screens.

pub mod form;
pub mod list_pane;
pub mod overlay;
