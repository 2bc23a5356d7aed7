pub mod logging;
pub mod tui;
