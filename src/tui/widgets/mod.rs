// TUI widget modules for each screen zone.

pub mod input_box;
pub mod notice;
pub mod quit_confirm;
pub mod status_bar;
pub mod transcript;
pub mod visualization;
