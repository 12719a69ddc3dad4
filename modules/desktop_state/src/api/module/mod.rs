//! Module invocation layer: JSON arguments in, JSON results out

pub mod dto;
pub mod error;
pub mod handlers;
pub mod mapper;

pub use handlers::{run_gnome_extension, run_gsettings};
