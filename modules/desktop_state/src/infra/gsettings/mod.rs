//! GSettings store adapter

pub mod cli;
pub mod text;

pub use cli::GsettingsCli;
