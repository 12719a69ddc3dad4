//! GNOME Shell extension adapters

pub mod directories;
pub mod manager;

pub use directories::{ExtensionDirectories, DEFAULT_EXTENSION_DIRS};
pub use manager::GnomeExtensionsCli;
