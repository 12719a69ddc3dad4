//! Infrastructure layer - adapters to the live desktop

pub mod extensions;
pub mod gsettings;
