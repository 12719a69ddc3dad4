//! API layer: the in-process client and the JSON module surface

pub mod module;
pub mod native;
