//! Resolve content-platform URLs into uniform media descriptions and
//! optionally download the referenced files.

pub mod config;
pub mod media;
pub mod utils;
