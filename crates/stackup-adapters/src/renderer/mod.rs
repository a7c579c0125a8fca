//! Rendering adapters.

mod simple;

pub use simple::{PROJECT_CONFIG_FILE, SimpleRenderer};
