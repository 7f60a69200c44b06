pub mod log_format;

pub use log_format::{format_items, preview_compact};
