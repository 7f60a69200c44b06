pub mod time_format;

pub use time_format::{cst_date, cst_now, file_mtime_cst, format_http_date};
