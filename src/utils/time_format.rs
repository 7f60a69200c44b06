//! 时间格式化工具
//! 构建日志与徽章统一使用北京时间（UTC+8）
use chrono::{DateTime, FixedOffset, Offset, Utc};
use std::path::Path;

const CST_OFFSET_SECS: i32 = 8 * 3600;
const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn cst() -> FixedOffset {
    FixedOffset::east_opt(CST_OFFSET_SECS).unwrap_or_else(|| Utc.fix())
}

/// 当前北京时间 `YYYY-MM-DD HH:MM:SS`
pub fn cst_now() -> String {
    Utc::now().with_timezone(&cst()).format(DATETIME_FORMAT).to_string()
}

/// 当前北京日期 `YYYY-MM-DD`（徽章用）
pub fn cst_date() -> String {
    Utc::now().with_timezone(&cst()).format("%Y-%m-%d").to_string()
}

/// HTTP `Last-Modified`（RFC 2822 / GMT）转北京时间；无法解析时原样返回
pub fn format_http_date(raw: Option<&str>) -> String {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return "Unknown".to_string();
    };
    match DateTime::parse_from_rfc2822(raw) {
        Ok(dt) => dt.with_timezone(&cst()).format(DATETIME_FORMAT).to_string(),
        Err(_) => raw.to_string(),
    }
}

/// 文件最后修改时间（北京时间）
pub fn file_mtime_cst(path: &Path) -> String {
    match std::fs::metadata(path).and_then(|meta| meta.modified()) {
        Ok(modified) => DateTime::<Utc>::from(modified)
            .with_timezone(&cst())
            .format(DATETIME_FORMAT)
            .to_string(),
        Err(_) => "N/A (File not found)".to_string(),
    }
}
