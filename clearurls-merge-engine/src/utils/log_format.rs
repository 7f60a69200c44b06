use std::fmt::{self, Write};

// ======================== 单条模式预览 ========================
/// 空白折叠 + 截断的日志预览，不产生中间 String
/// 超长正则（上游部分 rawRules 上百字符）在告警里只显示前 max_len 个字符
pub fn preview_compact<'a>(s: &'a str, max_len: usize) -> impl fmt::Display + 'a {
    struct CompactView<'a> {
        source: &'a str,
        max_length: usize,
    }

    impl fmt::Display for CompactView<'_> {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            let mut char_count = 0;
            let mut last_was_whitespace = false;

            for ch in self.source.chars() {
                if char_count >= self.max_length {
                    f.write_str("…")?;
                    break;
                }

                if ch.is_whitespace() {
                    if !last_was_whitespace {
                        f.write_char(' ')?;
                        char_count += 1;
                        last_was_whitespace = true;
                    }
                } else {
                    f.write_char(ch)?;
                    char_count += 1;
                    last_was_whitespace = false;
                }
            }
            Ok(())
        }
    }

    CompactView {
        source: s,
        max_length: max_len,
    }
}

// ======================== 条目列表格式化 ========================
/// 合并日志里的条目列表：['a', 'b', …] (total: N)
pub fn format_items<S: AsRef<str>>(items: &[S]) -> String {
    const MAX_COUNT: usize = 10;
    const MAX_ITEM_LEN: usize = 60;

    let mut result = String::from("[");
    for (idx, item) in items.iter().take(MAX_COUNT).enumerate() {
        if idx > 0 {
            result.push_str(", ");
        }
        // 写入 String 不会失败
        let _ = write!(result, "'{}'", preview_compact(item.as_ref(), MAX_ITEM_LEN));
    }
    if items.len() > MAX_COUNT {
        let _ = write!(result, ", … (total: {})", items.len());
    }
    result.push(']');
    result
}
