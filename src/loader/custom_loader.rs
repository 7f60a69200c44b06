//! 自定义指令文件加载器

use clearurls_merge_engine::{DirectiveDocument, MergeReport};
use std::fs;
use std::path::Path;

use crate::error::MergeResult;
use crate::utils::file_mtime_cst;

/// 已加载的自定义指令
#[derive(Debug, Clone, Default)]
pub struct CustomDirectives {
    pub document: DirectiveDocument,
    /// 指令文件修改时间（CST），文件缺失时为 "N/A (File not found)"
    pub modified: String,
}

#[derive(Default)]
pub struct CustomRuleLoader;

impl CustomRuleLoader {
    /// 读取并解析指令文件
    /// 文件不存在只记录告警，按空指令继续构建；存在但解析失败则是致命错误
    pub fn load(&self, path: &Path, report: &mut MergeReport) -> MergeResult<CustomDirectives> {
        let modified = file_mtime_cst(path);

        if !path.is_file() {
            report.warn(format!(
                "[!] Custom rules file {} not found, only upstream rules will be published.",
                path.display()
            ));
            return Ok(CustomDirectives {
                document: DirectiveDocument::default(),
                modified,
            });
        }

        report.info(format!("[-] Loading custom rules from {}...", path.display()));
        let content = fs::read_to_string(path)?;
        let document = DirectiveDocument::from_yaml_str(&content)?;

        log::debug!(
            "Loaded directives: {} add, {} modify, {} delete",
            document.add_providers.len(),
            document.modify_providers.len(),
            document.del_providers.len()
        );

        Ok(CustomDirectives { document, modified })
    }
}
