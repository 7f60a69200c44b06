//! 负责整体合并流程的串联
//! 顺序：add → modify → del。删除最后执行，同一 Provider 同时出现在删除列表和
//! add / modify 中时以删除为准。
use rustc_hash::FxHashSet;

use super::merge_report::MergeReport;
use crate::cleaner::PatternValidator;
use crate::core::{Provider, RuleSet};
use crate::directive::{DirectiveDocument, FieldDirective, ListOp, ProviderPatch};
use crate::error::{EngineError, EngineResult};
use crate::utils::{format_items, preview_compact};

/// add-providers 中的 Provider 已存在于上游时的处理策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicateAddPolicy {
    /// 终止本次构建，避免掩盖上游的新增
    #[default]
    Fail,
    /// 记录告警，并按 modify 语义合并
    Merge,
}

/// 合并选项
#[derive(Debug, Clone)]
pub struct MergeOptions {
    pub duplicate_add: DuplicateAddPolicy,
    /// 是否用 regex 引擎检查被改动 Provider 的模式
    pub validate_patterns: bool,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            duplicate_add: DuplicateAddPolicy::Fail,
            validate_patterns: true,
        }
    }
}

/// 合并结果
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    pub rule_set: RuleSet,
    pub report: MergeReport,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Add,
    Modify,
}

/// 规则合并器
#[derive(Debug, Default)]
pub struct RuleMerger {
    options: MergeOptions,
}

impl RuleMerger {
    pub fn new(options: MergeOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &MergeOptions {
        &self.options
    }

    /// 合并上游规则与指令文档
    pub fn merge(
        &self,
        upstream: RuleSet,
        directives: &DirectiveDocument,
    ) -> EngineResult<MergeOutcome> {
        let start = std::time::Instant::now();
        let mut report = MergeReport::new();
        let mut validator = PatternValidator::default();
        let mut rule_set = upstream;
        report.stats.upstream_providers = rule_set.len() as u32;

        report.info("[-] Processing rules...");

        for section in &directives.unknown_sections {
            report.warn(format!("    [WARN] Unknown section '{}' ignored.", section));
        }

        let deleted: FxHashSet<&str> = directives
            .del_providers
            .iter()
            .map(String::as_str)
            .collect();
        // 同时出现在 add / modify 中的删除项，冲突告警已在 upsert 时给出
        let overridden: FxHashSet<&str> = directives
            .add_providers
            .iter()
            .chain(&directives.modify_providers)
            .map(|(name, _)| name.as_str())
            .filter(|name| deleted.contains(name))
            .collect();

        // 1. 新增
        for (name, patch) in &directives.add_providers {
            self.upsert_provider(
                &mut rule_set,
                name,
                patch,
                Section::Add,
                &deleted,
                &mut validator,
                &mut report,
            )?;
        }

        // 2. 修改
        for (name, patch) in &directives.modify_providers {
            self.upsert_provider(
                &mut rule_set,
                name,
                patch,
                Section::Modify,
                &deleted,
                &mut validator,
                &mut report,
            )?;
        }

        // 3. 删除
        for name in &directives.del_providers {
            if rule_set.providers.remove(name).is_some() {
                report.info(format!("    [Delete] {}", name));
                report.stats.deleted_providers += 1;
            } else if overridden.contains(name.as_str()) {
                report.info(format!("    [Skip  ] {} (not in upstream)", name));
            } else {
                report.warn(format!(
                    "    [WARN] Delete failed: Provider '{}' not found in upstream.",
                    name
                ));
            }
        }

        report.stats.merged_providers = rule_set.len() as u32;
        report.stats.print_stats(start.elapsed());

        Ok(MergeOutcome { rule_set, report })
    }

    #[allow(clippy::too_many_arguments)]
    fn upsert_provider(
        &self,
        rule_set: &mut RuleSet,
        name: &str,
        patch: &ProviderPatch,
        section: Section,
        deleted: &FxHashSet<&str>,
        validator: &mut PatternValidator,
        report: &mut MergeReport,
    ) -> EngineResult<()> {
        if deleted.contains(name) {
            report.warn(format!(
                "    [WARN] '{}' is also listed in del-providers; deletion wins.",
                name
            ));
            return Ok(());
        }

        if patch.is_empty() {
            report.info(format!("    [Skip  ] {} (no fields)", name));
            return Ok(());
        }

        let exists = rule_set.contains(name);
        match (section, exists) {
            (Section::Add, true) => match self.options.duplicate_add {
                DuplicateAddPolicy::Fail => {
                    return Err(EngineError::DuplicateProvider(name.to_string()));
                }
                DuplicateAddPolicy::Merge => {
                    report.warn(format!(
                        "    [WARN] Duplicate Add: '{}' exists. Merging changes.",
                        name
                    ));
                    report.stats.modified_providers += 1;
                }
            },
            (Section::Add, false) => {
                report.info(format!("    [Create] {}", name));
                report.stats.created_providers += 1;
            }
            (Section::Modify, true) => {
                report.info(format!("    [Modify] {}", name));
                report.stats.modified_providers += 1;
            }
            (Section::Modify, false) => {
                report.warn(format!(
                    "    [WARN] Missing Modify: '{}' missing. Creating new.",
                    name
                ));
                report.stats.created_providers += 1;
            }
        }

        let provider = rule_set
            .providers
            .entry(name.to_string())
            .or_insert_with(Provider::template);

        apply_patch(name, provider, patch, report);

        if self.options.validate_patterns {
            for (field, pattern) in provider.patterns() {
                if let Some(err) = validator.check(pattern) {
                    report.stats.invalid_patterns += 1;
                    report.warn(format!(
                        "        [WARN] '{}' ({}): pattern '{}' rejected by regex engine: {}",
                        name,
                        field,
                        preview_compact(pattern, 80),
                        err
                    ));
                }
            }
        }

        Ok(())
    }
}

/// 把字段指令依次作用到单个 Provider 上
pub fn apply_patch(
    name: &str,
    provider: &mut Provider,
    patch: &ProviderPatch,
    report: &mut MergeReport,
) {
    for directive in &patch.directives {
        match directive {
            FieldDirective::List { field, op: ListOp::Append, items } => {
                let list = provider.list_mut(*field);
                let mut duplicates = Vec::new();
                for item in items {
                    if list.contains(item) {
                        duplicates.push(item.as_str());
                    } else {
                        list.push(item.clone());
                    }
                }
                if !duplicates.is_empty() {
                    report.stats.skipped_duplicates += duplicates.len() as u32;
                    report.info(format!(
                        "        [Info] '{}' ({}): Skipped duplicates {}",
                        name,
                        field,
                        format_items(&duplicates)
                    ));
                }
            }
            FieldDirective::List { field, op: ListOp::Reset, items } => {
                *provider.list_mut(*field) = items.clone();
            }
            FieldDirective::List { field, op: ListOp::Remove, items } => {
                let list = provider.list_mut(*field);
                let missing: Vec<&str> = items
                    .iter()
                    .filter(|item| !list.contains(item))
                    .map(String::as_str)
                    .collect();
                list.retain(|entry| !items.contains(entry));
                if !missing.is_empty() {
                    report.stats.missing_removals += missing.len() as u32;
                    report.warn(format!(
                        "        [WARN] '{}': Cannot delete non-existent {}: {}",
                        name,
                        field,
                        format_items(&missing)
                    ));
                }
            }
            FieldDirective::ClearList(field) => provider.list_mut(*field).clear(),
            FieldDirective::UrlPattern(pattern) => provider.url_pattern = pattern.clone(),
            FieldDirective::CompleteProvider(value) => provider.complete_provider = *value,
            FieldDirective::ForceRedirection(value) => provider.force_redirection = *value,
            FieldDirective::Extra { key, value } => {
                // 未知字段只进入完整版，精简版不会发布
                report.warn(format!(
                    "        [WARN] '{}': Unknown field '{}' is not published in minified rules.",
                    name, key
                ));
                provider.extra.insert(key.clone(), value.clone());
            }
        }
    }

    if !patch.sets_complete_provider() {
        provider.derive_complete_provider();
    }
}
