//! 自定义指令模块
//! 把人工编写的 YAML 文档解析为强类型的 add / modify / del 指令
pub mod document;
pub mod field_directive;

pub use document::{DirectiveDocument, SECTION_ADD, SECTION_DELETE, SECTION_MODIFY};
pub use field_directive::{FieldDirective, ListOp, ProviderPatch};
