//! 产物写出模块
pub mod path_manager;
pub mod artifact_writer;
pub mod merge_log;
pub mod badge;

pub use path_manager::OutputPaths;
pub use artifact_writer::ArtifactWriter;
pub use merge_log::MergeLog;
pub use badge::Badge;
