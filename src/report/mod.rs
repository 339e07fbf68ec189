// ==========================================
// 农业种植规划系统 - 报告层
// ==========================================
// 职责: 方案的文本报告渲染与 JSON/CSV 导出
// ==========================================

pub mod error;
pub mod export;
pub mod text;

pub use error::{ReportError, ReportResult};
pub use export::{export_csv, export_json};
pub use text::render_text_report;
