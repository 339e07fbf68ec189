// ==========================================
// 农业种植规划系统 - 导入层
// ==========================================
// 职责: 外部数据导入,生成内部规划问题
// 支持: Excel, CSV, JSON, 场景目录
// ==========================================

// 模块声明
pub mod error;
pub mod field_map;
pub mod file_parser;
pub mod scenario_importer;
pub mod templates;

// 重导出核心类型
pub use error::{ImportError, ImportResult};
pub use field_map::FieldMapper;
pub use file_parser::{CsvParser, ExcelParser, FileParser, UniversalFileParser};
pub use scenario_importer::{
    list_scenarios, save_problem_json, ScenarioImporter, ScenarioImporterImpl,
};
pub use templates::write_templates;
