// ==========================================
// 农业种植规划系统 - 配置层
// ==========================================
// 职责: 运行配置管理,JSON 文件 + 环境变量定位 + CLI 覆写
// ==========================================

pub mod planner_config;

// 重导出核心配置
pub use planner_config::{CliOverrides, PlannerConfig, CONFIG_ENV_VAR, DEFAULT_CONFIG_FILE};
