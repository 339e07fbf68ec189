// ==========================================
// 农业种植规划系统 - 运行配置
// ==========================================
// 职责: 求解后端/时限/输出目录等运行参数的加载与覆写
// 优先级: CLI 参数 > 配置文件 > 内置默认值
// 定位: AGRI_PLAN_CONFIG 环境变量指定路径,否则当前目录 agri-plan.json
// ==========================================

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 配置文件路径环境变量
pub const CONFIG_ENV_VAR: &str = "AGRI_PLAN_CONFIG";
/// 默认配置文件名(相对当前目录)
pub const DEFAULT_CONFIG_FILE: &str = "agri-plan.json";

/// 配置加载错误
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件读取失败: {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("配置文件格式错误: {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// 运行配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// 默认求解后端名称
    pub default_backend: String,
    /// 求解时限(秒),0 表示不限时
    pub time_limit_secs: u64,
    /// 是否打开求解库自身日志
    pub verbose_solver: bool,
    /// 导出文件输出目录
    pub output_dir: PathBuf,
    /// 低于该面积(公顷)的分配视为噪声
    pub allocation_epsilon: f64,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            default_backend: "microlp".to_string(),
            time_limit_secs: 300,
            verbose_solver: false,
            output_dir: PathBuf::from("./output"),
            allocation_epsilon: 1e-6,
        }
    }
}

/// CLI 覆写项,None 表示未指定
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub backend: Option<String>,
    pub time_limit_secs: Option<u64>,
    pub output_dir: Option<PathBuf>,
    pub verbose: Option<bool>,
}

impl PlannerConfig {
    /// 加载运行配置
    ///
    /// # 说明
    /// - 路径取 AGRI_PLAN_CONFIG 环境变量,未设置则当前目录 agri-plan.json
    /// - 文件不存在 → 内置默认值
    /// - 文件存在但格式非法 → 错误(不静默回退,避免配置被悄悄忽略)
    pub fn load() -> Result<Self, ConfigError> {
        let path = match std::env::var(CONFIG_ENV_VAR) {
            Ok(value) if !value.trim().is_empty() => PathBuf::from(value),
            _ => PathBuf::from(DEFAULT_CONFIG_FILE),
        };
        Self::load_from(&path)
    }

    /// 从指定路径加载
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "配置文件不存在,使用默认配置");
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: PlannerConfig =
            serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        tracing::info!(path = %path.display(), backend = %config.default_backend, "配置加载完成");
        Ok(config)
    }

    /// 应用 CLI 覆写(CLI 指定的项覆盖文件值)
    pub fn apply_cli_overrides(&mut self, overrides: &CliOverrides) {
        if let Some(backend) = &overrides.backend {
            self.default_backend = backend.clone();
        }
        if let Some(limit) = overrides.time_limit_secs {
            self.time_limit_secs = limit;
        }
        if let Some(dir) = &overrides.output_dir {
            self.output_dir = dir.clone();
        }
        if let Some(verbose) = overrides.verbose {
            self.verbose_solver = verbose;
        }
    }

    /// 时限换算为求解选项用的 Duration,0 → None
    pub fn time_limit(&self) -> Option<std::time::Duration> {
        if self.time_limit_secs == 0 {
            None
        } else {
            Some(std::time::Duration::from_secs(self.time_limit_secs))
        }
    }
}
