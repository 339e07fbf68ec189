// ==========================================
// 农业种植规划系统 - 报告层错误类型
// ==========================================

use thiserror::Error;

/// 报告与导出错误类型
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("报告文件写入失败: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON 序列化失败: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV 写出失败: {0}")]
    Csv(#[from] csv::Error),
}

/// Result 类型别名
pub type ReportResult<T> = Result<T, ReportError>;
