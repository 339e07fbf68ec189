// ==========================================
// 农业种植规划系统 - 应用层
// ==========================================
// 职责: 面向前端/交互调用方的异步外壳,阻塞求解移交工作线程
// ==========================================

pub mod worker;

// 重导出核心类型
pub use worker::{SolveEvent, SolveHandle, SolveStage, SolveWorker};
