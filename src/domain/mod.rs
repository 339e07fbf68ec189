// ==========================================
// 农业种植规划系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型、校验规则
// 红线: 不含文件访问逻辑,不含求解逻辑
// ==========================================

pub mod crop;
pub mod error;
pub mod parcel;
pub mod problem;
pub mod resources;
pub mod types;

// 重导出核心类型
pub use crop::Crop;
pub use error::{DomainError, DomainResult};
pub use parcel::LandParcel;
pub use problem::PlanningProblem;
pub use resources::{CropCompatibility, ObjectiveWeights, ResourceLimits};
pub use types::{Season, SoilType};
