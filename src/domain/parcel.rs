// ==========================================
// 农业种植规划系统 - 地块领域模型
// ==========================================
// 职责: 定义地块物理属性与自校验规则
// ==========================================

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::types::SoilType;
use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

fn default_quality_factor() -> f64 {
    1.0
}

// ==========================================
// LandParcel - 地块主数据
// ==========================================
// quality_factor: 地块质量系数,按比例放大/缩小单位产出利润
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandParcel {
    // ===== 标识 =====
    pub id: String, // 地块编号（唯一标识）

    // ===== 物理属性 =====
    pub area: f64,           // 面积（公顷，必须 > 0）
    pub soil_type: SoilType, // 土壤类型

    // ===== 灌溉与水资源 =====
    #[serde(default = "default_true")]
    pub has_irrigation: bool, // 是否有灌溉设施
    #[serde(default)]
    pub water_capacity: Option<f64>, // 地块可用水量上限（m³，None = 无上限）

    // ===== 种植属性 =====
    #[serde(default = "default_true")]
    pub is_divisible: bool, // 是否可分割种植多种作物
    #[serde(default)]
    pub previous_crop_rotation_group: i32, // 上一季作物轮作组（0 = 无记录）

    // ===== 质量与地形 =====
    #[serde(default = "default_quality_factor")]
    pub quality_factor: f64, // 质量系数（0.5 ~ 1.5）
    #[serde(default)]
    pub slope_percentage: f64, // 坡度（0 ~ 100）
}

impl LandParcel {
    /// 按默认属性创建地块（测试与模板常用）
    pub fn new(id: &str, area: f64, soil_type: SoilType) -> Self {
        Self {
            id: id.to_string(),
            area,
            soil_type,
            has_irrigation: true,
            water_capacity: None,
            is_divisible: true,
            previous_crop_rotation_group: 0,
            quality_factor: 1.0,
            slope_percentage: 0.0,
        }
    }

    /// 校验地块数据
    pub fn validate(&self) -> DomainResult<()> {
        let fail = |message: &str| DomainError::InvalidParcel {
            id: self.id.clone(),
            message: message.to_string(),
        };

        if self.id.trim().is_empty() {
            return Err(DomainError::InvalidParcel {
                id: "<空>".to_string(),
                message: "地块编号不能为空".to_string(),
            });
        }
        if self.area <= 0.0 {
            return Err(fail("面积必须为正"));
        }
        if let Some(capacity) = self.water_capacity {
            if capacity < 0.0 {
                return Err(fail("可用水量不能为负"));
            }
        }
        if !(0.5..=1.5).contains(&self.quality_factor) {
            return Err(fail("质量系数必须在 0.5 ~ 1.5 之间"));
        }
        if !(0.0..=100.0).contains(&self.slope_percentage) {
            return Err(fail("坡度必须在 0 ~ 100 之间"));
        }

        Ok(())
    }
}
