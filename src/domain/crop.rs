// ==========================================
// 农业种植规划系统 - 作物领域模型
// ==========================================
// 职责: 定义作物经济/资源属性与自校验规则
// 红线: 领域层不含求解逻辑,只描述数据
// ==========================================

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::parcel::LandParcel;
use crate::domain::types::{Season, SoilType};
use serde::{Deserialize, Serialize};

// ==========================================
// Crop - 作物主数据
// ==========================================
// 用途: 导入层写入,引擎层只读
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Crop {
    // ===== 标识 =====
    pub name: String, // 作物名称（唯一标识）

    // ===== 经济维度 =====
    pub profit_per_hectare: f64, // 每公顷利润（元）
    pub cost_per_hectare: f64,   // 每公顷种植成本（种子+化肥+农药基础成本）

    // ===== 资源消耗 =====
    pub water_requirement: f64, // 每公顷全季需水量（m³）
    pub labor_hours: f64,       // 每公顷人工工时（小时）

    // ===== 农艺属性 =====
    pub growth_duration_days: u32,           // 生长周期（天）
    pub preferred_soil_types: Vec<SoilType>, // 适配土壤类型列表
    pub planting_season: Season,             // 种植季节

    // ===== 面积约束 =====
    #[serde(default)]
    pub min_area: f64, // 最小种植面积（公顷，0 = 无下限）
    #[serde(default)]
    pub max_area: Option<f64>, // 最大种植面积（公顷，None = 无上限）

    // ===== 轮作与投入品 =====
    #[serde(default)]
    pub rotation_group: i32, // 轮作组编号（0 = 不参与轮作）
    #[serde(default)]
    pub fertilizer_need: f64, // 每公顷化肥需求（kg）
    #[serde(default)]
    pub pesticide_need: f64, // 每公顷农药需求（kg）
}

impl Crop {
    /// 校验作物数据
    ///
    /// # 返回
    /// - Ok(()): 数据合法
    /// - Err(DomainError::InvalidCrop): 含显式原因
    pub fn validate(&self) -> DomainResult<()> {
        let fail = |message: &str| DomainError::InvalidCrop {
            name: self.name.clone(),
            message: message.to_string(),
        };

        if self.name.trim().is_empty() {
            return Err(DomainError::InvalidCrop {
                name: "<空>".to_string(),
                message: "作物名称不能为空".to_string(),
            });
        }
        if self.profit_per_hectare < 0.0 {
            return Err(fail("每公顷利润不能为负"));
        }
        if self.water_requirement < 0.0 {
            return Err(fail("需水量不能为负"));
        }
        if self.labor_hours < 0.0 {
            return Err(fail("人工工时不能为负"));
        }
        if self.cost_per_hectare < 0.0 {
            return Err(fail("种植成本不能为负"));
        }
        if self.fertilizer_need < 0.0 {
            return Err(fail("化肥需求不能为负"));
        }
        if self.pesticide_need < 0.0 {
            return Err(fail("农药需求不能为负"));
        }
        if self.min_area < 0.0 {
            return Err(fail("最小种植面积不能为负"));
        }
        if let Some(max_area) = self.max_area {
            if max_area < self.min_area {
                return Err(fail("最大种植面积不能小于最小种植面积"));
            }
        }

        Ok(())
    }

    /// 土壤适配判定: 作物是否可种植在该地块
    pub fn suits(&self, parcel: &LandParcel) -> bool {
        self.preferred_soil_types.contains(&parcel.soil_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_crop() -> Crop {
        Crop {
            name: "Wheat".to_string(),
            profit_per_hectare: 2500.0,
            cost_per_hectare: 800.0,
            water_requirement: 300.0,
            labor_hours: 25.0,
            growth_duration_days: 120,
            preferred_soil_types: vec![SoilType::Loamy, SoilType::Clay],
            planting_season: Season::Fall,
            min_area: 0.0,
            max_area: None,
            rotation_group: 2,
            fertilizer_need: 150.0,
            pesticide_need: 5.0,
        }
    }

    #[test]
    fn test_valid_crop_passes() {
        assert!(sample_crop().validate().is_ok());
    }

    #[test]
    fn test_negative_profit_rejected() {
        let mut crop = sample_crop();
        crop.profit_per_hectare = -1.0;
        let err = crop.validate().unwrap_err();
        assert!(err.to_string().contains("利润"));
    }

    #[test]
    fn test_max_area_below_min_area_rejected() {
        let mut crop = sample_crop();
        crop.min_area = 10.0;
        crop.max_area = Some(5.0);
        assert!(crop.validate().is_err());
    }

    #[test]
    fn test_suits_checks_soil_type() {
        let crop = sample_crop();
        let loamy = LandParcel::new("P1", 50.0, SoilType::Loamy);
        let sandy = LandParcel::new("P2", 30.0, SoilType::Sandy);
        assert!(crop.suits(&loamy));
        assert!(!crop.suits(&sandy));
    }

    #[test]
    fn test_serde_defaults_for_optional_fields() {
        // JSON 缺省字段按默认值填充
        let json = r#"{
            "name": "Corn",
            "profit_per_hectare": 3200.0,
            "cost_per_hectare": 1200.0,
            "water_requirement": 450.0,
            "labor_hours": 35.0,
            "growth_duration_days": 90,
            "preferred_soil_types": ["loamy", "sandy"],
            "planting_season": "spring"
        }"#;
        let crop: Crop = serde_json::from_str(json).unwrap();
        assert_eq!(crop.min_area, 0.0);
        assert_eq!(crop.max_area, None);
        assert_eq!(crop.rotation_group, 0);
    }
}
