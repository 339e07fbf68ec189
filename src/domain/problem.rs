// ==========================================
// 农业种植规划系统 - 规划问题聚合模型
// ==========================================
// 职责: 聚合作物/地块/资源约束,提供整体校验与访问器
// 红线: 校验只报错,不修改数据
// ==========================================

use crate::domain::crop::Crop;
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::parcel::LandParcel;
use crate::domain::resources::{CropCompatibility, ObjectiveWeights, ResourceLimits};
use serde::{Deserialize, Serialize};

fn default_horizon_months() -> u32 {
    12
}

// ==========================================
// PlanningProblem - 土地配置规划问题
// ==========================================
// integer_allocations: false = 纯 LP（面积连续,多样性约束不硬性生效）
//                      true  = MILP（引入作物选择 0/1 变量,多样性/互斥硬约束）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanningProblem {
    pub crops: Vec<Crop>,          // 候选作物列表
    pub parcels: Vec<LandParcel>,  // 地块列表
    pub limits: ResourceLimits,    // 全场资源约束
    #[serde(default)]
    pub compatibility: CropCompatibility, // 作物相容性规则
    #[serde(default)]
    pub objectives: ObjectiveWeights, // 优化目标权重
    #[serde(default = "default_horizon_months")]
    pub planning_horizon_months: u32, // 规划周期（月）
    #[serde(default)]
    pub enable_rotation: bool, // 是否启用轮作规则（当前仅校验层使用）
    #[serde(default)]
    pub integer_allocations: bool, // 是否启用 MILP 模式
}

impl PlanningProblem {
    /// 整体校验规划问题
    ///
    /// # 校验内容
    /// - 作物/地块列表非空,各自字段合法
    /// - 地块总面积为正
    /// - 至少存在一个土壤类型匹配的作物-地块组合
    ///
    /// # 说明
    /// 重复名称、资源分布等软性问题由 ProblemValidator 负责,
    /// 这里只拦截根本无法建模的数据
    pub fn validate(&self) -> DomainResult<()> {
        if self.crops.is_empty() {
            return Err(DomainError::InvalidProblem("作物列表为空".to_string()));
        }
        if self.parcels.is_empty() {
            return Err(DomainError::InvalidProblem("地块列表为空".to_string()));
        }

        for crop in &self.crops {
            crop.validate()?;
        }
        for parcel in &self.parcels {
            parcel.validate()?;
        }
        self.limits.validate()?;
        self.objectives.validate()?;

        if self.total_area() <= 0.0 {
            return Err(DomainError::InvalidProblem(
                "地块总面积必须为正".to_string(),
            ));
        }

        let has_compatible_pair = self
            .crops
            .iter()
            .any(|crop| self.parcels.iter().any(|parcel| crop.suits(parcel)));
        if !has_compatible_pair {
            return Err(DomainError::InvalidProblem(
                "不存在土壤类型匹配的作物-地块组合".to_string(),
            ));
        }

        Ok(())
    }

    /// 地块总面积（公顷）
    pub fn total_area(&self) -> f64 {
        self.parcels.iter().map(|p| p.area).sum()
    }

    /// 按名称查找作物
    pub fn crop_by_name(&self, name: &str) -> Option<&Crop> {
        self.crops.iter().find(|c| c.name == name)
    }

    /// 按编号查找地块
    pub fn parcel_by_id(&self, id: &str) -> Option<&LandParcel> {
        self.parcels.iter().find(|p| p.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{Season, SoilType};
    use std::collections::BTreeMap;

    fn wheat() -> Crop {
        Crop {
            name: "Wheat".to_string(),
            profit_per_hectare: 2500.0,
            cost_per_hectare: 800.0,
            water_requirement: 300.0,
            labor_hours: 25.0,
            growth_duration_days: 120,
            preferred_soil_types: vec![SoilType::Loamy],
            planting_season: Season::Fall,
            min_area: 0.0,
            max_area: None,
            rotation_group: 0,
            fertilizer_need: 0.0,
            pesticide_need: 0.0,
        }
    }

    fn limits() -> ResourceLimits {
        ResourceLimits {
            total_budget: 100_000.0,
            total_water: 20_000.0,
            total_labor_hours: 2_000.0,
            total_fertilizer: None,
            total_pesticide: None,
            min_crop_diversity: 1,
            max_crop_diversity: None,
            labor_cost_per_hour: 0.0,
            water_cost_per_m3: 0.0,
            monthly_water_distribution: BTreeMap::new(),
            monthly_labor_distribution: BTreeMap::new(),
        }
    }

    fn problem() -> PlanningProblem {
        PlanningProblem {
            crops: vec![wheat()],
            parcels: vec![LandParcel::new("P1", 50.0, SoilType::Loamy)],
            limits: limits(),
            compatibility: CropCompatibility::default(),
            objectives: ObjectiveWeights::default(),
            planning_horizon_months: 12,
            enable_rotation: false,
            integer_allocations: false,
        }
    }

    #[test]
    fn test_valid_problem_passes() {
        assert!(problem().validate().is_ok());
    }

    #[test]
    fn test_empty_crops_rejected() {
        let mut p = problem();
        p.crops.clear();
        assert!(p.validate().is_err());
    }

    #[test]
    fn test_no_compatible_pair_rejected() {
        let mut p = problem();
        // 壤土作物 + 砂土地块 → 无可行组合
        p.parcels = vec![LandParcel::new("P1", 50.0, SoilType::Sandy)];
        let err = p.validate().unwrap_err();
        assert!(err.to_string().contains("土壤类型匹配"));
    }

    #[test]
    fn test_accessors() {
        let p = problem();
        assert_eq!(p.total_area(), 50.0);
        assert!(p.crop_by_name("Wheat").is_some());
        assert!(p.crop_by_name("Rice").is_none());
        assert!(p.parcel_by_id("P1").is_some());
    }

    #[test]
    fn test_json_roundtrip_keeps_defaults() {
        let p = problem();
        let json = serde_json::to_string(&p).unwrap();
        let back: PlanningProblem = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
        assert_eq!(back.planning_horizon_months, 12);
    }
}
