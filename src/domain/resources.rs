// ==========================================
// 农业种植规划系统 - 资源约束与目标权重
// ==========================================
// 职责: 定义全场资源上限、作物相容性、优化目标权重
// ==========================================

use crate::domain::error::{DomainError, DomainResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

fn default_min_diversity() -> usize {
    1
}

fn default_synergy_bonus() -> f64 {
    1.1
}

fn default_profit_weight() -> f64 {
    1.0
}

// ==========================================
// ResourceLimits - 全场资源约束
// ==========================================
// 化肥/农药上限为 None 时表示不设限,模型层不生成对应约束行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceLimits {
    // ===== 核心资源上限 =====
    pub total_budget: f64,      // 总预算（元）
    pub total_water: f64,       // 总可用水量（m³）
    pub total_labor_hours: f64, // 总人工工时（小时）

    // ===== 投入品上限（可选）=====
    #[serde(default)]
    pub total_fertilizer: Option<f64>, // 化肥总量上限（kg，None = 不设限）
    #[serde(default)]
    pub total_pesticide: Option<f64>, // 农药总量上限（kg，None = 不设限）

    // ===== 多样性要求 =====
    #[serde(default = "default_min_diversity")]
    pub min_crop_diversity: usize, // 最少种植作物种数
    #[serde(default)]
    pub max_crop_diversity: Option<usize>, // 最多种植作物种数（None = 不设限）

    // ===== 单价 =====
    #[serde(default)]
    pub labor_cost_per_hour: f64, // 人工单价（元/小时）
    #[serde(default)]
    pub water_cost_per_m3: f64, // 水价（元/m³）

    // ===== 月度分布（信息性，由校验器核对）=====
    #[serde(default)]
    pub monthly_water_distribution: BTreeMap<u32, f64>, // 月份 -> 可用水量（m³）
    #[serde(default)]
    pub monthly_labor_distribution: BTreeMap<u32, f64>, // 月份 -> 可用工时（小时）
}

impl ResourceLimits {
    /// 校验资源约束数据
    pub fn validate(&self) -> DomainResult<()> {
        if self.total_budget < 0.0 {
            return Err(DomainError::InvalidLimits("总预算不能为负".to_string()));
        }
        if self.total_water < 0.0 {
            return Err(DomainError::InvalidLimits("总可用水量不能为负".to_string()));
        }
        if self.total_labor_hours < 0.0 {
            return Err(DomainError::InvalidLimits("总人工工时不能为负".to_string()));
        }
        if let Some(fertilizer) = self.total_fertilizer {
            if fertilizer < 0.0 {
                return Err(DomainError::InvalidLimits("化肥总量不能为负".to_string()));
            }
        }
        if let Some(pesticide) = self.total_pesticide {
            if pesticide < 0.0 {
                return Err(DomainError::InvalidLimits("农药总量不能为负".to_string()));
            }
        }
        if let Some(max_diversity) = self.max_crop_diversity {
            if max_diversity < self.min_crop_diversity {
                return Err(DomainError::InvalidLimits(
                    "最多作物种数不能小于最少作物种数".to_string(),
                ));
            }
        }
        if self.labor_cost_per_hour < 0.0 || self.water_cost_per_m3 < 0.0 {
            return Err(DomainError::InvalidLimits("资源单价不能为负".to_string()));
        }

        Ok(())
    }
}

// ==========================================
// CropCompatibility - 作物相容性规则
// ==========================================
// 纯 LP 模式下不转化为硬约束,仅供校验与 MILP 模式使用
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropCompatibility {
    #[serde(default)]
    pub incompatible_pairs: Vec<(String, String)>, // 不宜同场种植的作物对
    #[serde(default)]
    pub rotation_rules: BTreeMap<i32, Vec<i32>>, // 轮作组 -> 下一季允许的轮作组
    #[serde(default)]
    pub beneficial_pairs: Vec<(String, String)>, // 有协同效益的作物对
    #[serde(default = "default_synergy_bonus")]
    pub synergy_bonus: f64, // 协同效益系数
}

impl Default for CropCompatibility {
    fn default() -> Self {
        Self {
            incompatible_pairs: Vec::new(),
            rotation_rules: BTreeMap::new(),
            beneficial_pairs: Vec::new(),
            synergy_bonus: default_synergy_bonus(),
        }
    }
}

// ==========================================
// ObjectiveWeights - 优化目标权重
// ==========================================
// 当前目标函数只使用利润项;其余权重随数据模型保留,
// 由校验器确保至少一项为正
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObjectiveWeights {
    #[serde(default = "default_profit_weight")]
    pub profit_weight: f64, // 利润权重
    #[serde(default)]
    pub sustainability_weight: f64, // 可持续性权重
    #[serde(default)]
    pub diversity_weight: f64, // 多样性权重
    #[serde(default)]
    pub water_efficiency_weight: f64, // 水资源效率权重
}

impl Default for ObjectiveWeights {
    fn default() -> Self {
        Self {
            profit_weight: default_profit_weight(),
            sustainability_weight: 0.0,
            diversity_weight: 0.0,
            water_efficiency_weight: 0.0,
        }
    }
}

impl ObjectiveWeights {
    /// 校验目标权重
    pub fn validate(&self) -> DomainResult<()> {
        let weights = [
            ("profit_weight", self.profit_weight),
            ("sustainability_weight", self.sustainability_weight),
            ("diversity_weight", self.diversity_weight),
            ("water_efficiency_weight", self.water_efficiency_weight),
        ];
        for (name, value) in weights {
            if value < 0.0 {
                return Err(DomainError::InvalidWeights(format!("{} 不能为负", name)));
            }
        }
        Ok(())
    }

    /// 是否所有权重均为零
    pub fn all_zero(&self) -> bool {
        self.profit_weight == 0.0
            && self.sustainability_weight == 0.0
            && self.diversity_weight == 0.0
            && self.water_efficiency_weight == 0.0
    }
}
