// ==========================================
// 农业种植规划系统 - 解提取与 KPI 计算引擎
// ==========================================
// 职责: SolveOutcome 原始变量值 → 分配方案、汇总表、资源分析、KPI
// 红线: 不可行/无界的求解结果不允许进入本模块(上游已转为错误)
// ==========================================

use serde::{Deserialize, Serialize};

use crate::domain::problem::PlanningProblem;
use crate::engine::model_builder::ModelSpec;
use crate::solver::{SolveOutcome, SolveStatus};

/// 低于该面积(公顷)的分配视为数值噪声,不进入方案
pub const DEFAULT_ALLOCATION_EPSILON: f64 = 1e-6;

// ==========================================
// 方案数据结构
// ==========================================

/// 单条种植分配: 某作物在某地块上的面积
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Allocation {
    pub crop: String,
    pub parcel: String,
    pub area: f64,
    pub expected_profit: f64,
    pub water_used: f64,
    pub labor_used: f64,
    pub cost: f64,
}

/// 全方案资源合计
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlanTotals {
    pub area: f64,
    pub water: f64,
    pub labor: f64,
    /// 种植基础成本(不含工时费与水费)
    pub cost: f64,
    pub fertilizer: f64,
    pub pesticide: f64,
    /// 质量系数调整后的总利润
    pub profit: f64,
}

/// 关键绩效指标
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Kpis {
    pub total_profit: f64,
    pub profit_per_hectare: f64,
    pub land_utilization_pct: f64,
    /// 每立方米水产生的利润
    pub water_efficiency: f64,
    /// 每工时产生的利润
    pub labor_efficiency: f64,
    pub roi_pct: f64,
    pub crops_planted: usize,
    pub avg_area_per_crop: f64,
    /// Shannon 多样性指数: -Σ p·ln(p),p 为作物面积占比
    pub crop_diversity_index: f64,
    pub solve_time_seconds: f64,
}

/// 作物汇总中的地块明细
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParcelShare {
    pub parcel: String,
    pub area: f64,
}

/// 单作物汇总(按面积降序)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CropSummary {
    pub crop: String,
    pub total_area: f64,
    pub parcel_count: usize,
    pub parcels: Vec<ParcelShare>,
    /// 基础利润(不含地块质量系数)
    pub profit: f64,
    pub water_needed: f64,
    pub labor_needed: f64,
    pub cost: f64,
    pub season: String,
    pub growth_days: u32,
}

/// 地块汇总中的作物明细
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CropShare {
    pub crop: String,
    pub area: f64,
    /// 占该地块总面积的百分比
    pub share_pct: f64,
}

/// 单地块汇总(按利用率降序,含未使用地块)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParcelSummary {
    pub parcel: String,
    pub total_area: f64,
    pub used_area: f64,
    pub unused_area: f64,
    pub utilization_pct: f64,
    pub soil_type: String,
    pub has_irrigation: bool,
    pub quality_factor: f64,
    pub crops: Vec<CropShare>,
}

/// 单项资源使用分析(水/工时/预算)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceUsage {
    pub resource: String,
    pub used: f64,
    pub available: f64,
    pub remaining: f64,
    pub utilization_pct: f64,
    /// 每单位资源产生的利润
    pub efficiency: f64,
    /// 仅预算项: (利润-成本)/成本 × 100
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roi_pct: Option<f64>,
}

/// 完整分配方案
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationPlan {
    pub status: SolveStatus,
    pub backend: String,
    pub objective_value: f64,
    pub solve_time_seconds: f64,
    pub allocations: Vec<Allocation>,
    pub totals: PlanTotals,
    pub kpis: Kpis,
    pub crop_summaries: Vec<CropSummary>,
    pub parcel_summaries: Vec<ParcelSummary>,
    pub resource_analysis: Vec<ResourceUsage>,
}

// ==========================================
// SolutionExtractor - 解提取引擎
// ==========================================
pub struct SolutionExtractor {
    epsilon: f64,
}

impl SolutionExtractor {
    pub fn new() -> Self {
        Self {
            epsilon: DEFAULT_ALLOCATION_EPSILON,
        }
    }

    /// 使用自定义噪声阈值(来自运行配置)
    pub fn with_epsilon(epsilon: f64) -> Self {
        Self { epsilon }
    }

    /// 从求解结果构建完整分配方案
    ///
    /// # 参数
    /// - problem: 原规划问题
    /// - model: 求解所用模型(提供变量→作物/地块的回溯映射)
    /// - outcome: 后端返回的变量值与求解元信息
    pub fn extract(
        &self,
        problem: &PlanningProblem,
        model: &ModelSpec,
        outcome: &SolveOutcome,
    ) -> AllocationPlan {
        let mut allocations = Vec::new();
        for entry in &model.allocations {
            let value = outcome.values.get(entry.var_index).copied().unwrap_or(0.0);
            if value <= self.epsilon {
                continue;
            }
            let crop = &problem.crops[entry.crop_index];
            let parcel = &problem.parcels[entry.parcel_index];
            allocations.push(Allocation {
                crop: crop.name.clone(),
                parcel: parcel.id.clone(),
                area: value,
                expected_profit: crop.profit_per_hectare * parcel.quality_factor * value,
                water_used: crop.water_requirement * value,
                labor_used: crop.labor_hours * value,
                cost: crop.cost_per_hectare * value,
            });
        }

        let totals = self.compute_totals(problem, &allocations);
        let kpis = self.compute_kpis(problem, &allocations, &totals, outcome);
        let crop_summaries = self.crop_summaries(problem, &allocations);
        let parcel_summaries = self.parcel_summaries(problem, &allocations);
        let resource_analysis = self.resource_analysis(problem, &totals);

        tracing::info!(
            allocations = allocations.len(),
            total_profit = totals.profit,
            total_area = totals.area,
            "解提取完成"
        );

        AllocationPlan {
            status: outcome.status,
            backend: outcome.backend.clone(),
            objective_value: outcome.objective_value,
            solve_time_seconds: outcome.solve_time.as_secs_f64(),
            allocations,
            totals,
            kpis,
            crop_summaries,
            parcel_summaries,
            resource_analysis,
        }
    }

    fn compute_totals(&self, problem: &PlanningProblem, allocations: &[Allocation]) -> PlanTotals {
        let mut totals = PlanTotals::default();
        for allocation in allocations {
            let crop = match problem.crop_by_name(&allocation.crop) {
                Some(c) => c,
                None => continue,
            };
            totals.area += allocation.area;
            totals.water += allocation.water_used;
            totals.labor += allocation.labor_used;
            totals.cost += allocation.cost;
            totals.fertilizer += crop.fertilizer_need * allocation.area;
            totals.pesticide += crop.pesticide_need * allocation.area;
            totals.profit += allocation.expected_profit;
        }
        totals
    }

    fn compute_kpis(
        &self,
        problem: &PlanningProblem,
        allocations: &[Allocation],
        totals: &PlanTotals,
        outcome: &SolveOutcome,
    ) -> Kpis {
        let ratio = |numerator: f64, denominator: f64| {
            if denominator > 0.0 {
                numerator / denominator
            } else {
                0.0
            }
        };

        let mut planted: Vec<&str> = allocations.iter().map(|a| a.crop.as_str()).collect();
        planted.sort_unstable();
        planted.dedup();
        let crops_planted = planted.len();

        let total_available = problem.total_area();

        // Shannon 指数基于作物面积占比
        let mut diversity = 0.0;
        if totals.area > 0.0 {
            for crop_name in &planted {
                let crop_area: f64 = allocations
                    .iter()
                    .filter(|a| a.crop == *crop_name)
                    .map(|a| a.area)
                    .sum();
                let proportion = crop_area / totals.area;
                if proportion > 0.0 {
                    diversity -= proportion * proportion.ln();
                }
            }
        }

        Kpis {
            total_profit: totals.profit,
            profit_per_hectare: ratio(totals.profit, totals.area),
            land_utilization_pct: ratio(totals.area, total_available) * 100.0,
            water_efficiency: ratio(totals.profit, totals.water),
            labor_efficiency: ratio(totals.profit, totals.labor),
            roi_pct: ratio(totals.profit - totals.cost, totals.cost) * 100.0,
            crops_planted,
            avg_area_per_crop: ratio(totals.area, crops_planted as f64),
            crop_diversity_index: diversity,
            solve_time_seconds: outcome.solve_time.as_secs_f64(),
        }
    }

    fn crop_summaries(
        &self,
        problem: &PlanningProblem,
        allocations: &[Allocation],
    ) -> Vec<CropSummary> {
        let mut summaries = Vec::new();
        for crop in &problem.crops {
            let parcels: Vec<ParcelShare> = allocations
                .iter()
                .filter(|a| a.crop == crop.name)
                .map(|a| ParcelShare {
                    parcel: a.parcel.clone(),
                    area: a.area,
                })
                .collect();
            if parcels.is_empty() {
                continue;
            }
            let total_area: f64 = parcels.iter().map(|p| p.area).sum();
            summaries.push(CropSummary {
                crop: crop.name.clone(),
                total_area,
                parcel_count: parcels.len(),
                parcels,
                profit: total_area * crop.profit_per_hectare,
                water_needed: total_area * crop.water_requirement,
                labor_needed: total_area * crop.labor_hours,
                cost: total_area * crop.cost_per_hectare,
                season: crop.planting_season.to_string(),
                growth_days: crop.growth_duration_days,
            });
        }
        summaries.sort_by(|a, b| {
            b.total_area
                .partial_cmp(&a.total_area)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        summaries
    }

    fn parcel_summaries(
        &self,
        problem: &PlanningProblem,
        allocations: &[Allocation],
    ) -> Vec<ParcelSummary> {
        let mut summaries = Vec::new();
        for parcel in &problem.parcels {
            let crops: Vec<CropShare> = allocations
                .iter()
                .filter(|a| a.parcel == parcel.id)
                .map(|a| CropShare {
                    crop: a.crop.clone(),
                    area: a.area,
                    share_pct: if parcel.area > 0.0 {
                        a.area / parcel.area * 100.0
                    } else {
                        0.0
                    },
                })
                .collect();
            let used_area: f64 = crops.iter().map(|c| c.area).sum();
            summaries.push(ParcelSummary {
                parcel: parcel.id.clone(),
                total_area: parcel.area,
                used_area,
                unused_area: parcel.area - used_area,
                utilization_pct: if parcel.area > 0.0 {
                    used_area / parcel.area * 100.0
                } else {
                    0.0
                },
                soil_type: parcel.soil_type.to_string(),
                has_irrigation: parcel.has_irrigation,
                quality_factor: parcel.quality_factor,
                crops,
            });
        }
        summaries.sort_by(|a, b| {
            b.utilization_pct
                .partial_cmp(&a.utilization_pct)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        summaries
    }

    fn resource_analysis(
        &self,
        problem: &PlanningProblem,
        totals: &PlanTotals,
    ) -> Vec<ResourceUsage> {
        let limits = &problem.limits;
        let usage = |resource: &str, used: f64, available: f64, roi: Option<f64>| ResourceUsage {
            resource: resource.to_string(),
            used,
            available,
            remaining: available - used,
            utilization_pct: if available > 0.0 {
                used / available * 100.0
            } else {
                0.0
            },
            efficiency: if used > 0.0 { totals.profit / used } else { 0.0 },
            roi_pct: roi,
        };

        let roi = if totals.cost > 0.0 {
            Some((totals.profit - totals.cost) / totals.cost * 100.0)
        } else {
            Some(0.0)
        };

        vec![
            usage("water", totals.water, limits.total_water, None),
            usage("labor", totals.labor, limits.total_labor_hours, None),
            usage("budget", totals.cost, limits.total_budget, roi),
        ]
    }
}

impl Default for SolutionExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::crop::Crop;
    use crate::domain::parcel::LandParcel;
    use crate::domain::resources::{CropCompatibility, ObjectiveWeights, ResourceLimits};
    use crate::domain::types::{Season, SoilType};
    use crate::engine::model_builder::ModelBuilder;
    use std::collections::BTreeMap;
    use std::time::Duration;

    fn problem() -> PlanningProblem {
        let wheat = Crop {
            name: "Wheat".to_string(),
            profit_per_hectare: 2000.0,
            cost_per_hectare: 500.0,
            water_requirement: 300.0,
            labor_hours: 20.0,
            growth_duration_days: 120,
            preferred_soil_types: vec![SoilType::Loamy],
            planting_season: Season::Fall,
            min_area: 0.0,
            max_area: None,
            rotation_group: 0,
            fertilizer_need: 100.0,
            pesticide_need: 4.0,
        };
        let mut corn = wheat.clone();
        corn.name = "Corn".to_string();
        corn.profit_per_hectare = 3000.0;
        corn.preferred_soil_types = vec![SoilType::Sandy];

        PlanningProblem {
            crops: vec![wheat, corn],
            parcels: vec![
                LandParcel::new("P1", 50.0, SoilType::Loamy),
                LandParcel::new("P2", 30.0, SoilType::Sandy),
            ],
            limits: ResourceLimits {
                total_budget: 100_000.0,
                total_water: 40_000.0,
                total_labor_hours: 3_000.0,
                total_fertilizer: None,
                total_pesticide: None,
                min_crop_diversity: 1,
                max_crop_diversity: None,
                labor_cost_per_hour: 15.0,
                water_cost_per_m3: 0.5,
                monthly_water_distribution: BTreeMap::new(),
                monthly_labor_distribution: BTreeMap::new(),
            },
            compatibility: CropCompatibility::default(),
            objectives: ObjectiveWeights::default(),
            planning_horizon_months: 12,
            enable_rotation: false,
            integer_allocations: false,
        }
    }

    fn outcome_with(model: &ModelSpec, assignments: &[(&str, f64)]) -> SolveOutcome {
        let mut values = vec![0.0; model.num_variables()];
        for (name, value) in assignments {
            let (index, _) = model.variable(name).unwrap();
            values[index] = *value;
        }
        let objective_value = values
            .iter()
            .zip(model.variables.iter())
            .map(|(v, spec)| v * spec.objective_coefficient)
            .sum();
        SolveOutcome {
            status: SolveStatus::Optimal,
            objective_value,
            values,
            solve_time: Duration::from_millis(50),
            backend: "microlp".to_string(),
        }
    }

    #[test]
    fn test_extraction_drops_noise_values() {
        let p = problem();
        let model = ModelBuilder::new().build(&p).unwrap();
        let outcome = outcome_with(&model, &[("allocate_Wheat_P1", 40.0), ("allocate_Corn_P2", 1e-9)]);

        let plan = SolutionExtractor::new().extract(&p, &model, &outcome);
        assert_eq!(plan.allocations.len(), 1);
        assert_eq!(plan.allocations[0].crop, "Wheat");
        assert!((plan.allocations[0].area - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_totals_and_kpis() {
        let p = problem();
        let model = ModelBuilder::new().build(&p).unwrap();
        let outcome = outcome_with(&model, &[("allocate_Wheat_P1", 40.0), ("allocate_Corn_P2", 20.0)]);

        let plan = SolutionExtractor::new().extract(&p, &model, &outcome);

        // 面积 60,基础成本 60×500,利润 40×2000 + 20×3000
        assert!((plan.totals.area - 60.0).abs() < 1e-9);
        assert!((plan.totals.cost - 30_000.0).abs() < 1e-9);
        assert!((plan.totals.profit - 140_000.0).abs() < 1e-9);
        assert!((plan.totals.fertilizer - 6_000.0).abs() < 1e-9);

        assert_eq!(plan.kpis.crops_planted, 2);
        // 60 / 80 × 100
        assert!((plan.kpis.land_utilization_pct - 75.0).abs() < 1e-9);
        assert!((plan.kpis.profit_per_hectare - 140_000.0 / 60.0).abs() < 1e-9);
        // (140000 - 30000) / 30000 × 100
        assert!((plan.kpis.roi_pct - 1100.0 / 3.0).abs() < 1e-6);
        assert!((plan.kpis.avg_area_per_crop - 30.0).abs() < 1e-9);
        assert!((plan.kpis.solve_time_seconds - 0.05).abs() < 1e-9);
    }

    #[test]
    fn test_diversity_index_for_equal_shares() {
        let p = problem();
        let model = ModelBuilder::new().build(&p).unwrap();
        let outcome = outcome_with(&model, &[("allocate_Wheat_P1", 25.0), ("allocate_Corn_P2", 25.0)]);

        let plan = SolutionExtractor::new().extract(&p, &model, &outcome);
        // 两作物各占一半: -2 × 0.5·ln(0.5) = ln 2
        assert!((plan.kpis.crop_diversity_index - std::f64::consts::LN_2).abs() < 1e-9);
    }

    #[test]
    fn test_zero_allocation_yields_zeroed_kpis() {
        let p = problem();
        let model = ModelBuilder::new().build(&p).unwrap();
        let outcome = outcome_with(&model, &[]);

        let plan = SolutionExtractor::new().extract(&p, &model, &outcome);
        assert!(plan.allocations.is_empty());
        assert_eq!(plan.kpis.crops_planted, 0);
        assert_eq!(plan.kpis.total_profit, 0.0);
        assert_eq!(plan.kpis.roi_pct, 0.0);
        assert_eq!(plan.kpis.crop_diversity_index, 0.0);
        assert!(plan.kpis.profit_per_hectare.is_finite());
    }

    #[test]
    fn test_summaries_sorted_and_complete() {
        let p = problem();
        let model = ModelBuilder::new().build(&p).unwrap();
        let outcome = outcome_with(&model, &[("allocate_Wheat_P1", 10.0), ("allocate_Corn_P2", 28.0)]);

        let plan = SolutionExtractor::new().extract(&p, &model, &outcome);

        // 作物按面积降序
        assert_eq!(plan.crop_summaries[0].crop, "Corn");
        assert_eq!(plan.crop_summaries[0].parcel_count, 1);
        // 基础利润不含质量系数
        assert!((plan.crop_summaries[0].profit - 28.0 * 3000.0).abs() < 1e-9);

        // 地块按利用率降序: P2 = 28/30, P1 = 10/50
        assert_eq!(plan.parcel_summaries[0].parcel, "P2");
        assert!((plan.parcel_summaries[0].utilization_pct - 28.0 / 30.0 * 100.0).abs() < 1e-9);
        // 未使用面积也要出现
        assert_eq!(plan.parcel_summaries.len(), 2);
        assert!((plan.parcel_summaries[1].unused_area - 40.0).abs() < 1e-9);

        let share = &plan.parcel_summaries[0].crops[0];
        assert_eq!(share.crop, "Corn");
        assert!((share.share_pct - 28.0 / 30.0 * 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_resource_analysis_rows() {
        let p = problem();
        let model = ModelBuilder::new().build(&p).unwrap();
        let outcome = outcome_with(&model, &[("allocate_Wheat_P1", 40.0)]);

        let plan = SolutionExtractor::new().extract(&p, &model, &outcome);
        assert_eq!(plan.resource_analysis.len(), 3);

        let water = &plan.resource_analysis[0];
        assert_eq!(water.resource, "water");
        assert!((water.used - 12_000.0).abs() < 1e-9);
        assert!((water.remaining - 28_000.0).abs() < 1e-9);
        assert!(water.roi_pct.is_none());

        let budget = &plan.resource_analysis[2];
        assert_eq!(budget.resource, "budget");
        assert!(budget.roi_pct.is_some());
    }

    #[test]
    fn test_custom_epsilon() {
        let p = problem();
        let model = ModelBuilder::new().build(&p).unwrap();
        let outcome = outcome_with(&model, &[("allocate_Wheat_P1", 0.5)]);

        let strict = SolutionExtractor::with_epsilon(1.0).extract(&p, &model, &outcome);
        assert!(strict.allocations.is_empty());

        let loose = SolutionExtractor::with_epsilon(0.1).extract(&p, &model, &outcome);
        assert_eq!(loose.allocations.len(), 1);
    }
}
