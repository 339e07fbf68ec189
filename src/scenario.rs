// ==========================================
// 农业种植规划系统 - 内置教学场景
// ==========================================
// 职责: 提供 basic / intermediate / advanced 三个教学场景,
//       供 CLI demo 与测试使用
// 红线: 场景数据是教学口径,不随配置变化
// ==========================================

use std::collections::BTreeMap;

use crate::domain::crop::Crop;
use crate::domain::parcel::LandParcel;
use crate::domain::problem::PlanningProblem;
use crate::domain::resources::{CropCompatibility, ObjectiveWeights, ResourceLimits};
use crate::domain::types::{Season, SoilType};

/// 内置场景名称(按难度排列)
pub fn names() -> &'static [&'static str] {
    &["basic", "intermediate", "advanced"]
}

/// 按名称取内置场景,未知名称返回 None
pub fn by_name(name: &str) -> Option<PlanningProblem> {
    match name.trim().to_lowercase().as_str() {
        "basic" => Some(basic()),
        "intermediate" => Some(intermediate()),
        "advanced" => Some(advanced()),
        _ => None,
    }
}

#[allow(clippy::too_many_arguments)]
fn crop(
    name: &str,
    profit: f64,
    water: f64,
    labor: f64,
    cost: f64,
    growth_days: u32,
    soils: &[SoilType],
    season: Season,
    rotation_group: i32,
    fertilizer: f64,
    pesticide: f64,
) -> Crop {
    Crop {
        name: name.to_string(),
        profit_per_hectare: profit,
        water_requirement: water,
        labor_hours: labor,
        cost_per_hectare: cost,
        growth_duration_days: growth_days,
        preferred_soil_types: soils.to_vec(),
        planting_season: season,
        min_area: 0.0,
        max_area: None,
        rotation_group,
        fertilizer_need: fertilizer,
        pesticide_need: pesticide,
    }
}

fn with_area_bounds(mut crop: Crop, min_area: f64, max_area: f64) -> Crop {
    crop.min_area = min_area;
    crop.max_area = Some(max_area);
    crop
}

#[allow(clippy::too_many_arguments)]
fn parcel(
    id: &str,
    area: f64,
    soil_type: SoilType,
    water_capacity: f64,
    previous_rotation_group: i32,
    quality_factor: f64,
    slope: f64,
) -> LandParcel {
    let mut parcel = LandParcel::new(id, area, soil_type);
    parcel.water_capacity = Some(water_capacity);
    parcel.previous_crop_rotation_group = previous_rotation_group;
    parcel.quality_factor = quality_factor;
    parcel.slope_percentage = slope;
    parcel
}

// ==========================================
// basic - 纯 LP 入门场景
// ==========================================
// 3 作物 × 2 地块,只有全场资源约束
pub fn basic() -> PlanningProblem {
    let crops = vec![
        crop(
            "Wheat",
            2500.0,
            300.0,
            25.0,
            800.0,
            120,
            &[SoilType::Loamy, SoilType::Clay],
            Season::Fall,
            2,
            150.0,
            5.0,
        ),
        crop(
            "Corn",
            3200.0,
            450.0,
            35.0,
            1200.0,
            90,
            &[SoilType::Loamy, SoilType::Sandy],
            Season::Spring,
            2,
            200.0,
            8.0,
        ),
        crop(
            "Tomato",
            5500.0,
            600.0,
            60.0,
            2000.0,
            75,
            &[SoilType::Loamy, SoilType::Silty],
            Season::Spring,
            3,
            250.0,
            12.0,
        ),
    ];

    let parcels = vec![
        parcel("P1", 50.0, SoilType::Loamy, 20_000.0, 0, 1.0, 2.0),
        parcel("P2", 30.0, SoilType::Sandy, 12_000.0, 0, 0.9, 5.0),
    ];

    PlanningProblem {
        crops,
        parcels,
        limits: ResourceLimits {
            total_budget: 150_000.0,
            total_water: 30_000.0,
            total_labor_hours: 3_000.0,
            total_fertilizer: Some(15_000.0),
            total_pesticide: Some(500.0),
            min_crop_diversity: 2,
            max_crop_diversity: Some(3),
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

// ==========================================
// intermediate - 带面积上下限与相容性规则的场景
// ==========================================
// 5 作物 × 3 地块,所有作物带面积上下限,启用轮作规则校验
pub fn intermediate() -> PlanningProblem {
    let crops = vec![
        with_area_bounds(
            crop(
                "Wheat",
                2500.0,
                300.0,
                25.0,
                800.0,
                120,
                &[SoilType::Loamy, SoilType::Clay],
                Season::Fall,
                2,
                150.0,
                5.0,
            ),
            10.0,
            40.0,
        ),
        with_area_bounds(
            crop(
                "Corn",
                3200.0,
                450.0,
                35.0,
                1200.0,
                90,
                &[SoilType::Loamy, SoilType::Sandy],
                Season::Spring,
                2,
                200.0,
                8.0,
            ),
            15.0,
            50.0,
        ),
        with_area_bounds(
            crop(
                "Soybean",
                2800.0,
                350.0,
                20.0,
                700.0,
                100,
                &[SoilType::Loamy, SoilType::Silty],
                Season::Spring,
                1,
                // 豆科固氮,化肥需求低
                80.0,
                4.0,
            ),
            10.0,
            35.0,
        ),
        with_area_bounds(
            crop(
                "Tomato",
                5500.0,
                600.0,
                60.0,
                2000.0,
                75,
                &[SoilType::Loamy, SoilType::Silty],
                Season::Spring,
                3,
                250.0,
                12.0,
            ),
            5.0,
            25.0,
        ),
        with_area_bounds(
            crop(
                "Potato",
                4200.0,
                500.0,
                45.0,
                1500.0,
                85,
                &[SoilType::Sandy, SoilType::Loamy],
                Season::Spring,
                3,
                180.0,
                10.0,
            ),
            8.0,
            30.0,
        ),
    ];

    let parcels = vec![
        parcel("P1", 40.0, SoilType::Loamy, 18_000.0, 2, 1.1, 1.0),
        parcel("P2", 35.0, SoilType::Sandy, 14_000.0, 3, 0.95, 4.0),
        parcel("P3", 25.0, SoilType::Silty, 12_000.0, 1, 1.0, 2.0),
    ];

    PlanningProblem {
        crops,
        parcels,
        limits: ResourceLimits {
            total_budget: 200_000.0,
            total_water: 40_000.0,
            total_labor_hours: 4_000.0,
            total_fertilizer: Some(18_000.0),
            total_pesticide: Some(600.0),
            min_crop_diversity: 3,
            max_crop_diversity: Some(5),
            labor_cost_per_hour: 18.0,
            water_cost_per_m3: 0.6,
            monthly_water_distribution: BTreeMap::new(),
            monthly_labor_distribution: BTreeMap::new(),
        },
        compatibility: CropCompatibility {
            // 番茄与马铃薯同为茄科,不宜同场
            incompatible_pairs: vec![("Tomato".to_string(), "Potato".to_string())],
            rotation_rules: BTreeMap::from([
                (1, vec![2, 3]),
                (2, vec![1, 3]),
                (3, vec![1, 2]),
            ]),
            beneficial_pairs: vec![("Corn".to_string(), "Soybean".to_string())],
            synergy_bonus: 1.15,
        },
        objectives: ObjectiveWeights::default(),
        planning_horizon_months: 12,
        enable_rotation: true,
        integer_allocations: false,
    }
}

// ==========================================
// advanced - 多目标权重 + 月度分布的完整场景
// ==========================================
// 7 作物 × 4 地块,带月度水/工时分布与多目标权重
pub fn advanced() -> PlanningProblem {
    let crops = vec![
        with_area_bounds(
            crop(
                "Wheat",
                2600.0,
                320.0,
                28.0,
                850.0,
                120,
                &[SoilType::Loamy, SoilType::Clay],
                Season::Fall,
                2,
                160.0,
                6.0,
            ),
            12.0,
            45.0,
        ),
        with_area_bounds(
            crop(
                "Barley",
                2200.0,
                280.0,
                22.0,
                700.0,
                110,
                &[SoilType::Loamy, SoilType::Sandy],
                Season::Fall,
                2,
                140.0,
                5.0,
            ),
            10.0,
            35.0,
        ),
        with_area_bounds(
            crop(
                "Corn",
                3400.0,
                480.0,
                38.0,
                1300.0,
                95,
                &[SoilType::Loamy, SoilType::Clay],
                Season::Spring,
                2,
                220.0,
                9.0,
            ),
            15.0,
            50.0,
        ),
        with_area_bounds(
            crop(
                "Soybean",
                3000.0,
                370.0,
                24.0,
                750.0,
                105,
                &[SoilType::Loamy, SoilType::Silty],
                Season::Spring,
                1,
                70.0,
                4.0,
            ),
            12.0,
            40.0,
        ),
        with_area_bounds(
            crop(
                "Tomato",
                6000.0,
                650.0,
                65.0,
                2200.0,
                80,
                &[SoilType::Loamy, SoilType::Silty],
                Season::Spring,
                3,
                280.0,
                15.0,
            ),
            5.0,
            20.0,
        ),
        with_area_bounds(
            crop(
                "Potato",
                4500.0,
                530.0,
                48.0,
                1600.0,
                90,
                &[SoilType::Sandy, SoilType::Loamy],
                Season::Spring,
                3,
                200.0,
                11.0,
            ),
            8.0,
            28.0,
        ),
        with_area_bounds(
            crop(
                "Sunflower",
                2900.0,
                400.0,
                26.0,
                900.0,
                100,
                &[SoilType::Loamy, SoilType::Sandy, SoilType::Clay],
                Season::Spring,
                // 油料作物
                4,
                130.0,
                6.0,
            ),
            10.0,
            38.0,
        ),
    ];

    let parcels = vec![
        parcel("P1_North", 45.0, SoilType::Loamy, 20_000.0, 2, 1.15, 1.0),
        parcel("P2_East", 38.0, SoilType::Clay, 16_000.0, 1, 1.05, 3.0),
        parcel("P3_South", 32.0, SoilType::Sandy, 14_000.0, 3, 0.9, 6.0),
        parcel("P4_West", 28.0, SoilType::Silty, 13_000.0, 4, 1.0, 2.0),
    ];

    // 用水/用工高峰在 4~6 月
    let monthly_water = BTreeMap::from([
        (1, 2_000.0),
        (2, 2_000.0),
        (3, 3_500.0),
        (4, 6_000.0),
        (5, 7_000.0),
        (6, 6_500.0),
        (7, 5_000.0),
        (8, 4_000.0),
        (9, 3_000.0),
        (10, 2_500.0),
        (11, 2_000.0),
        (12, 2_000.0),
    ]);
    let monthly_labor = BTreeMap::from([
        (1, 200.0),
        (2, 200.0),
        (3, 400.0),
        (4, 600.0),
        (5, 700.0),
        (6, 650.0),
        (7, 500.0),
        (8, 450.0),
        (9, 400.0),
        (10, 350.0),
        (11, 250.0),
        (12, 200.0),
    ]);

    PlanningProblem {
        crops,
        parcels,
        limits: ResourceLimits {
            total_budget: 280_000.0,
            total_water: 55_000.0,
            total_labor_hours: 5_500.0,
            total_fertilizer: Some(25_000.0),
            total_pesticide: Some(900.0),
            min_crop_diversity: 4,
            max_crop_diversity: Some(6),
            labor_cost_per_hour: 20.0,
            water_cost_per_m3: 0.7,
            monthly_water_distribution: monthly_water,
            monthly_labor_distribution: monthly_labor,
        },
        compatibility: CropCompatibility {
            incompatible_pairs: vec![
                ("Tomato".to_string(), "Potato".to_string()),
                ("Wheat".to_string(), "Barley".to_string()),
            ],
            rotation_rules: BTreeMap::from([
                (1, vec![2, 3, 4]),
                (2, vec![1, 3, 4]),
                (3, vec![1, 2, 4]),
                (4, vec![1, 2, 3]),
            ]),
            beneficial_pairs: vec![
                ("Corn".to_string(), "Soybean".to_string()),
                ("Wheat".to_string(), "Soybean".to_string()),
                ("Sunflower".to_string(), "Soybean".to_string()),
            ],
            synergy_bonus: 1.2,
        },
        objectives: ObjectiveWeights {
            profit_weight: 1.0,
            sustainability_weight: 0.3,
            diversity_weight: 0.2,
            water_efficiency_weight: 0.15,
        },
        planning_horizon_months: 12,
        enable_rotation: true,
        integer_allocations: false,
    }
}
