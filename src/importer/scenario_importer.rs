// ==========================================
// 农业种植规划系统 - 场景导入器
// ==========================================
// 职责: 场景目录 / 问题 JSON → PlanningProblem
// 场景目录约定: crops.csv + parcels.csv + constraints.csv
// ==========================================

use crate::domain::crop::Crop;
use crate::domain::parcel::LandParcel;
use crate::domain::problem::PlanningProblem;
use crate::domain::resources::{CropCompatibility, ObjectiveWeights, ResourceLimits};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_map::FieldMapper;
use crate::importer::file_parser::UniversalFileParser;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// 场景目录必备文件
const SCENARIO_FILES: [&str; 3] = ["crops.csv", "parcels.csv", "constraints.csv"];

// ==========================================
// ScenarioImporter Trait
// ==========================================
// 用途: 规划数据导入主接口
// 实现者: ScenarioImporterImpl
#[async_trait]
pub trait ScenarioImporter: Send + Sync {
    /// 从表格文件导入作物列表（.csv/.xlsx/.xls）
    async fn import_crops(&self, file_path: &Path) -> ImportResult<Vec<Crop>>;

    /// 从表格文件导入地块列表（.csv/.xlsx/.xls）
    async fn import_parcels(&self, file_path: &Path) -> ImportResult<Vec<LandParcel>>;

    /// 从场景目录加载完整规划问题
    ///
    /// # 参数
    /// - dir: 包含 crops.csv / parcels.csv / constraints.csv 的目录
    ///
    /// # 说明
    /// constraints.csv 为 parameter,value 两列;未出现的参数取教学默认值
    async fn load_scenario(&self, dir: &Path) -> ImportResult<PlanningProblem>;

    /// 从 JSON 文件加载完整规划问题
    async fn load_problem_json(&self, file_path: &Path) -> ImportResult<PlanningProblem>;
}

// ==========================================
// ScenarioImporterImpl 实现
// ==========================================
pub struct ScenarioImporterImpl {
    parser: UniversalFileParser,
    mapper: FieldMapper,
}

impl ScenarioImporterImpl {
    pub fn new() -> Self {
        Self {
            parser: UniversalFileParser,
            mapper: FieldMapper,
        }
    }

    /// 解析 constraints.csv（parameter,value 两列）
    ///
    /// # 说明
    /// - 未出现的参数取教学默认值（预算 100000、水 20000、工时 2000、
    ///   人工单价 15、水价 0.5）
    /// - 未知参数记录 warn 后跳过
    fn parse_constraints(&self, file_path: &Path) -> ImportResult<ResourceLimits> {
        let mut limits = scenario_default_limits();

        let records = self.parser.parse(file_path)?;
        for (idx, row) in records.iter().enumerate() {
            let row_number = idx + 2;
            let key = match row.get("parameter").map(|v| v.trim()) {
                Some(k) if !k.is_empty() => k,
                _ => continue,
            };
            let raw = match row.get("value").map(|v| v.trim()) {
                Some(v) if !v.is_empty() => v,
                _ => {
                    tracing::warn!(parameter = key, "约束参数缺少取值,跳过");
                    continue;
                }
            };

            let parse_f64 = |field: &str| -> ImportResult<f64> {
                raw.parse::<f64>()
                    .map_err(|e| ImportError::TypeConversionError {
                        row: row_number,
                        field: field.to_string(),
                        message: format!("无法解析为数值: {}（{}）", raw, e),
                    })
            };
            let parse_usize = |field: &str| -> ImportResult<usize> {
                raw.parse::<usize>()
                    .map_err(|e| ImportError::TypeConversionError {
                        row: row_number,
                        field: field.to_string(),
                        message: format!("无法解析为非负整数: {}（{}）", raw, e),
                    })
            };

            match key {
                "total_budget" => limits.total_budget = parse_f64(key)?,
                "total_water" => limits.total_water = parse_f64(key)?,
                "total_labor_hours" => limits.total_labor_hours = parse_f64(key)?,
                "total_fertilizer" => limits.total_fertilizer = Some(parse_f64(key)?),
                "total_pesticide" => limits.total_pesticide = Some(parse_f64(key)?),
                "min_crop_diversity" => limits.min_crop_diversity = parse_usize(key)?,
                "max_crop_diversity" => limits.max_crop_diversity = Some(parse_usize(key)?),
                "labor_cost_per_hour" => limits.labor_cost_per_hour = parse_f64(key)?,
                "water_cost_per_m3" => limits.water_cost_per_m3 = parse_f64(key)?,
                other => {
                    tracing::warn!(parameter = other, "未知的约束参数,跳过");
                }
            }
        }

        Ok(limits)
    }
}

impl Default for ScenarioImporterImpl {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ScenarioImporter for ScenarioImporterImpl {
    async fn import_crops(&self, file_path: &Path) -> ImportResult<Vec<Crop>> {
        let records = self.parser.parse(file_path)?;
        let mut crops = Vec::with_capacity(records.len());
        for (idx, row) in records.iter().enumerate() {
            // 数据行从第 2 行开始（第 1 行为表头）
            crops.push(self.mapper.map_crop(row, idx + 2)?);
        }

        tracing::info!(
            file = %file_path.display(),
            count = crops.len(),
            "作物导入完成"
        );
        Ok(crops)
    }

    async fn import_parcels(&self, file_path: &Path) -> ImportResult<Vec<LandParcel>> {
        let records = self.parser.parse(file_path)?;
        let mut parcels = Vec::with_capacity(records.len());
        for (idx, row) in records.iter().enumerate() {
            parcels.push(self.mapper.map_parcel(row, idx + 2)?);
        }

        tracing::info!(
            file = %file_path.display(),
            count = parcels.len(),
            "地块导入完成"
        );
        Ok(parcels)
    }

    async fn load_scenario(&self, dir: &Path) -> ImportResult<PlanningProblem> {
        if !dir.is_dir() {
            return Err(ImportError::FileNotFound(dir.display().to_string()));
        }

        // 检查场景文件齐备
        for file in SCENARIO_FILES {
            if !dir.join(file).exists() {
                return Err(ImportError::IncompleteScenario {
                    dir: dir.display().to_string(),
                    missing: file.to_string(),
                });
            }
        }

        let crops = self.import_crops(&dir.join("crops.csv")).await?;
        let parcels = self.import_parcels(&dir.join("parcels.csv")).await?;
        let limits = self.parse_constraints(&dir.join("constraints.csv"))?;

        tracing::info!(
            scenario = %dir.display(),
            crops = crops.len(),
            parcels = parcels.len(),
            "场景加载完成"
        );

        Ok(PlanningProblem {
            crops,
            parcels,
            limits,
            compatibility: CropCompatibility::default(),
            objectives: ObjectiveWeights::default(),
            planning_horizon_months: 12,
            enable_rotation: false,
            integer_allocations: false,
        })
    }

    async fn load_problem_json(&self, file_path: &Path) -> ImportResult<PlanningProblem> {
        if !file_path.exists() {
            return Err(ImportError::FileNotFound(file_path.display().to_string()));
        }

        let content = std::fs::read_to_string(file_path)?;
        let problem: PlanningProblem = serde_json::from_str(&content)?;

        tracing::info!(
            file = %file_path.display(),
            crops = problem.crops.len(),
            parcels = problem.parcels.len(),
            "问题 JSON 加载完成"
        );
        Ok(problem)
    }
}

/// 保存规划问题为 JSON 文件（pretty 格式）
pub fn save_problem_json(problem: &PlanningProblem, file_path: &Path) -> ImportResult<()> {
    let content = serde_json::to_string_pretty(problem)?;
    std::fs::write(file_path, content)?;
    tracing::info!(file = %file_path.display(), "问题 JSON 已保存");
    Ok(())
}

/// 列出基础目录下的全部有效场景（按名称排序）
///
/// 有效场景 = 同时包含 crops.csv / parcels.csv / constraints.csv 的子目录
pub fn list_scenarios(base_dir: &Path) -> ImportResult<Vec<String>> {
    if !base_dir.is_dir() {
        return Err(ImportError::FileNotFound(base_dir.display().to_string()));
    }

    let mut names = Vec::new();
    for entry in std::fs::read_dir(base_dir)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let complete = SCENARIO_FILES.iter().all(|f| path.join(f).exists());
        if complete {
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                names.push(name.to_string());
            }
        }
    }
    names.sort();
    Ok(names)
}

/// 场景目录缺省约束（教学默认值）
fn scenario_default_limits() -> ResourceLimits {
    ResourceLimits {
        total_budget: 100_000.0,
        total_water: 20_000.0,
        total_labor_hours: 2_000.0,
        total_fertilizer: None,
        total_pesticide: None,
        min_crop_diversity: 1,
        max_crop_diversity: None,
        labor_cost_per_hour: 15.0,
        water_cost_per_m3: 0.5,
        monthly_water_distribution: BTreeMap::new(),
        monthly_labor_distribution: BTreeMap::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_scenario(dir: &Path) {
        fs::write(
            dir.join("crops.csv"),
            "name,profit_per_hectare,water_requirement,labor_hours,cost_per_hectare,growth_duration_days,preferred_soil_types,planting_season\n\
             Wheat,2500,300,25,800,120,\"loamy,clay\",fall\n\
             Corn,3200,450,35,1200,90,\"loamy,sandy\",spring\n",
        )
        .unwrap();
        fs::write(
            dir.join("parcels.csv"),
            "id,area,soil_type,quality_factor\nP1,50,loamy,1.0\nP2,30,sandy,0.9\n",
        )
        .unwrap();
        fs::write(
            dir.join("constraints.csv"),
            "parameter,value\ntotal_budget,150000\ntotal_water,30000\nmin_crop_diversity,2\n",
        )
        .unwrap();
    }

    #[tokio::test]
    async fn test_load_scenario_dir() {
        let temp = TempDir::new().unwrap();
        write_scenario(temp.path());

        let importer = ScenarioImporterImpl::new();
        let problem = importer.load_scenario(temp.path()).await.unwrap();

        assert_eq!(problem.crops.len(), 2);
        assert_eq!(problem.parcels.len(), 2);
        assert_eq!(problem.limits.total_budget, 150_000.0);
        assert_eq!(problem.limits.total_water, 30_000.0);
        assert_eq!(problem.limits.min_crop_diversity, 2);
        // 未出现的参数取默认值
        assert_eq!(problem.limits.total_labor_hours, 2_000.0);
        assert_eq!(problem.limits.labor_cost_per_hour, 15.0);
    }

    #[tokio::test]
    async fn test_load_scenario_missing_file() {
        let temp = TempDir::new().unwrap();
        write_scenario(temp.path());
        fs::remove_file(temp.path().join("constraints.csv")).unwrap();

        let importer = ScenarioImporterImpl::new();
        let err = importer.load_scenario(temp.path()).await.unwrap_err();
        match err {
            ImportError::IncompleteScenario { missing, .. } => {
                assert_eq!(missing, "constraints.csv");
            }
            other => panic!("expected IncompleteScenario, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_problem_json_roundtrip() {
        let temp = TempDir::new().unwrap();
        write_scenario(temp.path());

        let importer = ScenarioImporterImpl::new();
        let problem = importer.load_scenario(temp.path()).await.unwrap();

        let json_path = temp.path().join("problem.json");
        save_problem_json(&problem, &json_path).unwrap();
        let loaded = importer.load_problem_json(&json_path).await.unwrap();

        assert_eq!(loaded, problem);
    }

    #[test]
    fn test_list_scenarios_sorted_and_filtered() {
        let temp = TempDir::new().unwrap();

        let beta = temp.path().join("beta");
        fs::create_dir(&beta).unwrap();
        write_scenario(&beta);

        let alpha = temp.path().join("alpha");
        fs::create_dir(&alpha).unwrap();
        write_scenario(&alpha);

        // 不完整目录应被过滤
        let broken = temp.path().join("broken");
        fs::create_dir(&broken).unwrap();
        fs::write(broken.join("crops.csv"), "name\n").unwrap();

        let names = list_scenarios(temp.path()).unwrap();
        assert_eq!(names, vec!["alpha".to_string(), "beta".to_string()]);
    }
}
