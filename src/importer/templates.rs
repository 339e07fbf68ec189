// ==========================================
// 农业种植规划系统 - 数据模板生成
// ==========================================
// 职责: 生成供用户填写的作物/地块/约束模板文件
// ==========================================

use crate::domain::resources::ResourceLimits;
use crate::importer::error::ImportResult;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// 生成数据录入模板文件
///
/// # 输出
/// - crops_template.csv: 作物表模板（含两行示例）
/// - parcels_template.csv: 地块表模板（含两行示例）
/// - constraints_template.json: 资源约束模板
///
/// # 返回
/// - 生成的文件路径列表
pub fn write_templates(output_dir: &Path) -> ImportResult<Vec<PathBuf>> {
    std::fs::create_dir_all(output_dir)?;
    let mut written = Vec::new();

    // 作物模板
    let crops_path = output_dir.join("crops_template.csv");
    {
        let mut writer = csv::Writer::from_path(&crops_path)?;
        writer.write_record([
            "name",
            "profit_per_hectare",
            "water_requirement",
            "labor_hours",
            "cost_per_hectare",
            "growth_duration_days",
            "preferred_soil_types",
            "planting_season",
            "min_area",
            "max_area",
            "rotation_group",
            "fertilizer_need",
            "pesticide_need",
        ])?;
        writer.write_record([
            "Wheat", "2500", "300", "25", "800", "120", "loamy,clay", "fall", "10", "40", "2",
            "150", "5",
        ])?;
        writer.write_record([
            "Corn", "3200", "450", "35", "1200", "90", "loamy,sandy", "spring", "15", "50", "2",
            "200", "8",
        ])?;
        writer.flush()?;
    }
    written.push(crops_path);

    // 地块模板
    let parcels_path = output_dir.join("parcels_template.csv");
    {
        let mut writer = csv::Writer::from_path(&parcels_path)?;
        writer.write_record([
            "id",
            "area",
            "soil_type",
            "has_irrigation",
            "water_capacity",
            "is_divisible",
            "previous_crop_rotation_group",
            "quality_factor",
            "slope_percentage",
        ])?;
        writer.write_record(["P1", "50", "loamy", "true", "20000", "true", "0", "1.0", "2"])?;
        writer.write_record(["P2", "30", "sandy", "true", "12000", "true", "0", "0.9", "5"])?;
        writer.flush()?;
    }
    written.push(parcels_path);

    // 约束模板（JSON）
    let constraints_path = output_dir.join("constraints_template.json");
    let template_limits = ResourceLimits {
        total_budget: 150_000.0,
        total_water: 30_000.0,
        total_labor_hours: 3_000.0,
        total_fertilizer: Some(15_000.0),
        total_pesticide: Some(500.0),
        min_crop_diversity: 2,
        max_crop_diversity: None,
        labor_cost_per_hour: 15.0,
        water_cost_per_m3: 0.5,
        monthly_water_distribution: BTreeMap::new(),
        monthly_labor_distribution: BTreeMap::new(),
    };
    std::fs::write(
        &constraints_path,
        serde_json::to_string_pretty(&template_limits)?,
    )?;
    written.push(constraints_path);

    tracing::info!(dir = %output_dir.display(), files = written.len(), "模板文件生成完成");
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::importer::file_parser::{CsvParser, FileParser};
    use tempfile::TempDir;

    #[test]
    fn test_templates_created_and_parseable() {
        let temp = TempDir::new().unwrap();
        let files = write_templates(temp.path()).unwrap();
        assert_eq!(files.len(), 3);
        for file in &files {
            assert!(file.exists());
        }

        // 模板应能被自身的解析器读回
        let parser = CsvParser;
        let crops = parser
            .parse_to_raw_records(&temp.path().join("crops_template.csv"))
            .unwrap();
        assert_eq!(crops.len(), 2);
        assert_eq!(crops[0].get("name"), Some(&"Wheat".to_string()));

        let limits: ResourceLimits = serde_json::from_str(
            &std::fs::read_to_string(temp.path().join("constraints_template.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(limits.total_budget, 150_000.0);
        assert_eq!(limits.max_crop_diversity, None);
    }

    #[test]
    fn test_templates_create_missing_dir() {
        let temp = TempDir::new().unwrap();
        let nested = temp.path().join("templates").join("v1");
        write_templates(&nested).unwrap();
        assert!(nested.join("parcels_template.csv").exists());
    }
}
