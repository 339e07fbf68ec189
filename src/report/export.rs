// ==========================================
// 农业种植规划系统 - 方案导出
// ==========================================
// 职责: AllocationPlan → JSON 文件 / 三张 CSV 表
// 红线: 输出目录不存在时自动创建;文件名由调用方决定
// ==========================================

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::json;

use crate::engine::solution::AllocationPlan;
use crate::report::error::ReportResult;

/// 导出完整方案为 JSON
///
/// 结构: metadata(时间戳/运行 ID/后端/状态) + KPI + 分配明细 + 各类汇总
pub fn export_json(plan: &AllocationPlan, path: &Path) -> ReportResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let payload = json!({
        "metadata": {
            "generated_at": chrono::Local::now().to_rfc3339(),
            "run_id": uuid::Uuid::new_v4().to_string(),
            "backend": plan.backend,
            "status": plan.status,
            "solve_time_seconds": plan.solve_time_seconds,
        },
        "objective_value": plan.objective_value,
        "kpis": plan.kpis,
        "totals": plan.totals,
        "allocations": plan.allocations,
        "crop_summaries": plan.crop_summaries,
        "parcel_summaries": plan.parcel_summaries,
        "resource_analysis": plan.resource_analysis,
    });

    fs::write(path, serde_json::to_string_pretty(&payload)?)?;
    tracing::info!(path = %path.display(), "方案 JSON 导出完成");
    Ok(())
}

/// 导出方案为三张 CSV 表
///
/// # 返回
/// 写出的文件路径: {base}_allocation.csv / {base}_crops.csv / {base}_parcels.csv
pub fn export_csv(plan: &AllocationPlan, dir: &Path, base_name: &str) -> ReportResult<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;
    let mut written = Vec::with_capacity(3);

    // 分配明细
    let allocation_path = dir.join(format!("{}_allocation.csv", base_name));
    {
        let mut writer = csv::Writer::from_path(&allocation_path)?;
        writer.write_record(["crop", "parcel", "area_ha"])?;
        for allocation in &plan.allocations {
            writer.write_record([
                allocation.crop.as_str(),
                allocation.parcel.as_str(),
                &format!("{:.2}", allocation.area),
            ])?;
        }
        writer.flush()?;
    }
    written.push(allocation_path);

    // 作物汇总
    let crops_path = dir.join(format!("{}_crops.csv", base_name));
    {
        let mut writer = csv::Writer::from_path(&crops_path)?;
        writer.write_record([
            "crop",
            "total_area",
            "parcel_count",
            "profit",
            "water_needed",
            "labor_needed",
            "cost",
            "season",
        ])?;
        for crop in &plan.crop_summaries {
            writer.write_record([
                crop.crop.as_str(),
                &format!("{:.2}", crop.total_area),
                &crop.parcel_count.to_string(),
                &format!("{:.2}", crop.profit),
                &format!("{:.2}", crop.water_needed),
                &format!("{:.2}", crop.labor_needed),
                &format!("{:.2}", crop.cost),
                crop.season.as_str(),
            ])?;
        }
        writer.flush()?;
    }
    written.push(crops_path);

    // 地块汇总
    let parcels_path = dir.join(format!("{}_parcels.csv", base_name));
    {
        let mut writer = csv::Writer::from_path(&parcels_path)?;
        writer.write_record([
            "parcel",
            "total_area",
            "used_area",
            "utilization_pct",
            "soil_type",
            "has_irrigation",
        ])?;
        for parcel in &plan.parcel_summaries {
            writer.write_record([
                parcel.parcel.as_str(),
                &format!("{:.2}", parcel.total_area),
                &format!("{:.2}", parcel.used_area),
                &format!("{:.1}", parcel.utilization_pct),
                parcel.soil_type.as_str(),
                if parcel.has_irrigation { "yes" } else { "no" },
            ])?;
        }
        writer.flush()?;
    }
    written.push(parcels_path);

    tracing::info!(dir = %dir.display(), files = written.len(), "方案 CSV 导出完成");
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::solution::{Allocation, Kpis, PlanTotals};
    use crate::solver::SolveStatus;

    fn minimal_plan() -> AllocationPlan {
        AllocationPlan {
            status: SolveStatus::Optimal,
            backend: "microlp".to_string(),
            objective_value: 60_000.0,
            solve_time_seconds: 0.02,
            allocations: vec![
                Allocation {
                    crop: "Wheat".to_string(),
                    parcel: "P1".to_string(),
                    area: 30.0,
                    expected_profit: 60_000.0,
                    water_used: 9_000.0,
                    labor_used: 600.0,
                    cost: 15_000.0,
                },
                Allocation {
                    crop: "Corn".to_string(),
                    parcel: "P2".to_string(),
                    area: 10.0,
                    expected_profit: 30_000.0,
                    water_used: 4_500.0,
                    labor_used: 350.0,
                    cost: 12_000.0,
                },
            ],
            totals: PlanTotals::default(),
            kpis: Kpis::default(),
            crop_summaries: vec![],
            parcel_summaries: vec![],
            resource_analysis: vec![],
        }
    }

    #[test]
    fn test_export_json_writes_metadata_and_payload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plan.json");

        export_json(&minimal_plan(), &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(value["metadata"]["backend"], "microlp");
        assert_eq!(value["metadata"]["status"], "optimal");
        assert!(value["metadata"]["run_id"].as_str().unwrap().len() > 10);
        assert_eq!(value["allocations"].as_array().unwrap().len(), 2);
        assert_eq!(value["objective_value"], 60_000.0);
    }

    #[test]
    fn test_export_csv_writes_three_files() {
        let dir = tempfile::tempdir().unwrap();

        let files = export_csv(&minimal_plan(), dir.path(), "result").unwrap();
        assert_eq!(files.len(), 3);
        for file in &files {
            assert!(file.exists());
        }

        let allocation = std::fs::read_to_string(&files[0]).unwrap();
        assert!(allocation.starts_with("crop,parcel,area_ha"));
        // 两条分配 + 表头
        assert_eq!(allocation.trim().lines().count(), 3);
        assert!(allocation.contains("Wheat,P1,30.00"));
    }

    #[test]
    fn test_export_creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("out/deep");

        let path = nested.join("plan.json");
        export_json(&minimal_plan(), &path).unwrap();
        assert!(path.exists());
    }
}
