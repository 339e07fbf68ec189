// ==========================================
// 农业种植规划系统 - 文本报告
// ==========================================
// 职责: AllocationPlan → 分节的纯文本报告(CLI 输出与存档用)
// ==========================================

use crate::engine::solution::AllocationPlan;

const HEAVY_RULE: &str = "================================================================================";
const LIGHT_RULE: &str = "--------------------------------------------------------------------------------";

/// 渲染完整文本报告
///
/// # 参数
/// - plan: 分配方案
/// - include_details: 是否包含地块明细与作物分布
pub fn render_text_report(plan: &AllocationPlan, include_details: bool) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push(HEAVY_RULE.to_string());
    lines.push("AGRICULTURAL LAND ALLOCATION REPORT".to_string());
    lines.push(HEAVY_RULE.to_string());
    lines.push(format!(
        "Generated: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    ));
    lines.push(format!("Solver: {} ({})", plan.backend, plan.status));
    lines.push(format!("Objective Value: {:.2}", plan.objective_value));
    lines.push(String::new());

    lines.push(LIGHT_RULE.to_string());
    lines.push("KEY PERFORMANCE INDICATORS".to_string());
    lines.push(LIGHT_RULE.to_string());
    let kpis = &plan.kpis;
    lines.push(format!("Total Profit: {:.2}", kpis.total_profit));
    lines.push(format!("Profit per Hectare: {:.2}", kpis.profit_per_hectare));
    lines.push(format!("ROI: {:.2}%", kpis.roi_pct));
    lines.push(format!("Land Utilization: {:.2}%", kpis.land_utilization_pct));
    lines.push(format!(
        "Water Efficiency: {:.2} profit/m³",
        kpis.water_efficiency
    ));
    lines.push(format!(
        "Labor Efficiency: {:.2} profit/hour",
        kpis.labor_efficiency
    ));
    lines.push(format!("Number of Crops: {}", kpis.crops_planted));
    lines.push(format!(
        "Average Area per Crop: {:.2} ha",
        kpis.avg_area_per_crop
    ));
    lines.push(format!(
        "Crop Diversity Index: {:.3}",
        kpis.crop_diversity_index
    ));
    lines.push(format!("Solve Time: {:.2} seconds", kpis.solve_time_seconds));
    lines.push(String::new());

    lines.push(LIGHT_RULE.to_string());
    lines.push("RESOURCE UTILIZATION".to_string());
    lines.push(LIGHT_RULE.to_string());
    for usage in &plan.resource_analysis {
        lines.push(format!("{}:", usage.resource.to_uppercase()));
        lines.push(format!(
            "  Used: {:.2} / {:.2} ({:.1}%)",
            usage.used, usage.available, usage.utilization_pct
        ));
        lines.push(format!("  Remaining: {:.2}", usage.remaining));
        lines.push(format!("  Efficiency: {:.2}", usage.efficiency));
        if let Some(roi) = usage.roi_pct {
            lines.push(format!("  ROI: {:.2}%", roi));
        }
    }
    lines.push(String::new());

    lines.push(LIGHT_RULE.to_string());
    lines.push("CROP ALLOCATION SUMMARY".to_string());
    lines.push(LIGHT_RULE.to_string());
    for crop in &plan.crop_summaries {
        lines.push(format!("{}:", crop.crop));
        lines.push(format!("  Total Area: {:.2} hectares", crop.total_area));
        lines.push(format!("  Expected Profit: {:.2}", crop.profit));
        lines.push(format!("  Water Required: {:.2} m³", crop.water_needed));
        lines.push(format!("  Labor Required: {:.2} hours", crop.labor_needed));
        lines.push(format!("  Planting Season: {}", crop.season));
        if include_details {
            lines.push(format!(
                "  Distributed across {} parcel(s):",
                crop.parcel_count
            ));
            for share in &crop.parcels {
                lines.push(format!("    - {}: {:.2} ha", share.parcel, share.area));
            }
        }
        lines.push(String::new());
    }

    if include_details {
        lines.push(LIGHT_RULE.to_string());
        lines.push("PARCEL UTILIZATION".to_string());
        lines.push(LIGHT_RULE.to_string());
        for parcel in &plan.parcel_summaries {
            lines.push(format!("Parcel {} ({}):", parcel.parcel, parcel.soil_type));
            lines.push(format!("  Total Area: {:.2} ha", parcel.total_area));
            lines.push(format!(
                "  Used: {:.2} ha ({:.1}%)",
                parcel.used_area, parcel.utilization_pct
            ));
            lines.push(format!("  Unused: {:.2} ha", parcel.unused_area));
            if !parcel.crops.is_empty() {
                lines.push("  Crops planted:".to_string());
                for share in &parcel.crops {
                    lines.push(format!(
                        "    - {}: {:.2} ha ({:.1}%)",
                        share.crop, share.area, share.share_pct
                    ));
                }
            }
            lines.push(String::new());
        }
    }

    lines.push(HEAVY_RULE.to_string());
    lines.join("\n")
}
