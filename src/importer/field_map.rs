// ==========================================
// 农业种植规划系统 - 字段映射器实现
// ==========================================
// 职责: 原始行记录 → 领域实体（类型转换 + 默认值 + 行级错误上下文）
// 行号约定: 数据行从 2 开始计（第 1 行为表头）
// ==========================================

use crate::domain::crop::Crop;
use crate::domain::parcel::LandParcel;
use crate::domain::types::{Season, SoilType};
use crate::importer::error::{ImportError, ImportResult};
use std::collections::HashMap;

pub struct FieldMapper;

impl FieldMapper {
    /// 映射一行作物记录
    ///
    /// # 参数
    /// - row: 表头 → 单元格文本
    /// - row_number: 源文件行号（用于错误定位）
    pub fn map_crop(&self, row: &HashMap<String, String>, row_number: usize) -> ImportResult<Crop> {
        let crop = Crop {
            name: self.require_string(row, "name", row_number)?,
            profit_per_hectare: self.require_f64(row, "profit_per_hectare", row_number)?,
            water_requirement: self.require_f64(row, "water_requirement", row_number)?,
            labor_hours: self.require_f64(row, "labor_hours", row_number)?,
            cost_per_hectare: self.require_f64(row, "cost_per_hectare", row_number)?,
            growth_duration_days: self.require_u32(row, "growth_duration_days", row_number)?,
            preferred_soil_types: self.parse_soil_list(row, "preferred_soil_types", row_number)?,
            planting_season: self.parse_season(row, "planting_season", row_number)?,
            min_area: self.optional_f64(row, "min_area", row_number)?.unwrap_or(0.0),
            max_area: self.optional_f64(row, "max_area", row_number)?,
            rotation_group: self.optional_i32(row, "rotation_group", row_number)?.unwrap_or(0),
            fertilizer_need: self
                .optional_f64(row, "fertilizer_need", row_number)?
                .unwrap_or(0.0),
            pesticide_need: self
                .optional_f64(row, "pesticide_need", row_number)?
                .unwrap_or(0.0),
        };

        // 领域自校验（负值、面积上下限等）
        crop.validate()
            .map_err(|e| ImportError::DomainValidationError {
                row: row_number,
                message: e.to_string(),
            })?;

        Ok(crop)
    }

    /// 映射一行地块记录
    pub fn map_parcel(
        &self,
        row: &HashMap<String, String>,
        row_number: usize,
    ) -> ImportResult<LandParcel> {
        let parcel = LandParcel {
            id: self.require_string(row, "id", row_number)?,
            area: self.require_f64(row, "area", row_number)?,
            soil_type: self.parse_soil(row, "soil_type", row_number)?,
            has_irrigation: self.parse_bool(row, "has_irrigation", row_number, true)?,
            water_capacity: self.optional_f64(row, "water_capacity", row_number)?,
            is_divisible: self.parse_bool(row, "is_divisible", row_number, true)?,
            previous_crop_rotation_group: self
                .optional_i32(row, "previous_crop_rotation_group", row_number)?
                .unwrap_or(0),
            quality_factor: self
                .optional_f64(row, "quality_factor", row_number)?
                .unwrap_or(1.0),
            slope_percentage: self
                .optional_f64(row, "slope_percentage", row_number)?
                .unwrap_or(0.0),
        };

        parcel
            .validate()
            .map_err(|e| ImportError::DomainValidationError {
                row: row_number,
                message: e.to_string(),
            })?;

        Ok(parcel)
    }

    // ===== 基础提取与转换 =====

    /// 提取必填字符串字段
    fn require_string(
        &self,
        row: &HashMap<String, String>,
        key: &str,
        row_number: usize,
    ) -> ImportResult<String> {
        match row.get(key).map(|v| v.trim()) {
            Some(v) if !v.is_empty() => Ok(v.to_string()),
            _ => Err(ImportError::MissingColumn {
                row: row_number,
                column: key.to_string(),
            }),
        }
    }

    /// 提取可选字符串字段（缺列或空值均返回 None）
    fn optional_string(&self, row: &HashMap<String, String>, key: &str) -> Option<String> {
        row.get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(|v| v.to_string())
    }

    /// 解析必填浮点数
    fn require_f64(
        &self,
        row: &HashMap<String, String>,
        key: &str,
        row_number: usize,
    ) -> ImportResult<f64> {
        let raw = self.require_string(row, key, row_number)?;
        raw.parse::<f64>()
            .map_err(|e| ImportError::TypeConversionError {
                row: row_number,
                field: key.to_string(),
                message: format!("无法解析为数值: {}（{}）", raw, e),
            })
    }

    /// 解析可选浮点数
    fn optional_f64(
        &self,
        row: &HashMap<String, String>,
        key: &str,
        row_number: usize,
    ) -> ImportResult<Option<f64>> {
        match self.optional_string(row, key) {
            None => Ok(None),
            Some(raw) => raw
                .parse::<f64>()
                .map(Some)
                .map_err(|e| ImportError::TypeConversionError {
                    row: row_number,
                    field: key.to_string(),
                    message: format!("无法解析为数值: {}（{}）", raw, e),
                }),
        }
    }

    /// 解析必填非负整数
    fn require_u32(
        &self,
        row: &HashMap<String, String>,
        key: &str,
        row_number: usize,
    ) -> ImportResult<u32> {
        let raw = self.require_string(row, key, row_number)?;
        raw.parse::<u32>()
            .map_err(|e| ImportError::TypeConversionError {
                row: row_number,
                field: key.to_string(),
                message: format!("无法解析为非负整数: {}（{}）", raw, e),
            })
    }

    /// 解析可选整数
    fn optional_i32(
        &self,
        row: &HashMap<String, String>,
        key: &str,
        row_number: usize,
    ) -> ImportResult<Option<i32>> {
        match self.optional_string(row, key) {
            None => Ok(None),
            Some(raw) => raw
                .parse::<i32>()
                .map(Some)
                .map_err(|e| ImportError::TypeConversionError {
                    row: row_number,
                    field: key.to_string(),
                    message: format!("无法解析为整数: {}（{}）", raw, e),
                }),
        }
    }

    /// 解析布尔字段（true/false/1/0/yes/no，大小写不敏感，缺省按 default）
    fn parse_bool(
        &self,
        row: &HashMap<String, String>,
        key: &str,
        row_number: usize,
        default: bool,
    ) -> ImportResult<bool> {
        match self.optional_string(row, key) {
            None => Ok(default),
            Some(raw) => match raw.to_lowercase().as_str() {
                "true" | "1" | "yes" => Ok(true),
                "false" | "0" | "no" => Ok(false),
                _ => Err(ImportError::TypeConversionError {
                    row: row_number,
                    field: key.to_string(),
                    message: format!("无法解析为布尔值: {}（支持 true/false/1/0/yes/no）", raw),
                }),
            },
        }
    }

    /// 解析单个土壤类型
    fn parse_soil(
        &self,
        row: &HashMap<String, String>,
        key: &str,
        row_number: usize,
    ) -> ImportResult<SoilType> {
        let raw = self.require_string(row, key, row_number)?;
        SoilType::from_str(&raw).ok_or_else(|| ImportError::InvalidEnumValue {
            row: row_number,
            field: key.to_string(),
            value: raw,
            expected: "支持 clay/sandy/loamy/silty/peaty".to_string(),
        })
    }

    /// 解析逗号分隔的土壤类型列表（单元格内多值）
    fn parse_soil_list(
        &self,
        row: &HashMap<String, String>,
        key: &str,
        row_number: usize,
    ) -> ImportResult<Vec<SoilType>> {
        let raw = self.require_string(row, key, row_number)?;
        let mut soils = Vec::new();
        for part in raw.split(',') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            let soil = SoilType::from_str(part).ok_or_else(|| ImportError::InvalidEnumValue {
                row: row_number,
                field: key.to_string(),
                value: part.to_string(),
                expected: "支持 clay/sandy/loamy/silty/peaty".to_string(),
            })?;
            if !soils.contains(&soil) {
                soils.push(soil);
            }
        }
        Ok(soils)
    }

    /// 解析种植季节
    fn parse_season(
        &self,
        row: &HashMap<String, String>,
        key: &str,
        row_number: usize,
    ) -> ImportResult<Season> {
        let raw = self.require_string(row, key, row_number)?;
        Season::from_str(&raw).ok_or_else(|| ImportError::InvalidEnumValue {
            row: row_number,
            field: key.to_string(),
            value: raw,
            expected: "支持 spring/summer/fall/winter".to_string(),
        })
    }
}
