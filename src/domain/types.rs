// ==========================================
// 农业种植规划系统 - 领域类型定义
// ==========================================
// 职责: 定义土壤类型、种植季节等基础枚举
// 序列化格式: lowercase (与导入文件一致)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 土壤类型 (Soil Type)
// ==========================================
// 红线: 作物只能分配到其适配土壤类型的地块
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SoilType {
    Clay,  // 黏土
    Sandy, // 砂土
    Loamy, // 壤土
    Silty, // 粉土
    Peaty, // 泥炭土
}

impl fmt::Display for SoilType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SoilType::Clay => write!(f, "clay"),
            SoilType::Sandy => write!(f, "sandy"),
            SoilType::Loamy => write!(f, "loamy"),
            SoilType::Silty => write!(f, "silty"),
            SoilType::Peaty => write!(f, "peaty"),
        }
    }
}

impl SoilType {
    /// 从字符串解析土壤类型（大小写不敏感）
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "clay" => Some(SoilType::Clay),
            "sandy" => Some(SoilType::Sandy),
            "loamy" => Some(SoilType::Loamy),
            "silty" => Some(SoilType::Silty),
            "peaty" => Some(SoilType::Peaty),
            _ => None,
        }
    }
}

// ==========================================
// 种植季节 (Planting Season)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Spring, // 春季
    Summer, // 夏季
    Fall,   // 秋季
    Winter, // 冬季
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Season::Spring => write!(f, "spring"),
            Season::Summer => write!(f, "summer"),
            Season::Fall => write!(f, "fall"),
            Season::Winter => write!(f, "winter"),
        }
    }
}

impl Season {
    /// 从字符串解析种植季节（大小写不敏感）
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "spring" => Some(Season::Spring),
            "summer" => Some(Season::Summer),
            "fall" => Some(Season::Fall),
            "winter" => Some(Season::Winter),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_soil_type_from_str() {
        assert_eq!(SoilType::from_str("loamy"), Some(SoilType::Loamy));
        assert_eq!(SoilType::from_str(" CLAY "), Some(SoilType::Clay));
        assert_eq!(SoilType::from_str("volcanic"), None);
    }

    #[test]
    fn test_season_from_str() {
        assert_eq!(Season::from_str("spring"), Some(Season::Spring));
        assert_eq!(Season::from_str("Fall"), Some(Season::Fall));
        // 不支持别名
        assert_eq!(Season::from_str("autumn"), None);
    }

    #[test]
    fn test_soil_type_serde_roundtrip() {
        let json = serde_json::to_string(&SoilType::Silty).unwrap();
        assert_eq!(json, "\"silty\"");
        let parsed: SoilType = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, SoilType::Silty);
    }

    #[test]
    fn test_display_matches_serde() {
        assert_eq!(SoilType::Peaty.to_string(), "peaty");
        assert_eq!(Season::Winter.to_string(), "winter");
    }
}
