// ==========================================
// 单位换算引擎 - 领域类型定义
// ==========================================
// 红线: 换算永不跨类别（跨类别只允许物料覆写规则）
// 序列化格式: SCREAMING_SNAKE_CASE (与上游主数据一致)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 单位类别 (Unit Category)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UnitCategory {
    Volume, // 体积
    Weight, // 重量
    Count,  // 计数
}

impl UnitCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitCategory::Volume => "VOLUME",
            UnitCategory::Weight => "WEIGHT",
            UnitCategory::Count => "COUNT",
        }
    }
}

impl fmt::Display for UnitCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for UnitCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "VOLUME" => Ok(UnitCategory::Volume),
            "WEIGHT" => Ok(UnitCategory::Weight),
            "COUNT" => Ok(UnitCategory::Count),
            other => Err(format!("未知单位类别: {}", other)),
        }
    }
}

// ==========================================
// 换算来源 (Conversion Source)
// ==========================================
// 标识最终换算率由哪一层规则产生（审计用）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConversionSource {
    MaterialOverride, // 物料专属覆写规则
    Direct,           // 单跳全局规则（含同单位恒等换算）
    ComputedPath,     // 多跳全局规则链
}

impl ConversionSource {
    /// 按路径边数分类全局规则结果
    pub fn from_hop_count(hops: usize) -> Self {
        if hops <= 1 {
            ConversionSource::Direct
        } else {
            ConversionSource::ComputedPath
        }
    }
}

impl fmt::Display for ConversionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversionSource::MaterialOverride => write!(f, "MATERIAL_OVERRIDE"),
            ConversionSource::Direct => write!(f, "DIRECT"),
            ConversionSource::ComputedPath => write!(f, "COMPUTED_PATH"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parse_is_case_insensitive() {
        assert_eq!("volume".parse::<UnitCategory>().unwrap(), UnitCategory::Volume);
        assert_eq!(" WEIGHT ".parse::<UnitCategory>().unwrap(), UnitCategory::Weight);
        assert!("LENGTH".parse::<UnitCategory>().is_err());
    }

    #[test]
    fn test_category_serde_uses_screaming_case() {
        let json = serde_json::to_string(&UnitCategory::Count).unwrap();
        assert_eq!(json, "\"COUNT\"");
        let back: UnitCategory = serde_json::from_str("\"VOLUME\"").unwrap();
        assert_eq!(back, UnitCategory::Volume);
    }

    #[test]
    fn test_source_from_hop_count() {
        assert_eq!(ConversionSource::from_hop_count(0), ConversionSource::Direct);
        assert_eq!(ConversionSource::from_hop_count(1), ConversionSource::Direct);
        assert_eq!(ConversionSource::from_hop_count(2), ConversionSource::ComputedPath);
        assert_eq!(ConversionSource::MaterialOverride.to_string(), "MATERIAL_OVERRIDE");
    }
}
