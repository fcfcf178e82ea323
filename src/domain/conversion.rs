// ==========================================
// 单位换算引擎 - 换算结果
// ==========================================
// 红线: 只暴露最终舍入后的数量，不暴露中间值
// ==========================================

use crate::domain::types::ConversionSource;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ==========================================
// ConversionResult - 换算结果（含可解释信息）
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionResult {
    /// 换算后数量（已按目标单位精度舍入）
    pub converted_quantity: Decimal,

    /// 源单位编码
    pub from_unit_code: String,

    /// 目标单位编码
    pub to_unit_code: String,

    /// 原始数量
    pub original_quantity: Decimal,

    /// 规则来源
    pub source: ConversionSource,

    /// 换算路径描述（如 "kg -> g -> piece"）
    pub conversion_path: String,

    /// 路径经过的单位（按顺序）
    pub path_units: Vec<String>,

    /// 实际使用的换算率（未舍入）
    pub applied_rate: Decimal,
}

impl ConversionResult {
    /// 路径边数
    pub fn hop_count(&self) -> usize {
        self.path_units.len().saturating_sub(1)
    }
}
