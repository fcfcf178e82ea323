// ==========================================
// 单位换算引擎 - 换算规则实体
// ==========================================
// 全局规则: 类别内有向边 (1 from = rate to)，逆向边由解析器合成，不落库
// 物料规则: (material_id, from, to) 精确匹配，只直连，不参与链式换算
// ==========================================

use crate::domain::types::UnitCategory;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ==========================================
// ConversionRule - 全局换算规则
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionRule {
    pub from_unit: String,
    pub to_unit: String,
    /// 换算率（> 0）
    pub rate: Decimal,
    pub category: UnitCategory,
}

impl ConversionRule {
    pub fn new(
        from_unit: impl Into<String>,
        to_unit: impl Into<String>,
        rate: Decimal,
        category: UnitCategory,
    ) -> Self {
        Self {
            from_unit: from_unit.into(),
            to_unit: to_unit.into(),
            rate,
            category,
        }
    }
}

// ==========================================
// MaterialConversionRule - 物料专属换算规则
// ==========================================
// 例: 物料 A 的 1 瓶 = 500 ml，物料 B 的 1 瓶 = 330 ml
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialConversionRule {
    pub material_id: String,
    pub from_unit: String,
    pub to_unit: String,
    /// 换算率（> 0）
    pub rate: Decimal,
}

impl MaterialConversionRule {
    pub fn new(
        material_id: impl Into<String>,
        from_unit: impl Into<String>,
        to_unit: impl Into<String>,
        rate: Decimal,
    ) -> Self {
        Self {
            material_id: material_id.into(),
            from_unit: from_unit.into(),
            to_unit: to_unit.into(),
            rate,
        }
    }
}
