// ==========================================
// 单位换算引擎 - 计量单位实体
// ==========================================
// 红线: 单位编码唯一，被规则引用后不可变更
// ==========================================

use crate::domain::types::UnitCategory;
use serde::{Deserialize, Serialize};

/// 小数精度上限（含）
pub const MAX_DECIMAL_PLACES: u32 = 6;

// ==========================================
// Unit - 计量单位
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    /// 单位编码（如 ml / kg / 瓶）
    pub code: String,

    /// 显示名称
    #[serde(default)]
    pub name: String,

    /// 单位类别
    pub category: UnitCategory,

    /// 输出小数位数 (0~6)，换算结果按目标单位精度舍入
    #[serde(default)]
    pub decimal_places: u32,

    /// 是否类别基准单位（仅作展示，解析器不依赖）
    #[serde(default)]
    pub is_base_unit: bool,
}

impl Unit {
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        category: UnitCategory,
        decimal_places: u32,
        is_base_unit: bool,
    ) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            category,
            decimal_places,
            is_base_unit,
        }
    }

    /// 是否与另一单位同类别
    pub fn same_category(&self, other: &Unit) -> bool {
        self.category == other.category
    }
}
