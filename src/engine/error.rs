// ==========================================
// 单位换算引擎 - 引擎层错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use crate::domain::types::UnitCategory;
use rust_decimal::Decimal;
use thiserror::Error;

/// 图解析错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResolveError {
    #[error("不支持跨类别换算: {from}({from_category}) -> {to}({to_category})")]
    UnsupportedConversion {
        from: String,
        from_category: UnitCategory,
        to: String,
        to_category: UnitCategory,
    },

    #[error("未找到换算路径: {from} -> {to} (类别 {category})")]
    RuleNotFound {
        from: String,
        to: String,
        category: UnitCategory,
    },

    #[error(
        "换算率循环冲突: {from} -> {to}, 路径 [{path_a}] 换算率 {rate_a} 与路径 [{path_b}] 换算率 {rate_b} 不一致"
    )]
    CircularReferenceConflict {
        from: String,
        to: String,
        path_a: String,
        rate_a: Decimal,
        path_b: String,
        rate_b: Decimal,
    },

    #[error("换算率计算溢出: {0}")]
    ArithmeticOverflow(String),
}

/// Result 类型别名
pub type ResolveResult<T> = Result<T, ResolveError>;
