// ==========================================
// 单位换算引擎 - API层错误类型
// ==========================================
// 职责: 定义换算失败分类，转换仓储层/引擎层错误为调用方可识别的类型
// 红线: 失败一律显式返回，不返回近似值，不在内部重试
// ==========================================

use crate::domain::types::UnitCategory;
use crate::engine::error::ResolveError;
use crate::repository::error::RepositoryError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// 换算错误类型
/// 所有错误信息必须包含显式原因
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConversionError {
    // ==========================================
    // 输入错误
    // ==========================================
    #[error("数据验证失败: {0}")]
    ValidationFailure(String),

    #[error("单位未找到: {code}")]
    UnitNotFound { code: String },

    // ==========================================
    // 规则错误
    // ==========================================
    #[error("未找到换算规则: {from} -> {to} (类别 {category})")]
    RuleNotFound {
        from: String,
        to: String,
        category: UnitCategory,
    },

    #[error("不支持的换算: {from}({from_category}) -> {to}({to_category}), 且无物料覆写规则")]
    UnsupportedConversion {
        from: String,
        from_category: UnitCategory,
        to: String,
        to_category: UnitCategory,
    },

    #[error(
        "换算规则循环冲突: {from} -> {to}, 路径 [{path_a}] 换算率 {rate_a} 与路径 [{path_b}] 换算率 {rate_b} 不一致"
    )]
    CircularReferenceConflict {
        from: String,
        to: String,
        path_a: String,
        rate_a: Decimal,
        path_b: String,
        rate_b: Decimal,
    },

    // ==========================================
    // 计算与数据错误
    // ==========================================
    #[error("数值溢出: {0}")]
    ArithmeticOverflow(String),

    #[error("换算数据无效: {0}")]
    InvalidData(String),
}

/// 错误分类（供调用方映射状态码/提示）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConversionErrorKind {
    ValidationFailure,
    UnitNotFound,
    RuleNotFound,
    UnsupportedConversion,
    CircularReferenceConflict,
    ArithmeticOverflow,
    InvalidData,
}

impl ConversionErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConversionErrorKind::ValidationFailure => "VALIDATION_FAILURE",
            ConversionErrorKind::UnitNotFound => "UNIT_NOT_FOUND",
            ConversionErrorKind::RuleNotFound => "RULE_NOT_FOUND",
            ConversionErrorKind::UnsupportedConversion => "UNSUPPORTED_CONVERSION",
            ConversionErrorKind::CircularReferenceConflict => "CIRCULAR_REFERENCE_CONFLICT",
            ConversionErrorKind::ArithmeticOverflow => "ARITHMETIC_OVERFLOW",
            ConversionErrorKind::InvalidData => "INVALID_DATA",
        }
    }
}

impl fmt::Display for ConversionErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl ConversionError {
    pub fn kind(&self) -> ConversionErrorKind {
        match self {
            ConversionError::ValidationFailure(_) => ConversionErrorKind::ValidationFailure,
            ConversionError::UnitNotFound { .. } => ConversionErrorKind::UnitNotFound,
            ConversionError::RuleNotFound { .. } => ConversionErrorKind::RuleNotFound,
            ConversionError::UnsupportedConversion { .. } => {
                ConversionErrorKind::UnsupportedConversion
            }
            ConversionError::CircularReferenceConflict { .. } => {
                ConversionErrorKind::CircularReferenceConflict
            }
            ConversionError::ArithmeticOverflow(_) => ConversionErrorKind::ArithmeticOverflow,
            ConversionError::InvalidData(_) => ConversionErrorKind::InvalidData,
        }
    }
}

// ==========================================
// 从 ResolveError 转换
// ==========================================
impl From<ResolveError> for ConversionError {
    fn from(err: ResolveError) -> Self {
        match err {
            ResolveError::UnsupportedConversion {
                from,
                from_category,
                to,
                to_category,
            } => ConversionError::UnsupportedConversion {
                from,
                from_category,
                to,
                to_category,
            },
            ResolveError::RuleNotFound { from, to, category } => {
                ConversionError::RuleNotFound { from, to, category }
            }
            ResolveError::CircularReferenceConflict {
                from,
                to,
                path_a,
                rate_a,
                path_b,
                rate_b,
            } => ConversionError::CircularReferenceConflict {
                from,
                to,
                path_a,
                rate_a,
                path_b,
                rate_b,
            },
            ResolveError::ArithmeticOverflow(msg) => ConversionError::ArithmeticOverflow(msg),
        }
    }
}

// ==========================================
// 从 RepositoryError 转换
// ==========================================
impl From<RepositoryError> for ConversionError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::UnitNotFound { code } => ConversionError::UnitNotFound { code },
            other => ConversionError::InvalidData(other.to_string()),
        }
    }
}

/// API层Result类型别名
pub type ApiResult<T> = Result<T, ConversionError>;
