use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 路径分隔符
pub const PATH_SEPARATOR: &str = " -> ";

// ==========================================
// ResolvedPath - 解析出的换算路径
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedPath {
    /// 按顺序经过的单位编码（首为源单位，尾为目标单位）
    pub units: Vec<String>,

    /// 沿路径累乘的换算率（未舍入）
    pub rate: Decimal,
}

impl ResolvedPath {
    /// 同单位恒等路径
    pub fn identity(code: &str) -> Self {
        Self {
            units: vec![code.to_string()],
            rate: Decimal::ONE,
        }
    }

    /// 路径边数
    pub fn hop_count(&self) -> usize {
        self.units.len().saturating_sub(1)
    }

    /// 路径描述，如 "kg -> g -> piece"
    pub fn trace(&self) -> String {
        self.units.join(PATH_SEPARATOR)
    }
}
