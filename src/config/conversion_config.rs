// ==========================================
// 单位换算引擎 - 换算配置
// ==========================================
// 存储: JSON 文档（缺省字段取默认值）
// ==========================================

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::path::Path;

/// 默认换算率一致性相对容差 (1e-9)
pub const DEFAULT_CONSISTENCY_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 9);

/// 换算配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionConfig {
    /// 等长最短路径换算率比较的相对容差
    pub consistency_tolerance: Decimal,

    /// 是否检查等长最短路径的换算率一致性
    ///
    /// 关闭后解析器直接采用首条最短路径
    pub check_rate_consistency: bool,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            consistency_tolerance: DEFAULT_CONSISTENCY_TOLERANCE,
            check_rate_consistency: true,
        }
    }
}

impl ConversionConfig {
    /// 从 JSON 字符串加载配置
    pub fn from_json_str(raw: &str) -> Result<Self, Box<dyn Error>> {
        let config: ConversionConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// 从 JSON 文件加载配置
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// 验证配置有效性
    ///
    /// # 验证规则
    /// - 容差必须在 [0, 1) 范围内
    pub fn validate(&self) -> Result<(), String> {
        if self.consistency_tolerance < Decimal::ZERO || self.consistency_tolerance >= Decimal::ONE {
            return Err(format!(
                "一致性容差 {} 超出有效范围 [0, 1)",
                self.consistency_tolerance
            ));
        }
        Ok(())
    }
}
