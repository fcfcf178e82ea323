// ==========================================
// 单位换算引擎 - 配置层
// ==========================================
// 职责: 换算引擎可调参数（一致性容差等）
// ==========================================

pub mod conversion_config;

pub use conversion_config::{ConversionConfig, DEFAULT_CONSISTENCY_TOLERANCE};
