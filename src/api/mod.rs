// ==========================================
// 单位换算引擎 - API 层
// ==========================================
// 职责: 对上游暴露换算接口（convert / can_convert）与规则录入预检
// 红线: 传输层（HTTP 状态码、JSON 命名）不在本层
// ==========================================

pub mod conversion_api;
pub mod error;
pub mod rule_validator;

pub use conversion_api::{ConversionApi, Resolution};
pub use error::{ApiResult, ConversionError, ConversionErrorKind};
pub use rule_validator::RuleAuthoringValidator;
