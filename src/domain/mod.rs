// ==========================================
// 单位换算引擎 - 领域模型层
// ==========================================
// 职责: 定义单位、换算规则、换算结果与枚举类型
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod conversion;
pub mod rule;
pub mod types;
pub mod unit;

// 重导出核心类型
pub use conversion::ConversionResult;
pub use rule::{ConversionRule, MaterialConversionRule};
pub use types::{ConversionSource, UnitCategory};
pub use unit::{Unit, MAX_DECIMAL_PLACES};
