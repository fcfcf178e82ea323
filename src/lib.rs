// ==========================================
// 单位换算解析引擎 - 核心库
// ==========================================
// 定位: 目录/订货/库存后台的计量单位换算核心
// 规则层级: 物料覆写 -> 全局规则图（同类别、最少跳数）
// 数值: 全程精确小数, 只在最后按目标单位精度舍入一次
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 单位注册表、规则仓储、快照
pub mod repository;

// 引擎层 - 换算图解析
pub mod engine;

// 配置层 - 引擎参数
pub mod config;

// 日志系统
pub mod logging;

// API 层 - 换算接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{ConversionSource, UnitCategory};

// 领域实体
pub use domain::{ConversionResult, ConversionRule, MaterialConversionRule, Unit};

// 仓储
pub use repository::{ConversionRuleStore, ConversionSnapshot, RepositoryError, UnitRegistry};

// 引擎
pub use engine::{GraphResolver, ResolveError, ResolvedPath};

// 配置
pub use config::ConversionConfig;

// API
pub use api::{
    ApiResult, ConversionApi, ConversionError, ConversionErrorKind, Resolution,
    RuleAuthoringValidator,
};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "单位换算解析引擎";
