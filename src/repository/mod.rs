// ==========================================
// 单位换算引擎 - 数据仓储层
// ==========================================
// 红线: Repository 不含换算逻辑
// ==========================================
// 职责: 持有上游提供的单位与规则快照,提供只读查询
// 约束: 持久化读写属于上游仓储,不在本层
// ==========================================

pub mod error;
pub mod rule_store;
pub mod snapshot;
pub mod unit_registry;

// 重导出核心仓储
pub use error::{RepositoryError, RepositoryResult};
pub use rule_store::ConversionRuleStore;
pub use snapshot::ConversionSnapshot;
pub use unit_registry::UnitRegistry;
