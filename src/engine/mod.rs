// ==========================================
// 单位换算引擎 - 引擎层
// ==========================================
// 职责: 全局规则图上的路径搜索与换算率累乘
// 红线: 引擎不做持久化, 纯计算, 无共享可变状态
// ==========================================

pub mod error;
pub mod graph_resolver;

// 重导出核心引擎
pub use error::{ResolveError, ResolveResult};
pub use graph_resolver::{GraphResolver, ResolvedPath};
