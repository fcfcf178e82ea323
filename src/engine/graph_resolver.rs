// ==========================================
// 单位换算引擎 - 换算图解析器
// ==========================================
// 输入: 源单位 + 目标单位 + 同类别全局规则（有序）
// 输出: 最少跳数路径 + 累乘换算率
// ==========================================
// 红线: 只使用全局规则，不跨类别
// 红线: 每条规则同时贡献正向边(×rate)与逆向边(×1/rate)
// 红线: 平局按规则插入顺序裁决，结果可复现
// ==========================================

mod core;
mod path;


pub use self::core::GraphResolver;
pub use self::path::ResolvedPath;
