// ==========================================
// 单位换算引擎 - 换算 API
// ==========================================
// 职责: 规则层级编排（物料覆写 -> 全局规则图），舍入，结果封装
// 红线: 物料覆写只直连，命中即短路，不与全局规则链式组合
// 红线: 只在最后按目标单位精度舍入一次（四舍五入）
// ==========================================

use std::sync::Arc;

use rust_decimal::{Decimal, RoundingStrategy};
use tracing::{debug, info, warn};

use crate::api::error::{ApiResult, ConversionError};
use crate::config::ConversionConfig;
use crate::domain::conversion::ConversionResult;
use crate::domain::types::ConversionSource;
use crate::engine::graph_resolver::{GraphResolver, ResolvedPath};
use crate::repository::rule_store::ConversionRuleStore;
use crate::repository::snapshot::ConversionSnapshot;
use crate::repository::unit_registry::UnitRegistry;

/// 物料覆写路径后缀
const MATERIAL_OVERRIDE_SUFFIX: &str = "(material override)";

// ==========================================
// Resolution - 规则层级解析结果
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// 命中物料专属规则
    MaterialHit { rate: Decimal },
    /// 全局规则图解析成功
    GraphHit(ResolvedPath),
    /// 无可用规则（含输入非法）
    Miss(ConversionError),
}

impl Resolution {
    pub fn is_hit(&self) -> bool {
        !matches!(self, Resolution::Miss(_))
    }
}

// ==========================================
// ConversionApi - 换算 API
// ==========================================

/// 换算API
///
/// 职责：
/// 1. 输入校验（数量、单位编码）
/// 2. 物料覆写优先，全局规则图兜底
/// 3. 按目标单位精度舍入
/// 4. 输出可解释的换算结果（来源 + 路径）
///
/// 无状态: 每次调用基于构造时传入的只读快照独立解析，可跨线程共享
pub struct ConversionApi {
    registry: Arc<UnitRegistry>,
    rule_store: Arc<ConversionRuleStore>,
    resolver: GraphResolver,
}

impl ConversionApi {
    /// 创建新的ConversionApi实例
    ///
    /// # 参数
    /// - registry: 单位注册表
    /// - rule_store: 换算规则仓储
    /// - config: 换算配置
    pub fn new(
        registry: Arc<UnitRegistry>,
        rule_store: Arc<ConversionRuleStore>,
        config: &ConversionConfig,
    ) -> Self {
        Self {
            registry,
            rule_store,
            resolver: GraphResolver::new(config),
        }
    }

    /// 从快照一步构建
    pub fn from_snapshot(snapshot: &ConversionSnapshot, config: &ConversionConfig) -> ApiResult<Self> {
        config
            .validate()
            .map_err(ConversionError::InvalidData)?;
        let (registry, rule_store) = snapshot.build()?;
        Ok(Self::new(Arc::new(registry), Arc::new(rule_store), config))
    }

    pub fn registry(&self) -> &UnitRegistry {
        &self.registry
    }

    // ==========================================
    // 换算接口
    // ==========================================

    /// 换算数量
    ///
    /// # 参数
    /// - from_unit_code: 源单位编码
    /// - to_unit_code: 目标单位编码
    /// - quantity: 原始数量（必须 > 0）
    /// - material_id: 可选物料ID（提供时优先匹配物料覆写规则）
    ///
    /// # 返回
    /// - Ok(ConversionResult): 换算结果（已按目标单位精度舍入）
    /// - Err(ConversionError): 失败原因
    pub fn convert(
        &self,
        from_unit_code: &str,
        to_unit_code: &str,
        quantity: Decimal,
        material_id: Option<&str>,
    ) -> ApiResult<ConversionResult> {
        if quantity <= Decimal::ZERO {
            warn!(quantity = %quantity, "换算数量非法");
            return Err(ConversionError::ValidationFailure(format!(
                "换算数量必须大于 0，实际为 {}",
                quantity
            )));
        }

        let (rate, source, path_units, conversion_path) =
            match self.resolve(from_unit_code, to_unit_code, material_id) {
                Resolution::MaterialHit { rate } => {
                    let from = from_unit_code.trim();
                    let to = to_unit_code.trim();
                    (
                        rate,
                        ConversionSource::MaterialOverride,
                        vec![from.to_string(), to.to_string()],
                        format!("{} -> {} {}", from, to, MATERIAL_OVERRIDE_SUFFIX),
                    )
                }
                Resolution::GraphHit(path) => {
                    let source = ConversionSource::from_hop_count(path.hop_count());
                    let trace = path.trace();
                    (path.rate, source, path.units, trace)
                }
                Resolution::Miss(err) => {
                    warn!(
                        from = from_unit_code,
                        to = to_unit_code,
                        material_id = material_id.unwrap_or(""),
                        kind = %err.kind(),
                        error = %err,
                        "换算失败"
                    );
                    return Err(err);
                }
            };

        let target = self.registry.lookup(to_unit_code.trim())?;
        let raw = quantity.checked_mul(rate).ok_or_else(|| {
            ConversionError::ArithmeticOverflow(format!("{} × {} 溢出", quantity, rate))
        })?;
        if raw.is_zero() && !rate.is_zero() {
            return Err(ConversionError::ArithmeticOverflow(format!(
                "{} × {} 下溢为 0",
                quantity, rate
            )));
        }
        let converted_quantity =
            raw.round_dp_with_strategy(target.decimal_places, RoundingStrategy::MidpointAwayFromZero);

        info!(
            from = from_unit_code,
            to = to_unit_code,
            quantity = %quantity,
            converted = %converted_quantity,
            source = %source,
            path = %conversion_path,
            "换算完成"
        );

        Ok(ConversionResult {
            converted_quantity,
            from_unit_code: from_unit_code.trim().to_string(),
            to_unit_code: target.code.clone(),
            original_quantity: quantity,
            source,
            conversion_path,
            path_units,
            applied_rate: rate,
        })
    }

    /// 判断是否可换算（不做数量运算，不返回错误）
    pub fn can_convert(
        &self,
        from_unit_code: &str,
        to_unit_code: &str,
        material_id: Option<&str>,
    ) -> bool {
        match self.resolve(from_unit_code, to_unit_code, material_id) {
            Resolution::Miss(err) => {
                debug!(
                    from = from_unit_code,
                    to = to_unit_code,
                    kind = %err.kind(),
                    "不可换算"
                );
                false
            }
            _ => true,
        }
    }

    /// 按规则层级顺序解析换算率
    ///
    /// # 顺序
    /// 1. 单位编码校验 + 注册表查找
    /// 2. 物料覆写（提供 material_id 时）
    /// 3. 全局规则图
    pub fn resolve(
        &self,
        from_unit_code: &str,
        to_unit_code: &str,
        material_id: Option<&str>,
    ) -> Resolution {
        let from = match non_blank("from_unit_code", from_unit_code) {
            Ok(code) => code,
            Err(err) => return Resolution::Miss(err),
        };
        let to = match non_blank("to_unit_code", to_unit_code) {
            Ok(code) => code,
            Err(err) => return Resolution::Miss(err),
        };

        let from_unit = match self.registry.lookup(from) {
            Ok(unit) => unit,
            Err(err) => return Resolution::Miss(err.into()),
        };
        let to_unit = match self.registry.lookup(to) {
            Ok(unit) => unit,
            Err(err) => return Resolution::Miss(err.into()),
        };

        // 1) 物料覆写
        if let Some(material_id) = material_id.map(str::trim).filter(|m| !m.is_empty()) {
            if let Some(rate) = self.rule_store.find_material_rule(material_id, from, to) {
                debug!(material_id, from, to, rate = %rate, "命中物料覆写规则");
                return Resolution::MaterialHit { rate };
            }
            debug!(material_id, from, to, "无物料覆写规则,回退全局规则");
        }

        // 2) 全局规则图
        match self.resolver.resolve(from_unit, to_unit, &self.rule_store) {
            Ok(path) => Resolution::GraphHit(path),
            Err(err) => Resolution::Miss(err.into()),
        }
    }
}

fn non_blank<'a>(field: &str, code: &'a str) -> ApiResult<&'a str> {
    let trimmed = code.trim();
    if trimmed.is_empty() {
        return Err(ConversionError::ValidationFailure(format!(
            "{} 不能为空",
            field
        )));
    }
    Ok(trimmed)
}
