// ==========================================
// 单位换算引擎 - 规则录入校验器
// ==========================================
// 职责: 新增规则前的预检（调用方显式发起）
// 红线: 新规则不得与既有规则形成换算率矛盾的环
// ==========================================

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::api::error::{ApiResult, ConversionError};
use crate::config::ConversionConfig;
use crate::domain::rule::{ConversionRule, MaterialConversionRule};
use crate::domain::unit::Unit;
use crate::engine::error::ResolveError;
use crate::engine::graph_resolver::GraphResolver;
use crate::repository::unit_registry::UnitRegistry;
use rust_decimal::Decimal;

// ==========================================
// RuleAuthoringValidator - 规则录入校验器
// ==========================================

/// 规则录入校验器
///
/// 职责：
/// 1. 校验换算率、单位存在性、类别一致性
/// 2. 校验新全局规则与既有规则隐含的换算率一致（环路矛盾检测）
/// 3. 校验物料规则的基本约束
pub struct RuleAuthoringValidator {
    registry: Arc<UnitRegistry>,
    resolver: GraphResolver,
}

impl RuleAuthoringValidator {
    /// 创建新的RuleAuthoringValidator实例
    ///
    /// 预检总是开启一致性检查，与 config.check_rate_consistency 无关
    pub fn new(registry: Arc<UnitRegistry>, config: &ConversionConfig) -> Self {
        let strict = ConversionConfig {
            check_rate_consistency: true,
            ..config.clone()
        };
        Self {
            registry,
            resolver: GraphResolver::new(&strict),
        }
    }

    /// 校验一条待新增的全局规则
    ///
    /// # 参数
    /// - existing: 既有全局规则（任意类别，按插入顺序）
    /// - candidate: 待新增规则
    ///
    /// # 返回
    /// - Ok(()): 可以新增
    /// - Err(ValidationFailure): 换算率非正、自环、类别声明不符
    /// - Err(UnitNotFound): 单位未注册
    /// - Err(UnsupportedConversion): 两端单位类别不同
    /// - Err(CircularReferenceConflict): 与既有路径隐含的换算率矛盾
    pub fn check_global_rule(
        &self,
        existing: &[ConversionRule],
        candidate: &ConversionRule,
    ) -> ApiResult<()> {
        let (from_unit, to_unit) =
            self.check_endpoints(&candidate.from_unit, &candidate.to_unit, candidate.rate)?;

        if !from_unit.same_category(to_unit) {
            return Err(ConversionError::UnsupportedConversion {
                from: from_unit.code.clone(),
                from_category: from_unit.category,
                to: to_unit.code.clone(),
                to_category: to_unit.category,
            });
        }
        if from_unit.category != candidate.category {
            return Err(ConversionError::ValidationFailure(format!(
                "规则 {} -> {} 声明类别为 {}，但单位属于 {}",
                candidate.from_unit, candidate.to_unit, candidate.category, from_unit.category
            )));
        }

        let edges: Vec<&ConversionRule> = existing
            .iter()
            .filter(|r| r.category == candidate.category)
            .collect();

        match self.resolver.resolve_over(from_unit, to_unit, &edges) {
            Ok(path) => {
                if !self.resolver.rates_agree(path.rate, candidate.rate) {
                    warn!(
                        from = %candidate.from_unit,
                        to = %candidate.to_unit,
                        existing_rate = %path.rate,
                        candidate_rate = %candidate.rate,
                        path = %path.trace(),
                        "新规则与既有路径换算率矛盾"
                    );
                    return Err(ConversionError::CircularReferenceConflict {
                        from: candidate.from_unit.clone(),
                        to: candidate.to_unit.clone(),
                        path_a: path.trace(),
                        rate_a: path.rate,
                        path_b: format!("{} -> {} (new rule)", candidate.from_unit, candidate.to_unit),
                        rate_b: candidate.rate,
                    });
                }
                debug!(
                    from = %candidate.from_unit,
                    to = %candidate.to_unit,
                    "新规则与既有路径一致"
                );
                Ok(())
            }
            // 两端尚不连通: 新规则不会形成环
            Err(ResolveError::RuleNotFound { .. }) => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    /// 按顺序逐条校验一组全局规则（每条只与其之前的规则比较）
    pub fn check_global_rule_set(&self, rules: &[ConversionRule]) -> ApiResult<()> {
        for (idx, rule) in rules.iter().enumerate() {
            self.check_global_rule(&rules[..idx], rule)?;
        }
        info!(rule_count = rules.len(), "全局规则集校验通过");
        Ok(())
    }

    /// 校验一条待新增的物料规则
    ///
    /// 物料规则允许跨类别（跨类别换算本就是物料属性）
    pub fn check_material_rule(&self, candidate: &MaterialConversionRule) -> ApiResult<()> {
        if candidate.material_id.trim().is_empty() {
            return Err(ConversionError::ValidationFailure(
                "物料规则缺少物料ID".to_string(),
            ));
        }
        self.check_endpoints(&candidate.from_unit, &candidate.to_unit, candidate.rate)?;
        Ok(())
    }

    /// 公共校验: 换算率 > 0、非自环（按去空白后的编码比较）、编码无首尾空白、两端单位已注册
    fn check_endpoints(&self, from: &str, to: &str, rate: Decimal) -> ApiResult<(&Unit, &Unit)> {
        if rate <= Decimal::ZERO {
            return Err(ConversionError::ValidationFailure(format!(
                "规则 {} -> {} 的换算率必须大于 0，实际为 {}",
                from, to, rate
            )));
        }
        let (from_code, to_code) = (from.trim(), to.trim());
        if from_code.is_empty() || to_code.is_empty() {
            return Err(ConversionError::ValidationFailure(
                "规则单位编码不能为空".to_string(),
            ));
        }
        if from_code == to_code {
            return Err(ConversionError::ValidationFailure(format!(
                "规则不能指向自身: {} -> {}",
                from_code, to_code
            )));
        }
        // 注册表只收录不含空白的编码，规则须按原样引用
        if from_code != from || to_code != to {
            return Err(ConversionError::ValidationFailure(format!(
                "规则单位编码含首尾空白: {:?} -> {:?}",
                from, to
            )));
        }

        let from_unit = self.registry.lookup(from_code)?;
        let to_unit = self.registry.lookup(to_code)?;
        Ok((from_unit, to_unit))
    }
}
