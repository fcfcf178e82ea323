// ==========================================
// 单位换算引擎 - 换算规则仓储
// ==========================================
// 职责: 持有全局规则与物料规则两套规则集（只读快照）
// 红线: 物料规则只做精确匹配，不做路径搜索，不做逆向推导
// 红线: 全局规则保持上游提供的插入顺序（用于确定性平局裁决）
// ==========================================

use crate::domain::rule::{ConversionRule, MaterialConversionRule};
use crate::domain::types::UnitCategory;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rust_decimal::Decimal;
use std::collections::HashMap;
use tracing::debug;

/// 物料规则主键
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct MaterialRuleKey {
    material_id: String,
    from_unit: String,
    to_unit: String,
}

impl MaterialRuleKey {
    fn new(material_id: &str, from_unit: &str, to_unit: &str) -> Self {
        Self {
            material_id: material_id.to_string(),
            from_unit: from_unit.to_string(),
            to_unit: to_unit.to_string(),
        }
    }
}

// ==========================================
// ConversionRuleStore - 换算规则仓储
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct ConversionRuleStore {
    global_rules: Vec<ConversionRule>,
    material_rules: HashMap<MaterialRuleKey, Decimal>,
}

impl ConversionRuleStore {
    /// 构建规则仓储
    ///
    /// # 校验
    /// - 所有换算率 > 0
    /// - 物料规则主键 (material_id, from, to) 唯一
    /// - material_id 不含首尾空白
    pub fn new(
        global_rules: Vec<ConversionRule>,
        material_rules: Vec<MaterialConversionRule>,
    ) -> RepositoryResult<Self> {
        for rule in &global_rules {
            ensure_positive_rate(rule.rate, &rule.from_unit, &rule.to_unit)?;
        }

        let mut material_map = HashMap::with_capacity(material_rules.len());
        for rule in material_rules {
            ensure_positive_rate(rule.rate, &rule.from_unit, &rule.to_unit)?;
            if rule.material_id.trim() != rule.material_id {
                return Err(RepositoryError::FieldValueError {
                    field: "material_id".to_string(),
                    message: format!(
                        "物料ID {:?} 含首尾空白 ({} -> {})",
                        rule.material_id, rule.from_unit, rule.to_unit
                    ),
                });
            }

            let key = MaterialRuleKey::new(&rule.material_id, &rule.from_unit, &rule.to_unit);
            if material_map.insert(key, rule.rate).is_some() {
                return Err(RepositoryError::UniqueConstraintViolation(format!(
                    "物料规则重复: material_id={}, {} -> {}",
                    rule.material_id, rule.from_unit, rule.to_unit
                )));
            }
        }

        debug!(
            global_rules = global_rules.len(),
            material_rules = material_map.len(),
            "换算规则仓储构建完成"
        );

        Ok(Self {
            global_rules,
            material_rules: material_map,
        })
    }

    /// 查找物料专属换算率（精确匹配）
    pub fn find_material_rule(
        &self,
        material_id: &str,
        from_unit: &str,
        to_unit: &str,
    ) -> Option<Decimal> {
        self.material_rules
            .get(&MaterialRuleKey::new(material_id, from_unit, to_unit))
            .copied()
    }

    /// 某类别下的全部全局规则（保持插入顺序）
    pub fn edges_for_category(&self, category: UnitCategory) -> Vec<&ConversionRule> {
        self.global_rules
            .iter()
            .filter(|r| r.category == category)
            .collect()
    }
}

fn ensure_positive_rate(rate: Decimal, from_unit: &str, to_unit: &str) -> RepositoryResult<()> {
    if rate <= Decimal::ZERO {
        return Err(RepositoryError::FieldValueError {
            field: "rate".to_string(),
            message: format!("规则 {} -> {} 的换算率必须大于 0，实际为 {}", from_unit, to_unit, rate),
        });
    }
    Ok(())
}
