// ==========================================
// 单位换算引擎 - 规则快照
// ==========================================
// 职责: 承载上游一次性提供的单位 + 规则数据（JSON 文档）
// 职责: 校验跨实体引用，产出只读的注册表与规则仓储
// 红线: 快照在一次解析期间只读；引擎不缓存快照
// ==========================================

use crate::domain::rule::{ConversionRule, MaterialConversionRule};
use crate::domain::unit::Unit;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::rule_store::ConversionRuleStore;
use crate::repository::unit_registry::UnitRegistry;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::Path;
use tracing::{debug, info, warn};

// ==========================================
// ConversionSnapshot - 单位与规则快照
// ==========================================
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversionSnapshot {
    #[serde(default)]
    pub units: Vec<Unit>,

    /// 全局规则（顺序即插入顺序）
    #[serde(default)]
    pub global_rules: Vec<ConversionRule>,

    #[serde(default)]
    pub material_rules: Vec<MaterialConversionRule>,
}

impl ConversionSnapshot {
    /// 从 JSON 字符串解析快照
    pub fn from_json_str(raw: &str) -> RepositoryResult<Self> {
        let snapshot: ConversionSnapshot = serde_json::from_str(raw)?;
        debug!(
            units = snapshot.units.len(),
            global_rules = snapshot.global_rules.len(),
            material_rules = snapshot.material_rules.len(),
            "快照解析完成"
        );
        Ok(snapshot)
    }

    /// 从 JSON 文件读取快照
    pub fn from_json_file(path: impl AsRef<Path>) -> RepositoryResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        info!(path = %path.display(), "读取换算规则快照");
        Self::from_json_str(&raw)
    }

    /// 校验跨实体引用并构建注册表与规则仓储
    ///
    /// # 校验
    /// - 规则引用的单位必须已注册
    /// - 全局规则两端单位必须属于规则声明的类别
    /// - 物料规则的 material_id 非空
    pub fn build(&self) -> RepositoryResult<(UnitRegistry, ConversionRuleStore)> {
        let registry = UnitRegistry::new(self.units.clone())?;
        if registry.is_empty() {
            warn!("快照不含任何单位，所有换算都将失败");
        }

        for rule in &self.global_rules {
            for code in [&rule.from_unit, &rule.to_unit] {
                let unit = registry.find(code).ok_or_else(|| {
                    RepositoryError::ForeignKeyViolation(format!(
                        "全局规则 {} -> {} 引用了未注册的单位 {}",
                        rule.from_unit, rule.to_unit, code
                    ))
                })?;

                if unit.category != rule.category {
                    return Err(RepositoryError::ValidationError(format!(
                        "全局规则 {} -> {} 声明类别为 {}，但单位 {} 属于 {}",
                        rule.from_unit, rule.to_unit, rule.category, code, unit.category
                    )));
                }
            }
        }

        for rule in &self.material_rules {
            if rule.material_id.trim().is_empty() {
                return Err(RepositoryError::FieldValueError {
                    field: "material_id".to_string(),
                    message: format!("物料规则 {} -> {} 缺少物料ID", rule.from_unit, rule.to_unit),
                });
            }

            for code in [&rule.from_unit, &rule.to_unit] {
                if !registry.contains(code) {
                    return Err(RepositoryError::ForeignKeyViolation(format!(
                        "物料 {} 的规则 {} -> {} 引用了未注册的单位 {}",
                        rule.material_id, rule.from_unit, rule.to_unit, code
                    )));
                }
            }
        }

        let store = ConversionRuleStore::new(self.global_rules.clone(), self.material_rules.clone())?;
        Ok((registry, store))
    }

    /// 规则集指纹（SHA-256 十六进制）
    ///
    /// 外部缓存应以 (from, to, fingerprint) 作为键；规则集任何变更都会改变指纹。
    /// 换算率按规范化数值参与计算（1000 与 1000.0 指纹一致）。
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();

        for unit in &self.units {
            hasher.update(
                format!(
                    "U|{}|{}|{}|{}\n",
                    unit.code, unit.category, unit.decimal_places, unit.is_base_unit
                )
                .as_bytes(),
            );
        }
        for rule in &self.global_rules {
            hasher.update(
                format!(
                    "G|{}|{}|{}|{}\n",
                    rule.from_unit,
                    rule.to_unit,
                    rule.rate.normalize(),
                    rule.category
                )
                .as_bytes(),
            );
        }
        for rule in &self.material_rules {
            hasher.update(
                format!(
                    "M|{}|{}|{}|{}\n",
                    rule.material_id,
                    rule.from_unit,
                    rule.to_unit,
                    rule.rate.normalize()
                )
                .as_bytes(),
            );
        }

        format!("{:x}", hasher.finalize())
    }
}
