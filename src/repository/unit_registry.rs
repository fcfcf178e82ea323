// ==========================================
// 单位换算引擎 - 单位注册表
// ==========================================
// 职责: 单位编码 -> 单位元数据 的只读查找
// 红线: 构建后不可变，查询无副作用
// ==========================================

use crate::domain::types::UnitCategory;
use crate::domain::unit::{Unit, MAX_DECIMAL_PLACES};
use crate::repository::error::{RepositoryError, RepositoryResult};
use std::collections::HashMap;
use tracing::debug;

// ==========================================
// UnitRegistry - 单位注册表
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct UnitRegistry {
    units: HashMap<String, Unit>,
}

impl UnitRegistry {
    /// 从上游提供的单位列表构建注册表
    ///
    /// # 校验
    /// - 编码非空且不含首尾空白
    /// - 编码唯一
    /// - 小数位数 <= 6
    pub fn new(units: Vec<Unit>) -> RepositoryResult<Self> {
        let mut map = HashMap::with_capacity(units.len());

        for unit in units {
            if unit.code.trim().is_empty() {
                return Err(RepositoryError::FieldValueError {
                    field: "code".to_string(),
                    message: "单位编码不能为空".to_string(),
                });
            }

            // 查询侧会去除首尾空白，带空白的编码永远无法命中
            if unit.code.trim() != unit.code {
                return Err(RepositoryError::FieldValueError {
                    field: "code".to_string(),
                    message: format!("单位编码 {:?} 含首尾空白", unit.code),
                });
            }

            if unit.decimal_places > MAX_DECIMAL_PLACES {
                return Err(RepositoryError::FieldValueError {
                    field: "decimal_places".to_string(),
                    message: format!(
                        "单位 {} 的小数位数 {} 超出范围 [0, {}]",
                        unit.code, unit.decimal_places, MAX_DECIMAL_PLACES
                    ),
                });
            }

            if map.contains_key(&unit.code) {
                return Err(RepositoryError::UniqueConstraintViolation(format!(
                    "单位编码重复: {}",
                    unit.code
                )));
            }

            map.insert(unit.code.clone(), unit);
        }

        debug!(unit_count = map.len(), "单位注册表构建完成");
        Ok(Self { units: map })
    }

    /// 按编码查找单位
    ///
    /// # 返回
    /// - Ok(&Unit): 找到
    /// - Err(UnitNotFound): 编码未注册
    pub fn lookup(&self, code: &str) -> RepositoryResult<&Unit> {
        self.units
            .get(code)
            .ok_or_else(|| RepositoryError::UnitNotFound {
                code: code.to_string(),
            })
    }

    /// 按编码查找单位（不存在返回 None）
    pub fn find(&self, code: &str) -> Option<&Unit> {
        self.units.get(code)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.units.contains_key(code)
    }

    /// 某类别下的全部单位（按编码排序）
    pub fn units_in_category(&self, category: UnitCategory) -> Vec<&Unit> {
        let mut units: Vec<&Unit> = self
            .units
            .values()
            .filter(|u| u.category == category)
            .collect();
        units.sort_by(|a, b| a.code.cmp(&b.code));
        units
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(code: &str, category: UnitCategory, dp: u32) -> Unit {
        Unit::new(code, code, category, dp, false)
    }

    #[test]
    fn test_lookup_found_and_missing() {
        let registry = UnitRegistry::new(vec![
            unit("kg", UnitCategory::Weight, 3),
            unit("瓶", UnitCategory::Count, 0),
        ])
        .unwrap();

        assert_eq!(registry.lookup("瓶").unwrap().category, UnitCategory::Count);
        match registry.lookup("箱") {
            Err(RepositoryError::UnitNotFound { code }) => assert_eq!(code, "箱"),
            other => panic!("expected UnitNotFound, got {:?}", other),
        }
        assert!(registry.find("箱").is_none());
    }

    #[test]
    fn test_duplicate_code_rejected() {
        let result = UnitRegistry::new(vec![
            unit("kg", UnitCategory::Weight, 3),
            unit("kg", UnitCategory::Weight, 2),
        ]);
        assert!(matches!(
            result,
            Err(RepositoryError::UniqueConstraintViolation(_))
        ));
    }

    #[test]
    fn test_precision_out_of_range_rejected() {
        let result = UnitRegistry::new(vec![unit("g", UnitCategory::Weight, 7)]);
        assert!(matches!(
            result,
            Err(RepositoryError::FieldValueError { ref field, .. }) if field == "decimal_places"
        ));
    }

    #[test]
    fn test_blank_code_rejected() {
        let result = UnitRegistry::new(vec![unit("  ", UnitCategory::Count, 0)]);
        assert!(matches!(result, Err(RepositoryError::FieldValueError { .. })));
    }

    #[test]
    fn test_padded_code_rejected() {
        for code in [" kg", "kg ", "\tkg"] {
            let result = UnitRegistry::new(vec![unit(code, UnitCategory::Weight, 3)]);
            assert!(
                matches!(result, Err(RepositoryError::FieldValueError { ref field, .. }) if field == "code"),
                "{:?}",
                code
            );
        }
    }

    #[test]
    fn test_empty_registry() {
        let registry = UnitRegistry::new(vec![]).unwrap();
        assert!(registry.is_empty());
        assert!(registry.lookup("kg").is_err());
    }

    #[test]
    fn test_units_in_category_sorted() {
        let registry = UnitRegistry::new(vec![
            unit("ml", UnitCategory::Volume, 0),
            unit("L", UnitCategory::Volume, 3),
            unit("kg", UnitCategory::Weight, 3),
        ])
        .unwrap();

        let codes: Vec<&str> = registry
            .units_in_category(UnitCategory::Volume)
            .iter()
            .map(|u| u.code.as_str())
            .collect();
        assert_eq!(codes, vec!["L", "ml"]);
        assert_eq!(registry.len(), 3);
    }
}
