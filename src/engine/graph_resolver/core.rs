// ==========================================
// 单位换算引擎 - 换算图解析器
// ==========================================
// 算法: 广度优先搜索（最少跳数，减少复合舍入误差）
// 一致性: 等长最短路径隐含的换算率必须在容差内一致
// ==========================================
// 注: 环路在解析期不是错误,已访问单位不再展开
// ==========================================

use super::path::{ResolvedPath, PATH_SEPARATOR};
use crate::config::ConversionConfig;
use crate::domain::rule::ConversionRule;
use crate::domain::unit::Unit;
use crate::engine::error::{ResolveError, ResolveResult};
use crate::repository::rule_store::ConversionRuleStore;
use rust_decimal::Decimal;
use std::collections::{HashMap, HashSet, VecDeque};
use tracing::{debug, trace, warn};

/// 邻接表中的一步
#[derive(Debug, Clone, Copy)]
struct Step<'a> {
    to: &'a str,
    multiplier: Decimal,
}

/// BFS 访问记录
#[derive(Debug)]
struct Visit<'a> {
    depth: usize,
    /// 上一层的全部前驱 (前驱单位, 边乘数)，首个前驱构成规范路径
    preds: Vec<(&'a str, Decimal)>,
}

/// 到达某单位的一种换算率及其代表路径
#[derive(Debug, Clone)]
struct RateWitness<'a> {
    rate: Decimal,
    path: Vec<&'a str>,
}

type Adjacency<'a> = HashMap<&'a str, Vec<Step<'a>>>;

// ==========================================
// GraphResolver - 换算图解析器
// ==========================================
// 无状态: 每次解析独立构建邻接表与搜索状态
#[derive(Debug, Clone)]
pub struct GraphResolver {
    tolerance: Decimal,
    check_consistency: bool,
}

impl Default for GraphResolver {
    fn default() -> Self {
        Self::new(&ConversionConfig::default())
    }
}

impl GraphResolver {
    pub fn new(config: &ConversionConfig) -> Self {
        Self {
            tolerance: config.consistency_tolerance,
            check_consistency: config.check_rate_consistency,
        }
    }

    /// 在规则仓储的全局规则上解析换算路径
    pub fn resolve(
        &self,
        from: &Unit,
        to: &Unit,
        store: &ConversionRuleStore,
    ) -> ResolveResult<ResolvedPath> {
        let edges = store.edges_for_category(from.category);
        self.resolve_over(from, to, &edges)
    }

    /// 在给定的有序规则序列上解析换算路径
    ///
    /// # 参数
    /// - `from` / `to`: 源单位与目标单位
    /// - `edges`: 候选全局规则（按插入顺序；非本类别规则不会被触达）
    ///
    /// # 返回
    /// - Ok(ResolvedPath): 最少跳数路径与累乘换算率
    /// - Err(UnsupportedConversion): 跨类别
    /// - Err(RuleNotFound): 同类别但不连通
    /// - Err(CircularReferenceConflict): 等长最短路径换算率不一致
    pub fn resolve_over<'a>(
        &self,
        from: &'a Unit,
        to: &'a Unit,
        edges: &[&'a ConversionRule],
    ) -> ResolveResult<ResolvedPath> {
        // 1) 类别校验
        if !from.same_category(to) {
            return Err(ResolveError::UnsupportedConversion {
                from: from.code.clone(),
                from_category: from.category,
                to: to.code.clone(),
                to_category: to.category,
            });
        }

        // 2) 同单位: 恒等换算
        if from.code == to.code {
            return Ok(ResolvedPath::identity(&from.code));
        }

        // 3) 邻接表（正向 + 合成逆向）
        let adjacency = build_adjacency(edges)?;

        // 4) 广度优先搜索
        let visits = search(&adjacency, &from.code, &to.code);
        if !visits.contains_key(to.code.as_str()) {
            debug!(
                from = %from.code,
                to = %to.code,
                visited = visits.len(),
                "搜索耗尽,未找到换算路径"
            );
            return Err(ResolveError::RuleNotFound {
                from: from.code.clone(),
                to: to.code.clone(),
                category: from.category,
            });
        }

        // 5) 等长最短路径一致性
        if self.check_consistency {
            self.check_rate_consistency(&visits, &from.code, &to.code)?;
        }

        // 6) 规范路径与累乘换算率
        let (units, multipliers) = canonical_path(&visits, &to.code);
        let mut rate = Decimal::ONE;
        for multiplier in multipliers {
            rate = multiply(rate, multiplier, &units)?;
        }

        let path = ResolvedPath {
            units: units.iter().map(|u| u.to_string()).collect(),
            rate,
        };

        debug!(
            from = %from.code,
            to = %to.code,
            hops = path.hop_count(),
            rate = %path.rate,
            path = %path.trace(),
            "换算路径解析完成"
        );

        Ok(path)
    }

    /// 检查目标单位在最短路径 DAG 上的所有祖先是否只有唯一换算率
    ///
    /// 只看目标的祖先: 与目标无关的同层冲突不影响本次换算
    fn check_rate_consistency<'a>(
        &self,
        visits: &HashMap<&'a str, Visit<'a>>,
        source: &'a str,
        target: &'a str,
    ) -> ResolveResult<()> {
        let mut ancestors: HashSet<&'a str> = HashSet::new();
        let mut stack = vec![target];
        while let Some(node) = stack.pop() {
            if !ancestors.insert(node) {
                continue;
            }
            if let Some(visit) = visits.get(node) {
                stack.extend(visit.preds.iter().map(|(pred, _)| *pred));
            }
        }

        // 前驱总在上一层: 按 (深度, 编码) 升序处理
        let depth_of = |code: &str| visits.get(code).map(|v| v.depth).unwrap_or(0);
        let mut ordered: Vec<&'a str> = ancestors.into_iter().collect();
        ordered.sort_by(|a, b| depth_of(*a).cmp(&depth_of(*b)).then_with(|| a.cmp(b)));

        let mut witnesses: HashMap<&'a str, Vec<RateWitness<'a>>> = HashMap::new();
        for node in ordered {
            if node == source {
                witnesses.insert(
                    node,
                    vec![RateWitness {
                        rate: Decimal::ONE,
                        path: vec![source],
                    }],
                );
                continue;
            }

            let visit = match visits.get(node) {
                Some(v) => v,
                None => continue,
            };

            let mut found: Vec<RateWitness<'a>> = Vec::new();
            for (pred, multiplier) in &visit.preds {
                let pred_witnesses = match witnesses.get(pred) {
                    Some(w) => w,
                    None => continue,
                };
                for witness in pred_witnesses {
                    let rate = multiply(witness.rate, *multiplier, &witness.path)?;
                    if found.iter().any(|f| self.rates_agree(f.rate, rate)) {
                        continue;
                    }
                    let mut path = witness.path.clone();
                    path.push(node);
                    found.push(RateWitness { rate, path });
                }
            }

            if found.len() > 1 {
                let (a, b) = (&found[0], &found[1]);
                warn!(
                    from = source,
                    to = node,
                    path_a = %a.path.join(PATH_SEPARATOR),
                    rate_a = %a.rate,
                    path_b = %b.path.join(PATH_SEPARATOR),
                    rate_b = %b.rate,
                    "等长最短路径换算率不一致"
                );
                return Err(ResolveError::CircularReferenceConflict {
                    from: source.to_string(),
                    to: node.to_string(),
                    path_a: a.path.join(PATH_SEPARATOR),
                    rate_a: a.rate,
                    path_b: b.path.join(PATH_SEPARATOR),
                    rate_b: b.rate,
                });
            }

            witnesses.insert(node, found);
        }

        Ok(())
    }

    /// 两个换算率的相对误差是否在容差内
    pub fn rates_agree(&self, a: Decimal, b: Decimal) -> bool {
        if a == b {
            return true;
        }
        let scale = a.abs().max(b.abs());
        if scale.is_zero() {
            return true;
        }
        match (a - b).abs().checked_div(scale) {
            Some(relative) => relative <= self.tolerance,
            None => false,
        }
    }
}

// ==========================================
// 内部函数
// ==========================================

/// 构建邻接表: 每条规则登记正向步 (×rate) 与逆向步 (×1/rate)
///
/// 各单位的出边顺序与规则插入顺序一致
fn build_adjacency<'a>(edges: &[&'a ConversionRule]) -> ResolveResult<Adjacency<'a>> {
    let mut adjacency: Adjacency<'a> = HashMap::new();

    for &rule in edges {
        if rule.rate <= Decimal::ZERO {
            warn!(
                from = %rule.from_unit,
                to = %rule.to_unit,
                rate = %rule.rate,
                "跳过非正换算率规则"
            );
            continue;
        }

        let inverse = Decimal::ONE
            .checked_div(rule.rate)
            .filter(|inv| !inv.is_zero())
            .ok_or_else(|| {
                ResolveError::ArithmeticOverflow(format!(
                    "规则 {} -> {} 的换算率 {} 无法取倒数",
                    rule.from_unit, rule.to_unit, rule.rate
                ))
            })?;

        adjacency
            .entry(rule.from_unit.as_str())
            .or_default()
            .push(Step {
                to: rule.to_unit.as_str(),
                multiplier: rule.rate,
            });
        adjacency
            .entry(rule.to_unit.as_str())
            .or_default()
            .push(Step {
                to: rule.from_unit.as_str(),
                multiplier: inverse,
            });
    }

    Ok(adjacency)
}

/// 广度优先搜索
///
/// 目标所在层之前的单位全部展开，以便收集目标的全部同层前驱；
/// 目标所在层及更深的单位不再展开
fn search<'a>(
    adjacency: &Adjacency<'a>,
    source: &'a str,
    target: &'a str,
) -> HashMap<&'a str, Visit<'a>> {
    let mut visits: HashMap<&'a str, Visit<'a>> = HashMap::new();
    visits.insert(
        source,
        Visit {
            depth: 0,
            preds: Vec::new(),
        },
    );

    let mut queue: VecDeque<&'a str> = VecDeque::new();
    queue.push_back(source);
    let mut target_depth: Option<usize> = None;

    while let Some(node) = queue.pop_front() {
        let depth = match visits.get(node) {
            Some(v) => v.depth,
            None => continue,
        };
        if target_depth.map_or(false, |td| depth >= td) {
            break;
        }

        let steps = match adjacency.get(node) {
            Some(s) => s,
            None => continue,
        };

        for step in steps {
            match visits.get(step.to).map(|v| v.depth) {
                None => {
                    trace!(from = node, to = step.to, depth = depth + 1, "发现新单位");
                    visits.insert(
                        step.to,
                        Visit {
                            depth: depth + 1,
                            preds: vec![(node, step.multiplier)],
                        },
                    );
                    if step.to == target {
                        target_depth = Some(depth + 1);
                    }
                    queue.push_back(step.to);
                }
                Some(d) if d == depth + 1 => {
                    if let Some(visit) = visits.get_mut(step.to) {
                        visit.preds.push((node, step.multiplier));
                    }
                }
                Some(_) => {}
            }
        }
    }

    visits
}

/// 沿首个前驱回溯规范路径，返回 (单位序列, 边乘数序列)
fn canonical_path<'a>(
    visits: &HashMap<&'a str, Visit<'a>>,
    target: &'a str,
) -> (Vec<&'a str>, Vec<Decimal>) {
    let mut units = vec![target];
    let mut multipliers = Vec::new();
    let mut current = target;

    while let Some(&(pred, multiplier)) = visits.get(current).and_then(|v| v.preds.first()) {
        units.push(pred);
        multipliers.push(multiplier);
        current = pred;
    }

    units.reverse();
    multipliers.reverse();
    (units, multipliers)
}

/// 累乘换算率；溢出或下溢为 0 都视为算术错误
fn multiply(acc: Decimal, multiplier: Decimal, path: &[&str]) -> ResolveResult<Decimal> {
    let product = acc.checked_mul(multiplier).ok_or_else(|| {
        ResolveError::ArithmeticOverflow(format!(
            "沿路径 [{}] 累乘换算率溢出",
            path.join(PATH_SEPARATOR)
        ))
    })?;
    if product.is_zero() && !acc.is_zero() && !multiplier.is_zero() {
        return Err(ResolveError::ArithmeticOverflow(format!(
            "沿路径 [{}] 累乘换算率下溢为 0 ({} × {})",
            path.join(PATH_SEPARATOR),
            acc,
            multiplier
        )));
    }
    Ok(product)
}
