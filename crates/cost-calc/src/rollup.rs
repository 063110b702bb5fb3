//! 成本向上彙總
//!
//! 後序遍歷：每個節點的成本 = (本身用量 × 單價 + 子節點成本合計) / 良率因子。
//! 子節點的損耗已包含在它回傳的成本裡，父元件只需套用自己的損耗率，
//! 多層損耗因此自然相乘累積。

use cost_core::{CostError, CostingConfig, LossPercent, NodeKind};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::store::NodeStore;

/// 單一節點的成本明細
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeCost {
    /// 節點ID
    pub node_id: String,

    /// 是否為元件
    pub is_component: bool,

    /// 是否為頂層節點
    pub is_top_level: bool,

    /// 層級（頂層為 0）
    pub depth: usize,

    /// 本身成本 = 用量 × 單價
    pub own_cost: Decimal,

    /// 子節點成本合計
    pub children_cost: Decimal,

    /// 放大前成本 = 本身 + 子節點
    pub raw_total: Decimal,

    /// 良率因子 `1 - 損耗率/100`（材料為 1）
    pub yield_factor: Decimal,

    /// 含損耗的節點成本
    pub cost: Decimal,
}

/// 彙總結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RollupResult {
    /// 頂層元件成本合計
    pub components_cost: Decimal,

    /// 頂層材料成本合計
    pub raw_materials_cost: Decimal,

    /// 逐節點明細（依輸入順序）
    pub node_costs: Vec<NodeCost>,
}

impl RollupResult {
    /// 依ID查詢節點成本
    pub fn cost_of(&self, node_id: &str) -> Option<Decimal> {
        self.node_costs
            .iter()
            .find(|entry| entry.node_id == node_id)
            .map(|entry| entry.cost)
    }
}

/// 堆疊項目
#[derive(Debug, Clone, Copy)]
struct Frame {
    idx: usize,
    depth: usize,
    expanded: bool,
}

/// 成本彙總引擎
pub struct CostRollup<'s, 'a> {
    store: &'s NodeStore<'a>,
    max_depth: usize,
    step_limit: usize,
}

impl<'s, 'a> CostRollup<'s, 'a> {
    /// 創建彙總引擎，深度與步數上限取自配置
    pub fn new(store: &'s NodeStore<'a>, config: &CostingConfig) -> Self {
        Self {
            store,
            max_depth: config.depth_limit(store.len()),
            step_limit: config.step_limit(store.len()),
        }
    }

    /// 執行彙總
    ///
    /// 以顯式堆疊做後序遍歷，不受呼叫堆疊深度限制。
    /// 即使驗證被略過，重複走訪、超過深度/步數或有節點無法從頂層到達時，
    /// 都會立即回傳 `CostError::TraversalLimitExceeded`。
    pub fn compute(&self) -> cost_core::Result<RollupResult> {
        let store = self.store;
        let mut costs: Vec<Option<Decimal>> = vec![None; store.len()];
        let mut details: Vec<Option<NodeCost>> = vec![None; store.len()];
        let mut visited = vec![false; store.len()];
        let mut steps = 0usize;

        for &root in store.roots() {
            let mut stack = vec![Frame {
                idx: root,
                depth: 0,
                expanded: false,
            }];

            while let Some(frame) = stack.pop() {
                steps += 1;
                if steps > self.step_limit {
                    return Err(CostError::TraversalLimitExceeded(format!(
                        "遍歷步數超過 {}",
                        self.step_limit
                    )));
                }

                if frame.expanded {
                    let detail = self.evaluate(frame, &costs)?;
                    costs[frame.idx] = Some(detail.cost);
                    details[frame.idx] = Some(detail);
                    continue;
                }

                if visited[frame.idx] {
                    return Err(CostError::TraversalLimitExceeded(format!(
                        "節點 {} 被重複走訪",
                        self.node_id(frame.idx)
                    )));
                }
                visited[frame.idx] = true;

                if frame.depth >= self.max_depth {
                    return Err(CostError::TraversalLimitExceeded(format!(
                        "節點 {} 的層級 {} 超過上限 {}",
                        self.node_id(frame.idx),
                        frame.depth,
                        self.max_depth
                    )));
                }

                stack.push(Frame {
                    expanded: true,
                    ..frame
                });
                // 反向入堆疊，讓子節點依輸入順序出堆疊
                for &child in store.children(frame.idx).iter().rev() {
                    stack.push(Frame {
                        idx: child,
                        depth: frame.depth + 1,
                        expanded: false,
                    });
                }
            }
        }

        let unreached: Vec<&str> = (0..store.len())
            .filter(|idx| !visited[*idx] && !store.duplicates().contains(idx))
            .map(|idx| self.node_id(idx))
            .collect();
        if !unreached.is_empty() {
            return Err(CostError::TraversalLimitExceeded(format!(
                "{} 個節點無法從頂層節點到達: {}",
                unreached.len(),
                unreached.join(", ")
            )));
        }

        let mut components_cost = Decimal::ZERO;
        let mut raw_materials_cost = Decimal::ZERO;
        for &root in store.roots() {
            let cost = costs[root].ok_or_else(|| missing_cost(self.node_id(root)))?;
            let is_component = store.node(root).map(|n| n.is_component()).unwrap_or(false);
            if is_component {
                components_cost = checked_add(components_cost, cost)?;
            } else {
                raw_materials_cost = checked_add(raw_materials_cost, cost)?;
            }
        }

        tracing::debug!(
            "成本彙總完成: 元件 {}, 原物料 {}, 步數 {}",
            components_cost,
            raw_materials_cost,
            steps
        );

        Ok(RollupResult {
            components_cost,
            raw_materials_cost,
            node_costs: details.into_iter().flatten().collect(),
        })
    }

    /// 計算單一節點（子節點已完成）
    fn evaluate(&self, frame: Frame, costs: &[Option<Decimal>]) -> cost_core::Result<NodeCost> {
        let node = self
            .store
            .node(frame.idx)
            .ok_or_else(|| CostError::CalculationError(format!("索引 {} 無對應節點", frame.idx)))?;

        let mut children_cost = Decimal::ZERO;
        for &child in self.store.children(frame.idx) {
            let child_cost = costs[child].ok_or_else(|| missing_cost(self.node_id(child)))?;
            children_cost = checked_add(children_cost, child_cost)?;
        }

        let own_cost = node
            .quantity_or_zero()
            .checked_mul(node.rate_or_zero())
            .ok_or_else(|| CostError::CalculationError(format!("節點 {} 本身成本溢位", node.id)))?;
        let raw_total = checked_add(own_cost, children_cost)?;

        let loss = match node.kind {
            NodeKind::Material => LossPercent::ZERO,
            NodeKind::Component { .. } => LossPercent::try_new(&node.id, node.loss_percent())?,
        };
        let cost = loss.inflate(raw_total)?;

        Ok(NodeCost {
            node_id: node.id.clone(),
            is_component: node.is_component(),
            is_top_level: node.is_top_level(),
            depth: frame.depth,
            own_cost,
            children_cost,
            raw_total,
            yield_factor: loss.yield_factor(),
            cost,
        })
    }

    fn node_id(&self, idx: usize) -> &'a str {
        self.store.node(idx).map(|n| n.id.as_str()).unwrap_or("?")
    }
}

fn checked_add(a: Decimal, b: Decimal) -> cost_core::Result<Decimal> {
    a.checked_add(b)
        .ok_or_else(|| CostError::CalculationError(format!("成本加總溢位: {} + {}", a, b)))
}

fn missing_cost(node_id: &str) -> CostError {
    CostError::CalculationError(format!("節點 {} 尚未計算成本", node_id))
}
