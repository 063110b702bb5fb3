//! BOM 結構驗證
//!
//! 必須在成本遍歷之前執行：循環會造成無窮遍歷，損耗率 100% 會造成除以零。

use cost_core::{BomInput, CostError, LossPercent, NodeKind, ScrapEntry, ValidationIssue};

use crate::store::NodeStore;

/// 走訪狀態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    OnPath,
    Done,
}

/// 結構驗證器
pub struct IntegrityValidator;

impl IntegrityValidator {
    /// 驗證節點結構與報廢記錄，有任何問題即回傳 `CostError::Validation`
    pub fn validate(store: &NodeStore<'_>, scrap: &[ScrapEntry]) -> cost_core::Result<()> {
        Self::into_result(Self::check(store, scrap))
    }

    /// 驗證整份輸入：另外檢查節點類型是否與所在清單一致
    pub fn validate_input(store: &NodeStore<'_>, input: &BomInput) -> cost_core::Result<()> {
        let mut issues = input.misfiled_nodes();
        issues.extend(Self::check(store, &input.scrap));
        Self::into_result(issues)
    }

    fn into_result(issues: Vec<ValidationIssue>) -> cost_core::Result<()> {
        if issues.is_empty() {
            Ok(())
        } else {
            tracing::debug!("BOM 結構驗證失敗: {} 項問題", issues.len());
            Err(CostError::Validation(issues))
        }
    }

    /// 收集所有結構問題（不中斷）
    pub fn check(store: &NodeStore<'_>, scrap: &[ScrapEntry]) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();

        for &idx in store.duplicates() {
            if let Some(node) = store.node(idx) {
                issues.push(ValidationIssue::DuplicateNodeId {
                    node_id: node.id.clone(),
                });
            }
        }

        for &idx in store.dangling() {
            if let Some(node) = store.node(idx) {
                issues.push(ValidationIssue::DanglingParent {
                    node_id: node.id.clone(),
                    parent_id: node.parent_id.clone().unwrap_or_default(),
                });
            }
        }

        for (idx, node) in store.iter() {
            match node.kind {
                NodeKind::Component { .. } => {
                    let value = node.loss_percent();
                    if !LossPercent::is_valid(value) {
                        issues.push(ValidationIssue::InvalidLossPercent {
                            node_id: node.id.clone(),
                            value,
                        });
                    }
                }
                NodeKind::Material => {
                    let children = store.children(idx);
                    if !children.is_empty() {
                        issues.push(ValidationIssue::MaterialHasChildren {
                            node_id: node.id.clone(),
                            child_ids: children
                                .iter()
                                .filter_map(|&child| store.node(child))
                                .map(|child| child.id.clone())
                                .collect(),
                        });
                    }
                }
            }
        }

        for cycle in Self::find_cycles(store) {
            issues.push(ValidationIssue::Cycle { node_ids: cycle });
        }

        for entry in scrap {
            if !entry.has_valid_loss() {
                issues.push(ValidationIssue::InvalidScrapLoss {
                    item_ref: entry.item_ref.clone(),
                    value: entry.loss_percent.unwrap_or_default(),
                });
            }
        }

        issues
    }

    /// 找出父子關係中的所有循環
    ///
    /// 沿父節點指標迭代走訪，不使用遞迴。每個循環以成員ID表示，
    /// 起點會在尾端重複一次（例如 `A → B → A`）。
    pub fn find_cycles(store: &NodeStore<'_>) -> Vec<Vec<String>> {
        let mut marks = vec![Mark::Unvisited; store.len()];
        let mut cycles = Vec::new();

        for start in 0..store.len() {
            if marks[start] != Mark::Unvisited {
                continue;
            }

            let mut path = Vec::new();
            let mut current = Some(start);

            while let Some(idx) = current {
                match marks[idx] {
                    Mark::Done => break,
                    Mark::OnPath => {
                        if let Some(pos) = path.iter().position(|&p| p == idx) {
                            let mut ids: Vec<String> = path[pos..]
                                .iter()
                                .filter_map(|&p| store.node(p))
                                .map(|node| node.id.clone())
                                .collect();
                            if let Some(first) = ids.first().cloned() {
                                ids.push(first);
                            }
                            cycles.push(ids);
                        }
                        break;
                    }
                    Mark::Unvisited => {
                        marks[idx] = Mark::OnPath;
                        path.push(idx);
                        current = store.parent_of(idx);
                    }
                }
            }

            for idx in path {
                marks[idx] = Mark::Done;
            }
        }

        cycles
    }
}
