//! 計算輸入快照

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::node::{KindTag, NodeRecord};
use crate::{BatchYield, BomNode, OperationEntry, Result, ScrapEntry, ValidationIssue};

/// 一份 BOM 的完整輸入
///
/// 由外部編輯/存取層提供，計算過程不會修改它。
/// 節點的類型由所在清單決定；節點另帶 `kind` 且與清單不符時，
/// 保留該標記，交由 `misfiled_nodes` 回報。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "InputRecord")]
pub struct BomInput {
    /// 原物料節點
    pub materials: Vec<BomNode>,

    /// 元件節點
    pub components: Vec<BomNode>,

    /// 工序
    pub operations: Vec<OperationEntry>,

    /// 報廢記錄
    pub scrap: Vec<ScrapEntry>,

    /// 批量
    pub batch_quantity: Decimal,
}

/// `BomInput` 的輸入格式
#[derive(Debug, Deserialize)]
struct InputRecord {
    #[serde(default)]
    materials: Vec<NodeRecord>,
    #[serde(default)]
    components: Vec<NodeRecord>,
    #[serde(default)]
    operations: Vec<OperationEntry>,
    #[serde(default)]
    scrap: Vec<ScrapEntry>,
    batch_quantity: Decimal,
}

impl From<InputRecord> for BomInput {
    fn from(record: InputRecord) -> Self {
        let list = |records: Vec<NodeRecord>, listed_as: KindTag| -> Vec<BomNode> {
            records
                .into_iter()
                .map(|node| node.into_node(listed_as))
                .collect()
        };

        Self {
            materials: list(record.materials, KindTag::Material),
            components: list(record.components, KindTag::Component),
            operations: record.operations,
            scrap: record.scrap,
            batch_quantity: record.batch_quantity,
        }
    }
}

impl BomInput {
    /// 創建空的輸入
    pub fn new(batch_quantity: Decimal) -> Self {
        Self {
            materials: Vec::new(),
            components: Vec::new(),
            operations: Vec::new(),
            scrap: Vec::new(),
            batch_quantity,
        }
    }

    /// 建構器模式：加入節點（依類型放入對應清單）
    pub fn with_node(mut self, node: BomNode) -> Self {
        self.add_node(node);
        self
    }

    /// 建構器模式：加入工序
    pub fn with_operation(mut self, operation: OperationEntry) -> Self {
        self.operations.push(operation);
        self
    }

    /// 建構器模式：加入報廢記錄
    pub fn with_scrap(mut self, scrap: ScrapEntry) -> Self {
        self.scrap.push(scrap);
        self
    }

    /// 加入節點
    pub fn add_node(&mut self, node: BomNode) {
        if node.is_material() {
            self.materials.push(node);
        } else {
            self.components.push(node);
        }
    }

    /// 所有節點（先元件後材料）
    pub fn nodes(&self) -> impl Iterator<Item = &BomNode> {
        self.components.iter().chain(self.materials.iter())
    }

    /// 節點總數
    pub fn node_count(&self) -> usize {
        self.components.len() + self.materials.len()
    }

    /// 驗證批量
    pub fn batch(&self) -> Result<BatchYield> {
        BatchYield::try_new(self.batch_quantity)
    }

    /// 類型與所在清單不符的節點
    pub fn misfiled_nodes(&self) -> Vec<ValidationIssue> {
        misfiled(&self.components, KindTag::Component)
            .chain(misfiled(&self.materials, KindTag::Material))
            .collect()
    }

    /// 除工序/報廢記錄ID外內容是否相同
    ///
    /// 未帶ID的草稿每次載入都會產生新ID，比較時略過。
    pub fn same_content(&self, other: &Self) -> bool {
        self.batch_quantity == other.batch_quantity
            && self.materials == other.materials
            && self.components == other.components
            && self.operations.len() == other.operations.len()
            && self.scrap.len() == other.scrap.len()
            && self
                .operations
                .iter()
                .zip(&other.operations)
                .all(|(a, b)| a.same_content(b))
            && self.scrap.iter().zip(&other.scrap).all(|(a, b)| a.same_content(b))
    }
}

fn misfiled(nodes: &[BomNode], listed_as: KindTag) -> impl Iterator<Item = ValidationIssue> + '_ {
    nodes
        .iter()
        .filter(move |node| node.kind_tag() != listed_as)
        .map(move |node| ValidationIssue::KindMismatch {
            node_id: node.id.clone(),
            listed_as: listed_as.as_str().to_string(),
            kind: node.kind_tag().as_str().to_string(),
        })
}
