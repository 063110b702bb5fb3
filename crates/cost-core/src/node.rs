//! BOM 節點模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::numeric::{lenient_decimal, or_zero};

/// 節點類型
///
/// 只有元件（半成品）帶損耗率；材料為葉節點，本層損耗恆為 0。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeKind {
    /// 原物料
    Material,
    /// 元件（可含子節點）
    Component {
        /// 損耗率（%），未填視為 0
        loss_percent: Option<Decimal>,
    },
}

/// JSON 的 `kind` 標記
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KindTag {
    Material,
    Component,
}

impl KindTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Material => "material",
            Self::Component => "component",
        }
    }
}

/// 節點的輸入格式
///
/// `kind` 可省略：放在 `BomInput` 的 `materials`/`components` 清單中時由清單決定。
#[derive(Debug, Clone, Deserialize)]
pub struct NodeRecord {
    pub id: String,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub kind: Option<KindTag>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub loss_percent: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub quantity: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub rate: Option<Decimal>,
    #[serde(default)]
    pub uom: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

impl NodeRecord {
    /// 轉為節點；有明確 `kind` 時以它為準，否則採用 `listed_as`
    pub fn into_node(self, listed_as: KindTag) -> BomNode {
        let kind = match self.kind.unwrap_or(listed_as) {
            KindTag::Material => NodeKind::Material,
            KindTag::Component => NodeKind::Component {
                loss_percent: self.loss_percent,
            },
        };
        BomNode {
            id: self.id,
            parent_id: self.parent_id,
            kind,
            quantity: self.quantity,
            rate: self.rate,
            uom: self.uom,
            name: self.name,
        }
    }
}

impl TryFrom<NodeRecord> for BomNode {
    type Error = String;

    /// 單獨反序列化的節點沒有清單可依，必須帶 `kind`
    fn try_from(record: NodeRecord) -> std::result::Result<Self, Self::Error> {
        match record.kind {
            Some(tag) => Ok(record.into_node(tag)),
            None => Err(format!("節點 {} 缺少 kind 欄位", record.id)),
        }
    }
}

/// BOM 節點
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "NodeRecord")]
pub struct BomNode {
    /// 節點ID（同一 BOM 內唯一）
    pub id: String,

    /// 父節點ID，`None` 表示直接掛在成品下
    pub parent_id: Option<String>,

    /// 節點類型
    #[serde(flatten)]
    pub kind: NodeKind,

    /// 每單位父件的用量
    pub quantity: Option<Decimal>,

    /// 單價
    pub rate: Option<Decimal>,

    /// 單位（不解讀）
    pub uom: Option<String>,

    /// 品名
    pub name: Option<String>,
}

impl BomNode {
    /// 創建材料節點
    pub fn material(id: impl Into<String>, quantity: Decimal, rate: Decimal) -> Self {
        Self {
            id: id.into(),
            parent_id: None,
            kind: NodeKind::Material,
            quantity: Some(quantity),
            rate: Some(rate),
            uom: None,
            name: None,
        }
    }

    /// 創建元件節點
    pub fn component(
        id: impl Into<String>,
        quantity: Decimal,
        rate: Decimal,
        loss_percent: Decimal,
    ) -> Self {
        Self {
            id: id.into(),
            parent_id: None,
            kind: NodeKind::Component {
                loss_percent: Some(loss_percent),
            },
            quantity: Some(quantity),
            rate: Some(rate),
            uom: None,
            name: None,
        }
    }

    /// 建構器模式：設置父節點
    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    /// 建構器模式：設置單位
    pub fn with_uom(mut self, uom: impl Into<String>) -> Self {
        self.uom = Some(uom.into());
        self
    }

    /// 建構器模式：設置品名
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// 是否為元件
    pub fn is_component(&self) -> bool {
        matches!(self.kind, NodeKind::Component { .. })
    }

    /// 是否為材料
    pub fn is_material(&self) -> bool {
        self.kind == NodeKind::Material
    }

    /// 類型標記
    pub fn kind_tag(&self) -> KindTag {
        match self.kind {
            NodeKind::Material => KindTag::Material,
            NodeKind::Component { .. } => KindTag::Component,
        }
    }

    /// 是否為頂層節點
    pub fn is_top_level(&self) -> bool {
        self.parent_id.is_none()
    }

    /// 本層損耗率數值（材料恆為 0）
    pub fn loss_percent(&self) -> Decimal {
        match self.kind {
            NodeKind::Material => Decimal::ZERO,
            NodeKind::Component { loss_percent } => or_zero(loss_percent),
        }
    }

    /// 用量（缺值視為 0）
    pub fn quantity_or_zero(&self) -> Decimal {
        or_zero(self.quantity)
    }

    /// 單價（缺值視為 0）
    pub fn rate_or_zero(&self) -> Decimal {
        or_zero(self.rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_nodes() {
        let frame = BomNode::component("FRAME", Decimal::ONE, Decimal::from(5), Decimal::from(20))
            .with_name("車架")
            .with_uom("pcs");
        let tube = BomNode::material("TUBE", Decimal::from(3), Decimal::from(2)).with_parent("FRAME");

        assert!(frame.is_component());
        assert!(frame.is_top_level());
        assert_eq!(frame.loss_percent(), Decimal::from(20));

        assert!(tube.is_material());
        assert!(!tube.is_top_level());
        assert_eq!(tube.loss_percent(), Decimal::ZERO);
    }

    #[test]
    fn test_deserialize_tagged_node() {
        let node: BomNode = serde_json::from_value(json!({
            "id": "C-10",
            "parent_id": "C-1",
            "kind": "component",
            "loss_percent": "12.5",
            "quantity": 2,
            "rate": "4.00",
            "uom": "kg"
        }))
        .unwrap();

        assert!(node.is_component());
        assert_eq!(node.parent_id.as_deref(), Some("C-1"));
        assert_eq!(node.loss_percent(), Decimal::new(125, 1));
        assert_eq!(node.quantity_or_zero(), Decimal::from(2));
        assert_eq!(node.rate_or_zero(), Decimal::from(4));
    }

    #[test]
    fn test_deserialize_draft_with_gaps() {
        let node: BomNode = serde_json::from_value(json!({
            "id": "M-1",
            "kind": "material",
            "quantity": "",
            "rate": "n/a"
        }))
        .unwrap();

        assert!(node.is_material());
        assert_eq!(node.quantity, None);
        assert_eq!(node.rate, None);
        assert_eq!(node.quantity_or_zero(), Decimal::ZERO);
    }

    #[test]
    fn test_standalone_node_requires_kind() {
        let err = serde_json::from_value::<BomNode>(json!({ "id": "X", "quantity": 1 })).unwrap_err();
        assert!(err.to_string().contains("kind"));
    }

    #[test]
    fn test_record_kind_falls_back_to_list() {
        let record: NodeRecord = serde_json::from_value(json!({
            "id": "C-2",
            "loss_percent": 10,
            "quantity": 1,
            "rate": 3
        }))
        .unwrap();

        let node = record.clone().into_node(KindTag::Component);
        assert_eq!(node.kind_tag(), KindTag::Component);
        assert_eq!(node.loss_percent(), Decimal::TEN);
        assert!(record.into_node(KindTag::Material).is_material());
    }

    #[test]
    fn test_serialized_node_reloads() {
        let node = BomNode::component("C-3", Decimal::ONE, Decimal::TWO, Decimal::from(5)).with_parent("C-1");
        let back: BomNode = serde_json::from_value(serde_json::to_value(&node).unwrap()).unwrap();
        assert_eq!(back, node);
    }
}
