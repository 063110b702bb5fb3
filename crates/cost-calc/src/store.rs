//! 節點存放與父子索引

use cost_core::{BomInput, BomNode};
use std::collections::HashMap;

/// 節點存放區（arena）
///
/// 一次建立 `id → 索引` 與 `父 → [子]` 索引，之後的遍歷都以整數索引進行。
/// 懸空父節點、重複ID只記錄下來，交由驗證器判斷。
#[derive(Debug)]
pub struct NodeStore<'a> {
    nodes: Vec<&'a BomNode>,
    index: HashMap<&'a str, usize>,
    children: Vec<Vec<usize>>,
    roots: Vec<usize>,
    dangling: Vec<usize>,
    duplicates: Vec<usize>,
}

impl<'a> NodeStore<'a> {
    /// 從節點清單建立存放區，O(n)
    pub fn build<I>(nodes: I) -> Self
    where
        I: IntoIterator<Item = &'a BomNode>,
    {
        let nodes: Vec<&'a BomNode> = nodes.into_iter().collect();
        let mut index = HashMap::with_capacity(nodes.len());
        let mut duplicates = Vec::new();

        for (idx, node) in nodes.iter().enumerate() {
            if index.contains_key(node.id.as_str()) {
                duplicates.push(idx);
            } else {
                index.insert(node.id.as_str(), idx);
            }
        }

        let mut children = vec![Vec::new(); nodes.len()];
        let mut roots = Vec::new();
        let mut dangling = Vec::new();

        for (idx, node) in nodes.iter().enumerate() {
            // 重複ID的節點不進入索引
            if index.get(node.id.as_str()) != Some(&idx) {
                continue;
            }
            match node.parent_id.as_deref() {
                None => roots.push(idx),
                Some(parent_id) => match index.get(parent_id) {
                    Some(&parent_idx) => children[parent_idx].push(idx),
                    None => dangling.push(idx),
                },
            }
        }

        Self {
            nodes,
            index,
            children,
            roots,
            dangling,
            duplicates,
        }
    }

    /// 從計算輸入建立（先元件後材料）
    pub fn from_input(input: &'a BomInput) -> Self {
        Self::build(input.nodes())
    }

    /// 節點數（含重複）
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// 是否為空
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// 依索引取節點
    pub fn node(&self, idx: usize) -> Option<&'a BomNode> {
        self.nodes.get(idx).copied()
    }

    /// 依ID取索引
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// 依ID取節點
    pub fn get(&self, id: &str) -> Option<&'a BomNode> {
        self.index_of(id).and_then(|idx| self.node(idx))
    }

    /// 子節點索引（依輸入順序）
    pub fn children(&self, idx: usize) -> &[usize] {
        self.children.get(idx).map(Vec::as_slice).unwrap_or(&[])
    }

    /// 頂層節點索引
    pub fn roots(&self) -> &[usize] {
        &self.roots
    }

    /// 父節點不存在的節點索引
    pub fn dangling(&self) -> &[usize] {
        &self.dangling
    }

    /// 重複ID的節點索引（第二次以後出現者）
    pub fn duplicates(&self) -> &[usize] {
        &self.duplicates
    }

    /// 父節點索引
    pub fn parent_of(&self, idx: usize) -> Option<usize> {
        self.node(idx)
            .and_then(|node| node.parent_id.as_deref())
            .and_then(|parent_id| self.index_of(parent_id))
    }

    /// 所有節點（依索引順序）
    pub fn iter(&self) -> impl Iterator<Item = (usize, &'a BomNode)> + '_ {
        self.nodes.iter().copied().enumerate()
    }

    /// 某節點的所有後代（廣度優先，不含自身）
    ///
    /// 已走訪的節點不會重複加入，即使資料含循環也會結束。
    pub fn descendants(&self, idx: usize) -> Vec<usize> {
        let mut visited = vec![false; self.nodes.len()];
        if let Some(flag) = visited.get_mut(idx) {
            *flag = true;
        }

        let mut result = Vec::new();
        let mut cursor = 0;
        let mut frontier: Vec<usize> = self.children(idx).to_vec();

        while cursor < frontier.len() {
            let current = frontier[cursor];
            cursor += 1;
            if visited[current] {
                continue;
            }
            visited[current] = true;
            result.push(current);
            frontier.extend_from_slice(self.children(current));
        }

        result
    }
}
