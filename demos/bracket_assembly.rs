//! 支架組件成本試算
//!
//! ```text
//! cargo run --example bracket_assembly
//! RUST_LOG=debug cargo run --example bracket_assembly
//! ```

use bom_cost::*;

fn main() -> anyhow::Result<()> {
    bom_cost::logging::init();

    let input = BomInput::new(Decimal::from(50))
        .with_node(
            BomNode::component("BRACKET", Decimal::ONE, Decimal::new(150, 2), Decimal::from(5))
                .with_name("L 型支架"),
        )
        .with_node(
            BomNode::component("PLATE", Decimal::from(2), Decimal::new(80, 2), Decimal::from(8))
                .with_parent("BRACKET")
                .with_name("沖壓板"),
        )
        .with_node(
            BomNode::material("SHEET", Decimal::new(35, 2), Decimal::from(12))
                .with_parent("PLATE")
                .with_uom("kg")
                .with_name("冷軋鋼板"),
        )
        .with_node(
            BomNode::material("BOLT-M6", Decimal::from(4), Decimal::new(12, 2))
                .with_parent("BRACKET")
                .with_uom("pcs"),
        )
        .with_node(BomNode::material("PACKING", Decimal::ONE, Decimal::new(30, 2)))
        .with_operation(OperationEntry::new(
            "沖壓",
            Decimal::from(2),
            Decimal::from(30),
            Decimal::from(42),
        ))
        .with_operation(OperationEntry::new(
            "焊接",
            Decimal::from(6),
            Decimal::from(15),
            Decimal::from(55),
        ))
        .with_scrap(
            ScrapEntry::new("SHEET-OFFCUT", Decimal::from(20), Decimal::from(12), Decimal::new(450, 2))
                .with_parent("PLATE"),
        );

    let calculator = BomCostCalculator::new(CostingConfig::new().with_rounding_dp(4));
    let result = calculator.calculate(&input)?;

    for node in &result.node_costs {
        println!(
            "{:<10} 深度 {}  本層 {:>10}  子件 {:>10}  成本 {:>10}",
            node.node_id,
            node.depth,
            node.own_cost,
            node.children_cost,
            node.cost.round_dp(4)
        );
    }
    println!("{}", serde_json::to_string_pretty(&result.summary)?);

    // 連鎖刪除預覽
    let removal = CascadeDelete::plan(&input, "PLATE")?;
    println!("刪除 PLATE 會一併移除 {} 筆記錄: {:?}", removal.len(), removal.node_ids);

    Ok(())
}
