//! 成本彙總性質測試

use cost_calc::{BomCostCalculator, IntegrityValidator, NodeStore};
use cost_core::{BomInput, BomNode};
use proptest::prelude::*;
use rust_decimal::Decimal;

/// (是否為元件, 用量, 單價, 損耗率, 父節點選擇)
type NodeSpec = (bool, u32, u32, u32, Option<usize>);

fn node_specs() -> impl Strategy<Value = Vec<NodeSpec>> {
    prop::collection::vec(
        (any::<bool>(), 0u32..50, 0u32..500, 0u32..60, prop::option::of(any::<usize>())),
        1..40,
    )
}

/// 產生合法的森林：父節點只從前面已建立的元件中挑選
fn build_input(specs: &[NodeSpec], with_loss: bool) -> BomInput {
    let mut input = BomInput::new(Decimal::from(7));
    let mut component_ids: Vec<String> = Vec::new();

    for (i, &(is_component, quantity, rate, loss, parent_choice)) in specs.iter().enumerate() {
        let id = format!("N{}", i);
        let loss = if with_loss { Decimal::from(loss) } else { Decimal::ZERO };
        let mut node = if is_component {
            BomNode::component(id.clone(), Decimal::from(quantity), Decimal::from(rate), loss)
        } else {
            BomNode::material(id.clone(), Decimal::from(quantity), Decimal::from(rate))
        };

        if let Some(choice) = parent_choice {
            if !component_ids.is_empty() {
                node = node.with_parent(component_ids[choice % component_ids.len()].clone());
            }
        }
        if is_component {
            component_ids.push(id);
        }
        input.add_node(node);
    }

    input
}

proptest! {
    #[test]
    fn generated_forests_pass_validation(specs in node_specs()) {
        let input = build_input(&specs, true);
        let store = NodeStore::from_input(&input);
        prop_assert!(IntegrityValidator::validate(&store, &input.scrap).is_ok());
    }

    #[test]
    fn without_loss_total_is_sum_of_own_costs(specs in node_specs()) {
        let input = build_input(&specs, false);
        let result = BomCostCalculator::default().calculate(&input).unwrap();

        let expected: Decimal = input
            .nodes()
            .map(|n| n.quantity_or_zero() * n.rate_or_zero())
            .sum();
        prop_assert_eq!(
            result.summary.components_cost + result.summary.raw_materials_cost,
            expected
        );
    }

    #[test]
    fn loss_never_decreases_cost(specs in node_specs()) {
        let calculator = BomCostCalculator::default();
        let lossless = calculator.calculate(&build_input(&specs, false)).unwrap();
        let lossy = calculator.calculate(&build_input(&specs, true)).unwrap();

        prop_assert!(lossy.summary.total_bom_cost >= lossless.summary.total_bom_cost);
        for (with, without) in lossy.node_costs.iter().zip(&lossless.node_costs) {
            prop_assert_eq!(&with.node_id, &without.node_id);
            prop_assert!(with.cost >= without.cost);
        }
    }

    #[test]
    fn recalculation_is_bit_identical(specs in node_specs()) {
        let input = build_input(&specs, true);
        let calculator = BomCostCalculator::default();

        let first = calculator.calculate(&input).unwrap();
        let second = calculator.calculate(&input).unwrap();
        prop_assert_eq!(first.summary.total_bom_cost.serialize(), second.summary.total_bom_cost.serialize());
        prop_assert_eq!(first.summary, second.summary);
    }
}
