use chordal_core::{ExpandedMatrix, FlowTable, ZoneKey};
use proptest::prelude::*;

fn flow_table_strategy() -> impl Strategy<Value = FlowTable> {
    (0usize..8).prop_flat_map(|n| {
        proptest::collection::vec(proptest::collection::vec(0.0f64..1000.0, n), n).prop_map(
            move |flows| {
                let names = (0..n).map(|i| format!("entity {i}")).collect();
                FlowTable::new(names, flows).unwrap()
            },
        )
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn matrix_is_2n_square_with_zero_self_quads(table in flow_table_strategy()) {
        let m = ExpandedMatrix::build(&table);
        prop_assert_eq!(m.dimension(), table.len() * 2);
        prop_assert_eq!(m.to_rows().len(), table.len() * 2);
        for i in 0..table.len() {
            for a in [ZoneKey::outgoing(i), ZoneKey::incoming(i)] {
                for b in [ZoneKey::outgoing(i), ZoneKey::incoming(i)] {
                    prop_assert_eq!(m.get(a, b), 0.0);
                }
            }
        }
    }

    #[test]
    fn zone_values_conserve_off_diagonal_flow(table in flow_table_strategy()) {
        let m = ExpandedMatrix::build(&table);
        let zone_total: f64 = m.zone_keys().map(|k| m.zone_value(k)).sum();
        let mut off_diagonal = 0.0;
        for i in 0..table.len() {
            for j in 0..table.len() {
                if i != j {
                    off_diagonal += table.flow(i, j);
                }
            }
        }
        // Each flow is counted once on its outgoing zone and once on its incoming zone.
        prop_assert!((zone_total - 2.0 * off_diagonal).abs() <= 1e-6 * (1.0 + off_diagonal));
        let outgoing: f64 = (0..table.len()).map(|i| m.zone_value(ZoneKey::outgoing(i))).sum();
        prop_assert!((outgoing - off_diagonal).abs() <= 1e-6 * (1.0 + off_diagonal));
    }
}
