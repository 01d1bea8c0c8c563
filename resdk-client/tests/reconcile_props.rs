mod common;

use common::{mock_client, relation_record};
use proptest::collection::btree_set;
use proptest::prelude::*;
use std::collections::BTreeSet;

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn reconcile_converges_and_settles(
        current in btree_set(1u64..30, 0..8),
        desired in btree_set(1u64..30, 0..8),
    ) {
        let (resolwe, transport) = mock_client();
        let entities: Vec<(u64, Option<&str>)> = current.iter().map(|&id| (id, None)).collect();
        transport.insert("relation", relation_record(10, "group", 1, None, &entities));
        let desired_ids: Vec<u64> = desired.iter().copied().collect();

        let (converged, second_diff) = runtime().block_on(async {
            let mut relation = resolwe.relation().get(10u64).await.unwrap();
            resolwe
                .reconcile_relation(&mut relation, &desired_ids, &[], None)
                .await
                .unwrap();

            let mut refetched = resolwe.relation().get(10u64).await.unwrap();
            let converged: BTreeSet<u64> =
                refetched.entity_ids().into_iter().map(|id| id.get()).collect();
            let second = resolwe
                .reconcile_relation(&mut refetched, &desired_ids, &[], None)
                .await
                .unwrap();
            (converged, second)
        });

        prop_assert_eq!(converged, desired);
        prop_assert!(second_diff.is_empty());
    }
}
