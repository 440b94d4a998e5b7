//! # Lifecycle Invariants
//!
//! Property tests over random sequences of create, reveal and refresh,
//! including pairs of concurrent reveals.
//!
//! After every step:
//! - a cached record carries a revealed value exactly when it is verified
//! - a revealed value always equals the value the record was created with
//! - a record seen verified never reads as unverified again
//! - the ledger applies at most one verification per record

#[cfg(test)]
mod tests {
    use crate::harness::Harness;
    use cvl_lifecycle::{ConfidentialRecordApi, ConfidentialityState, LifecycleError};
    use proptest::prelude::*;
    use shared_types::{PublicAttributes, RecordId};
    use std::collections::{HashMap, HashSet};

    #[derive(Debug, Clone)]
    enum Op {
        Create { value: u32, level: u32 },
        Reveal(usize),
        RevealTwice(usize),
        StaleReads(usize),
        Refresh,
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            3 => (0u32..=12, 1u32..=10).prop_map(|(value, level)| Op::Create { value, level }),
            3 => any::<usize>().prop_map(Op::Reveal),
            2 => any::<usize>().prop_map(Op::RevealTwice),
            1 => (0usize..=4).prop_map(Op::StaleReads),
            1 => Just(Op::Refresh),
        ]
    }

    struct Model {
        created: Vec<(RecordId, u32)>,
        seen_verified: HashSet<RecordId>,
    }

    impl Model {
        fn pick(&self, index: usize) -> Option<(RecordId, u32)> {
            if self.created.is_empty() {
                None
            } else {
                Some(self.created[index % self.created.len()].clone())
            }
        }
    }

    fn check(harness: &Harness, model: &mut Model) -> Result<(), TestCaseError> {
        let expected: HashMap<_, _> = model.created.iter().cloned().collect();

        for record in harness.coordinator.records() {
            let verified = matches!(record.state(), ConfidentialityState::Verified { .. });
            prop_assert_eq!(record.revealed_value().is_some(), verified);

            if let Some(value) = record.revealed_value() {
                prop_assert_eq!(Some(&value), expected.get(record.id()));
                model.seen_verified.insert(record.id().clone());
            } else {
                prop_assert!(
                    !model.seen_verified.contains(record.id()),
                    "record {} reverted to unverified",
                    record.id()
                );
            }
        }

        prop_assert!(harness.ledger.verified_count() <= model.created.len());
        Ok(())
    }

    async fn run(ops: Vec<Op>) -> Result<(), TestCaseError> {
        let harness = Harness::connected().await;
        let mut model = Model {
            created: Vec::new(),
            seen_verified: HashSet::new(),
        };

        for op in ops {
            match op {
                Op::Create { value, level } => {
                    let result = harness
                        .coordinator
                        .create(PublicAttributes::new("Engineer", level, 100), value)
                        .await;
                    match result {
                        Ok(record) => {
                            prop_assert!((1..=10).contains(&value));
                            model.created.push((record.id().clone(), value));
                        }
                        Err(LifecycleError::Validation { .. }) => {
                            prop_assert!(!(1..=10).contains(&value));
                        }
                        Err(other) => return Err(TestCaseError::fail(other.to_string())),
                    }
                }
                Op::Reveal(index) => {
                    if let Some((id, value)) = model.pick(index) {
                        match harness.coordinator.reveal(&id).await {
                            Ok(revelation) => prop_assert_eq!(revelation.value, value),
                            // Stale reads may outlast the read budget
                            Err(LifecycleError::RecordFetch { .. }) => {}
                            Err(other) => return Err(TestCaseError::fail(other.to_string())),
                        }
                    }
                }
                Op::RevealTwice(index) => {
                    if let Some((id, value)) = model.pick(index) {
                        let (a, b) = tokio::join!(
                            harness.coordinator.reveal(&id),
                            harness.coordinator.reveal(&id)
                        );
                        for result in [a, b] {
                            match result {
                                Ok(revelation) => prop_assert_eq!(revelation.value, value),
                                Err(LifecycleError::RecordFetch { .. }) => {}
                                Err(other) => {
                                    return Err(TestCaseError::fail(other.to_string()))
                                }
                            }
                        }
                    }
                }
                Op::StaleReads(count) => harness.ledger.serve_stale_reads(count),
                Op::Refresh => {
                    harness
                        .coordinator
                        .refresh()
                        .await
                        .map_err(|e| TestCaseError::fail(e.to_string()))?;
                }
            }
            check(&harness, &mut model)?;
        }

        // Every record the ledger verified holds its created value
        for (id, value) in &model.created {
            if let Some(snapshot) = harness.ledger.stored_snapshot(id) {
                if snapshot.is_verified {
                    prop_assert_eq!(snapshot.decrypted_value, *value);
                }
            }
        }
        Ok(())
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_verified_state_is_monotonic_and_consistent(
            ops in prop::collection::vec(op_strategy(), 1..24)
        ) {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_time()
                .build()
                .unwrap();
            runtime.block_on(run(ops))?;
        }
    }
}
