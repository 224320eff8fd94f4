//! Engine Conformance Tests
//!
//! Drives both engines with the same operation sequence and checks every
//! observable result against a simple model store.

mod common;

use std::collections::BTreeMap;

use common::{for_each_engine, ids, load_fixture, message, temp_durable};
use msgstore::{DataStore, InMemoryStore, Message, Selector, StoreError};

// =============================================================================
// Model
// =============================================================================

#[derive(Debug, Clone)]
enum Op {
    Add(Message),
    Get(Selector),
    Delete(Selector),
}

#[derive(Debug, PartialEq)]
enum Outcome {
    Added,
    Duplicate,
    Found(Vec<Message>),
    Deleted(usize),
}

/// Reference behavior: a map ordered by message id
#[derive(Default)]
struct Model {
    messages: BTreeMap<String, Message>,
}

impl Model {
    fn matches(selector: &Selector, m: &Message) -> bool {
        match selector {
            Selector::ApplicationId(id) => m.application_id == *id,
            Selector::SessionId(id) => &m.session_id == id,
            Selector::MessageId(id) => &m.message_id == id,
        }
    }

    fn apply(&mut self, op: &Op) -> Outcome {
        match op {
            Op::Add(m) => {
                if self.messages.contains_key(&m.message_id) {
                    Outcome::Duplicate
                } else {
                    self.messages.insert(m.message_id.clone(), m.clone());
                    Outcome::Added
                }
            }
            Op::Get(selector) => Outcome::Found(
                self.messages
                    .values()
                    .filter(|m| Self::matches(selector, m))
                    .cloned()
                    .collect(),
            ),
            Op::Delete(selector) => {
                let before = self.messages.len();
                self.messages.retain(|_, m| !Self::matches(selector, m));
                Outcome::Deleted(before - self.messages.len())
            }
        }
    }
}

fn apply(store: &dyn DataStore, op: &Op) -> Outcome {
    match op {
        Op::Add(m) => match store.add(m.clone()) {
            Ok(()) => Outcome::Added,
            Err(StoreError::DuplicateKey(_)) => Outcome::Duplicate,
            Err(e) => panic!("unexpected store error: {}", e),
        },
        Op::Get(selector) => Outcome::Found(store.get(selector).unwrap()),
        Op::Delete(selector) => Outcome::Deleted(store.delete(selector).unwrap()),
    }
}

// =============================================================================
// Operation Generator
// =============================================================================

/// Small deterministic LCG so failures reproduce
struct Lcg(u64);

impl Lcg {
    fn next(&mut self, bound: u64) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (self.0 >> 33) % bound
    }
}

fn random_selector(rng: &mut Lcg) -> Selector {
    match rng.next(3) {
        0 => Selector::ApplicationId(rng.next(4) as i64),
        1 => Selector::SessionId(format!("s{}", rng.next(6))),
        _ => Selector::MessageId(format!("m{}", rng.next(30))),
    }
}

fn random_ops(seed: u64, count: usize) -> Vec<Op> {
    let mut rng = Lcg(seed);
    (0..count)
        .map(|_| match rng.next(10) {
            0..=4 => {
                let participants = (0..rng.next(4))
                    .map(|p| format!("p{}", p + rng.next(5)))
                    .collect();
                Op::Add(Message::new(
                    rng.next(4) as i64,
                    format!("s{}", rng.next(6)),
                    format!("m{}", rng.next(30)),
                    participants,
                    format!("content {}", rng.next(1000)),
                ))
            }
            5..=7 => Op::Get(random_selector(&mut rng)),
            _ => Op::Delete(random_selector(&mut rng)),
        })
        .collect()
}

// =============================================================================
// Conformance Tests
// =============================================================================

#[test]
fn test_engines_match_model_on_random_sequences() {
    for seed in [1u64, 7, 42, 1234, 987654321] {
        let ops = random_ops(seed, 300);

        let memory = InMemoryStore::new();
        let (_temp, durable) = temp_durable();
        let mut model = Model::default();

        for (step, op) in ops.iter().enumerate() {
            let expected = model.apply(op);
            let from_memory = apply(&memory, op);
            let from_durable = apply(&durable, op);

            assert_eq!(from_memory, expected, "memory diverged at seed {} step {}: {:?}", seed, step, op);
            assert_eq!(from_durable, expected, "durable diverged at seed {} step {}: {:?}", seed, step, op);
        }
    }
}

#[test]
fn test_round_trip_and_single_delete() {
    for_each_engine(|engine, store| {
        let m = message(1, "s1", "m1");
        store.add(m.clone()).unwrap();

        assert_eq!(store.get_by_message_id("m1").unwrap(), vec![m], "{}", engine);
        assert_eq!(store.delete_by_message_id("m1").unwrap(), 1, "{}", engine);
        assert!(store.get_by_message_id("m1").unwrap().is_empty(), "{}", engine);
        assert_eq!(store.delete_by_message_id("m1").unwrap(), 0, "{}", engine);
    });
}

#[test]
fn test_delete_by_application_leaves_others() {
    for_each_engine(|engine, store| {
        store.add(message(1, "a", "x1")).unwrap();
        store.add(message(1, "b", "x2")).unwrap();
        store.add(message(2, "c", "x3")).unwrap();

        assert_eq!(store.delete_by_application_id(1).unwrap(), 2, "{}", engine);
        assert!(store.get_by_application_id(1).unwrap().is_empty(), "{}", engine);
        assert_eq!(ids(&store.get_by_application_id(2).unwrap()), ["x3"], "{}", engine);
    });
}

#[test]
fn test_session_delete_unreachable_from_other_indexes() {
    for_each_engine(|engine, store| {
        load_fixture(store);
        let removed = store.get_by_session_id("s2").unwrap();

        assert_eq!(store.delete_by_session_id("s2").unwrap(), removed.len(), "{}", engine);

        for m in &removed {
            assert!(store.get_by_message_id(&m.message_id).unwrap().is_empty(), "{}", engine);
            assert!(
                !store
                    .get_by_application_id(m.application_id)
                    .unwrap()
                    .contains(m),
                "{}",
                engine
            );
        }
    });
}

#[test]
fn test_fixture_counts() {
    for_each_engine(|engine, store| {
        load_fixture(store);

        assert_eq!(store.get_by_application_id(1).unwrap().len(), 3, "{}", engine);
        assert_eq!(store.get_by_session_id("s1").unwrap().len(), 2, "{}", engine);
        // m3 and m4 both live in s2
        assert_eq!(store.delete_by_session_id("s2").unwrap(), 2, "{}", engine);
    });
}

#[test]
fn test_participants_order_on_both_engines() {
    for_each_engine(|engine, store| {
        store.add(message(1, "s1", "m1")).unwrap();
        let fetched = store.get_by_application_id(1).unwrap();
        assert_eq!(fetched[0].participants, ["john", "jack"], "{}", engine);
    });
}

#[test]
fn test_duplicate_rejected_on_both_engines() {
    for_each_engine(|engine, store| {
        store.add(message(1, "s1", "m1")).unwrap();
        assert!(
            matches!(store.add(message(1, "s1", "m1")), Err(StoreError::DuplicateKey(_))),
            "{}",
            engine
        );
        assert_eq!(store.get_by_session_id("s1").unwrap().len(), 1, "{}", engine);
    });
}
