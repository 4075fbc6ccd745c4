#![cfg(test)]

// Property tests for LongHashMap kept inside the crate so they can inspect
// slot placement and seeds.

use crate::config::TableConfig;
use crate::long_hash_map::LongHashMap;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::{BTreeSet, HashMap};

// Pool-indexed operations: indices shrink to earlier keys, the pool shrinks,
// and op lists shrink in length.
#[derive(Clone, Debug)]
enum Op {
    Put(usize, i32),
    Get(usize),
    Absent(i64),
    Mutate(usize, i32),
    Iterate,
}

fn arb_key() -> impl Strategy<Value = i64> {
    prop_oneof![
        any::<i64>(),
        -64i64..64,
        Just(i64::MIN),
        Just(i64::MAX),
        // Multiples of a large power of two agree in their low bits.
        (0i64..256).prop_map(|k| k << 40),
    ]
}

fn arb_scenario() -> impl Strategy<Value = (Vec<i64>, Vec<Op>)> {
    proptest::collection::btree_set(arb_key(), 1..=48).prop_flat_map(|pool| {
        let pool: Vec<i64> = pool.into_iter().collect();
        let idx = 0..pool.len();
        let op = prop_oneof![
            4 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| Op::Put(i, v)),
            2 => idx.clone().prop_map(Op::Get),
            1 => arb_key().prop_map(Op::Absent),
            1 => (idx.clone(), any::<i32>()).prop_map(|(i, d)| Op::Mutate(i, d)),
            1 => Just(Op::Iterate),
        ];
        proptest::collection::vec(op, 1..200).prop_map(move |ops| (pool.clone(), ops))
    })
}

// Property: state-machine equivalence against std::collections::HashMap.
// Invariants exercised across random operation sequences:
// - `put` returns the previous value exactly when the model had one.
// - `get`/`contains_key` parity with the model; absent keys stay absent.
// - `len` equals the number of distinct keys ever inserted.
// - After every `put`, `len <= capacity * load_factor` and capacity is a
//   power of two.
// - `keys`/`values`/`for_each` yield each live entry exactly once.
proptest! {
    #![proptest_config(ProptestConfig { cases: 96, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine(
        (pool, ops) in arb_scenario(),
        capacity in 0isize..40,
        load_factor in 0.1f64..1.5,
    ) {
        let config = TableConfig::new().initial_capacity(capacity).load_factor(load_factor);
        let mut sut: LongHashMap<i32> = LongHashMap::with_config(config).unwrap();
        let mut model: HashMap<i64, i32> = HashMap::new();

        for op in ops {
            match op {
                Op::Put(i, v) => {
                    let k = pool[i];
                    let prev = sut.put(k, v);
                    prop_assert_eq!(prev, model.insert(k, v));
                    prop_assert!(sut.capacity().is_power_of_two());
                    prop_assert!(sut.len() as f64 <= sut.capacity() as f64 * load_factor);
                    prop_assert!(sut.len() <= sut.threshold());
                }
                Op::Get(i) => {
                    let k = pool[i];
                    prop_assert_eq!(sut.get(k), model.get(&k));
                    prop_assert_eq!(sut.contains_key(k), model.contains_key(&k));
                }
                Op::Absent(k) => {
                    prop_assert_eq!(sut.get(k), model.get(&k));
                    prop_assert_eq!(sut.contains_key(k), model.contains_key(&k));
                }
                Op::Mutate(i, d) => {
                    let k = pool[i];
                    match (sut.get_mut(k), model.get_mut(&k)) {
                        (Some(s), Some(m)) => {
                            *s = s.wrapping_add(d);
                            *m = m.wrapping_add(d);
                        }
                        (None, None) => {}
                        (s, m) => prop_assert!(false, "get_mut mismatch: {:?} vs {:?}", s, m),
                    }
                }
                Op::Iterate => {
                    let keys: BTreeSet<i64> = sut.keys().into_iter().collect();
                    let m_keys: BTreeSet<i64> = model.keys().copied().collect();
                    prop_assert_eq!(keys, m_keys);

                    let mut walked = HashMap::new();
                    sut.for_each(|k, v| {
                        walked.insert(k, *v);
                    }).unwrap();
                    prop_assert_eq!(&walked, &model);

                    let mut values: Vec<i32> = sut.values().copied().collect();
                    let mut m_values: Vec<i32> = model.values().copied().collect();
                    values.sort_unstable();
                    m_values.sort_unstable();
                    prop_assert_eq!(values, m_values);
                }
            }
            prop_assert_eq!(sut.len(), model.len());
            prop_assert_eq!(sut.is_empty(), model.is_empty());
        }

        // Every key ever written still resolves to its latest value.
        for (k, v) in &model {
            prop_assert_eq!(sut.get(*k), Some(v));
        }
    }
}

// Property: the same keys, the same generator state, the same layout; and
// every key sits on its own slot.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_placement_is_a_function_of_seeds(
        keys in proptest::collection::btree_set(any::<i64>(), 1..100),
        rng_seed in any::<u64>(),
    ) {
        let build = || {
            let mut rng = StdRng::seed_from_u64(rng_seed);
            let mut t = LongHashMap::with_config_and_rng(TableConfig::new().initial_capacity(2), &mut rng).unwrap();
            for &k in &keys {
                t.put(k, ());
            }
            t
        };
        let (a, b) = (build(), build());
        prop_assert_eq!(a.seeds(), b.seeds());

        let mut used = BTreeSet::new();
        for &k in &keys {
            let slot = a.slot_of(k);
            prop_assert!(slot.is_some());
            prop_assert_eq!(slot, b.slot_of(k));
            prop_assert!(used.insert(slot), "two keys share a slot");
        }
    }
}

// Property: with a small ceiling the table fills every slot, then rejects
// new keys without disturbing stored ones.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_saturated_table_fills_completely(
        keys in proptest::collection::btree_set(any::<i64>(), 20..40),
        log2_max in 0u32..5,
    ) {
        let max = 1usize << log2_max;
        let config = TableConfig::new().initial_capacity(1).max_capacity(max);
        let mut t = LongHashMap::with_config(config).unwrap();
        let keys: Vec<i64> = keys.into_iter().collect();

        for (i, &k) in keys.iter().enumerate() {
            let res = t.try_put(k, i);
            if i < max {
                prop_assert_eq!(res, Ok(None));
            } else {
                prop_assert!(res.is_err());
            }
        }
        prop_assert_eq!(t.len(), max);
        prop_assert_eq!(t.capacity(), max);
        for (i, &k) in keys.iter().enumerate().take(max) {
            prop_assert_eq!(t.get(k), Some(&i));
        }
        for &k in keys.iter().skip(max) {
            prop_assert!(!t.contains_key(k));
        }
    }
}
