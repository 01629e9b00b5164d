#![no_main]
use ahtable::{Config, Table};
use arbitrary::{Arbitrary, Unstructured};
use libfuzzer_sys::fuzz_target;
use std::collections::HashMap;

#[derive(Arbitrary, Clone, Debug)]
enum Op {
    Insert(Vec<u8>, u32),
    Get(Vec<u8>),
    TryGet(Vec<u8>),
    Remove(Vec<u8>),
    Dup,
    Clear,
    Reserve(u8),
}

fuzz_target!(|data: &[u8]| {
    let mut unstructured = Unstructured::new(data);

    let slot_count = usize::from(u8::arbitrary(&mut unstructured).unwrap_or(1).max(1));
    let load_factor = f32::from(u8::arbitrary(&mut unstructured).unwrap_or(4).max(4)) / 4.0;

    let Ok(ops) = <Vec<Op> as Arbitrary>::arbitrary(&mut unstructured) else {
        return;
    };

    let mut table: Table<u32> = Config::new()
        .slot_count(slot_count)
        .max_load_factor(load_factor)
        .build()
        .unwrap();
    let mut model = HashMap::<Vec<u8>, u32>::new();

    for op in ops {
        match op {
            Op::Insert(key, value) => {
                assert_eq!(model.insert(key.clone(), value), table.insert(&key, value).unwrap());
            }
            Op::Get(key) => {
                let value = table.get(&key).unwrap().get();
                assert_eq!(*model.entry(key).or_insert(0), value);
            }
            Op::TryGet(key) => {
                assert_eq!(model.get(&key).copied(), table.try_get(&key));
            }
            Op::Remove(key) => {
                assert_eq!(model.remove(&key), table.remove_entry(&key));
            }
            Op::Dup => {
                table = table.dup().unwrap();
            }
            Op::Clear => {
                table.clear();
                model.clear();
            }
            Op::Reserve(n) => {
                table.reserve(usize::from(n)).unwrap();
            }
        }

        assert_eq!(model.len(), table.len());
    }

    assert_eq!(model.len(), table.iter().count());
    for (key, value) in &table {
        assert_eq!(model.get(key), Some(&value));
    }
});
