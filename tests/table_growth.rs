use ahtable::{Config, Table};
use test_log::test;

const ITEM_COUNT: u64 = 100_000;

#[test]
fn table_growth_preserves_contents() -> ahtable::Result<()> {
    let mut table = Table::<u64>::with_slot_count(1)?;
    let mut growth_count = 0;

    for x in 0..ITEM_COUNT {
        let slot_count = table.slot_count();
        table.insert(x.to_be_bytes(), x * 2)?;

        if table.slot_count() != slot_count {
            assert_eq!(slot_count * 2, table.slot_count());
            growth_count += 1;
        }
    }

    assert!(growth_count > 10);
    assert_eq!(ITEM_COUNT as usize, table.len());

    for x in 0..ITEM_COUNT {
        assert_eq!(Some(x * 2), table.try_get(x.to_be_bytes()), "{x} not found");
    }

    Ok(())
}

#[test]
fn table_growth_bounds_load() -> ahtable::Result<()> {
    let mut table = Config::new().max_load_factor(4.0).build::<u32>()?;

    for x in 0..50_000u32 {
        table.insert(format!("user:{x}"), x)?;
    }

    #[allow(clippy::cast_precision_loss)]
    let load = table.len() as f64 / table.slot_count() as f64;
    assert!(load < 4.0, "load factor is {load}");

    Ok(())
}

#[test]
fn table_uniqueness() -> ahtable::Result<()> {
    let mut table = Table::<u8>::with_slot_count(2)?;

    for round in 0..5u8 {
        for x in 0..1_000u32 {
            table.insert(x.to_le_bytes(), round)?;
        }
    }

    assert_eq!(1_000, table.len());
    assert_eq!(1_000, table.iter().count());
    assert!(table.values().all(|v| v == 4));

    Ok(())
}

#[test]
fn table_growth_long_keys() -> ahtable::Result<()> {
    let mut table = Table::<u16>::with_slot_count(1)?;

    let keys = (0..300u16)
        .map(|x| {
            let mut key = vec![b'p'; 100 + usize::from(x)];
            key.extend(x.to_be_bytes());
            key
        })
        .collect::<Vec<_>>();

    for (x, key) in (0u16..).zip(&keys) {
        table.insert(key, x)?;
    }

    for (x, key) in (0u16..).zip(&keys) {
        assert_eq!(Some(x), table.try_get(key));
    }

    Ok(())
}
