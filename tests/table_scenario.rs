use ahtable::Table;
use test_log::test;

#[test]
fn table_scenario_small() -> ahtable::Result<()> {
    let mut table = Table::<u64>::with_slot_count(4)?;

    table.get("a")?.set(1);
    table.get("ab")?.set(2);
    table.get("b")?.set(3);

    assert_eq!(3, table.len());
    assert_eq!(Some(1), table.try_get("a"));
    assert_eq!(Some(2), table.try_get("ab"));
    assert_eq!(Some(3), table.try_get("b"));
    assert_eq!(None, table.try_get("c"));

    Ok(())
}

#[test]
fn table_scenario_1000_keys() -> ahtable::Result<()> {
    let mut table = Table::<u64>::new();
    assert_eq!(512, table.growth_threshold());

    for x in 0..1_000u64 {
        table.get(format!("key-{x}"))?.set(x);
    }

    assert_eq!(1_000, table.len());
    assert!(table.slot_count() > ahtable::DEFAULT_SLOT_COUNT);

    for x in 0..1_000u64 {
        assert_eq!(Some(x), table.try_get(format!("key-{x}")), "key-{x} not found");
    }

    Ok(())
}

#[test]
fn table_round_trip() -> ahtable::Result<()> {
    let mut table = Table::<u32>::with_slot_count(1)?;

    for x in 0..200u32 {
        let key = x.to_string();

        table.get(&key)?.set(x * 3);

        // Reads do not move anything
        for _ in 0..3 {
            assert_eq!(Some(x * 3), table.try_get(&key));
        }
    }

    Ok(())
}

#[test]
fn table_get_after_growth_points_to_new_location() -> ahtable::Result<()> {
    let mut table = ahtable::Config::new()
        .slot_count(1)
        .max_load_factor(1.0)
        .build::<u64>()?;

    // Every insert here triggers growth, the returned reference must still
    // point at the inserted key
    for x in 0..64u64 {
        let slot_count = table.slot_count();

        table.get(x.to_be_bytes())?.set(x + 100);

        if table.len() >= slot_count {
            assert!(table.slot_count() > slot_count);
        }
        assert_eq!(Some(x + 100), table.try_get(x.to_be_bytes()));
    }

    Ok(())
}
