use ahtable::Table;
use test_log::test;

#[test]
fn table_tags_zeroed_on_create() -> ahtable::Result<()> {
    assert_eq!((0, 0, 0), Table::<u64>::new().tags());
    assert_eq!((0, 0, 0), Table::<u64>::with_slot_count(17)?.tags());
    Ok(())
}

#[test]
fn table_tags_untouched_by_operations() -> ahtable::Result<()> {
    let mut table = Table::<u64>::with_slot_count(1)?;
    table.set_flag(0xAB);
    table.set_c0(0x00);
    table.set_c1(0xFF);

    for x in 0..1_000u64 {
        table.insert(x.to_be_bytes(), x)?;
    }
    assert_eq!((0xAB, 0x00, 0xFF), table.tags());

    table.remove(5u64.to_be_bytes());
    assert_eq!((0xAB, 0x00, 0xFF), table.tags());

    let copy = table.dup()?;
    assert_eq!((0xAB, 0x00, 0xFF), copy.tags());

    table.clear();
    assert_eq!((0xAB, 0x00, 0xFF), table.tags());

    assert_eq!(0xAB, table.flag());
    assert_eq!(0x00, table.c0());
    assert_eq!(0xFF, table.c1());

    Ok(())
}
