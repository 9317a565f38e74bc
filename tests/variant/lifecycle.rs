use oneof::Variant;
use test_util::{LiveCount, Tracked};

type Slot = Variant<(Tracked, String, u32)>;

#[test]
fn starts_empty_or_with_first_default() {
    assert!(Slot::new().is_empty());
    assert!(Slot::default().is_empty());

    let first = Variant::<(String, u32)>::new_first_default();
    assert_eq!(first.index(), Some(0));
    assert_eq!(first.get::<String, _>().unwrap(), "");
}

#[test]
fn emplace_twice_leaves_one_instance() {
    let live = LiveCount::new();
    let mut slot = Slot::new();

    slot.emplace(Tracked::new(5, &live));
    assert_eq!(live.get(), 1);

    slot.emplace(Tracked::new(5, &live));
    assert_eq!(live.get(), 1);
    assert_eq!(slot, Slot::from_value(Tracked::new(5, &live)));
    assert_eq!(live.get(), 1);

    drop(slot);
    assert_eq!(live.get(), 0);
}

#[test]
fn set_assigns_in_place_or_replaces() {
    let live = LiveCount::new();
    let mut slot = Slot::from_value(7u32);

    slot.set(Tracked::new(1, &live));
    assert_eq!(live.get(), 1);

    slot.set(Tracked::new(2, &live));
    assert_eq!(live.get(), 1);
    assert_eq!(slot.get::<Tracked, _>().map(Tracked::value), Ok(2));

    slot.set(String::from("replaced"));
    assert_eq!(live.get(), 0);
    assert_eq!(slot.index(), Some(1));
}

#[test]
fn reset_and_take() {
    let live = LiveCount::new();
    let mut slot = Slot::from_value(Tracked::new(3, &live));

    let taken = slot.take();
    assert!(slot.is_empty());
    assert_eq!(taken.get::<Tracked, _>().map(Tracked::value), Ok(3));
    assert_eq!(live.get(), 1);

    let mut taken = taken;
    taken.reset();
    assert!(taken.is_empty());
    assert_eq!(live.get(), 0);

    // Resetting twice is harmless.
    taken.reset();
    assert_eq!(live.get(), 0);

    // Empty is not sticky.
    taken.emplace(9u32);
    assert_eq!(taken.get::<u32, _>(), Ok(&9));
}

#[test]
fn clone_round_trip() {
    let live = LiveCount::new();
    let original = Slot::from_value(Tracked::new(11, &live));

    let copy = original.clone();
    assert_eq!(live.get(), 2);
    assert_eq!(copy.index(), original.index());
    assert_eq!(copy, original);

    let empty_copy = Slot::new().clone();
    assert!(empty_copy.is_empty());
}

#[test]
fn clone_from_reuses_or_replaces() {
    let live = LiveCount::new();
    let source = Slot::from_value(Tracked::new(1, &live));

    let mut same = Slot::from_value(Tracked::new(2, &live));
    same.clone_from(&source);
    assert_eq!(same.get::<Tracked, _>().map(Tracked::value), Ok(1));
    assert_eq!(live.get(), 2);

    let mut different = Slot::from_value(String::from("text"));
    different.clone_from(&source);
    assert_eq!(different, source);
    assert_eq!(live.get(), 3);

    different.clone_from(&Slot::new());
    assert!(different.is_empty());
    assert_eq!(live.get(), 2);
}

#[test]
fn move_leaves_source_empty() {
    let live = LiveCount::new();
    let mut source = Slot::from_value(Tracked::new(8, &live));
    let mut target = Slot::from_value(String::from("old"));

    target.move_from(&mut source);
    assert!(source.is_empty());
    assert_eq!(target.get::<Tracked, _>().map(Tracked::value), Ok(8));
    assert_eq!(live.get(), 1);

    target.move_from(&mut source);
    assert!(target.is_empty());
    assert_eq!(live.get(), 0);
}

#[test]
fn swap_same_alternative() {
    let live = LiveCount::new();
    let mut x = Slot::from_value(Tracked::new(1, &live));
    let mut y = Slot::from_value(Tracked::new(2, &live));

    x.swap(&mut y);
    assert_eq!(x.get::<Tracked, _>().map(Tracked::value), Ok(2));
    assert_eq!(y.get::<Tracked, _>().map(Tracked::value), Ok(1));
    assert_eq!(live.get(), 2);
}

#[test]
fn swap_different_alternatives_and_empty() {
    let live = LiveCount::new();
    let mut x = Slot::from_value(Tracked::new(1, &live));
    let mut y = Slot::from_value(String::from("y"));
    let mut empty = Slot::new();

    x.swap(&mut y);
    assert_eq!(x.get::<String, _>().unwrap(), "y");
    assert_eq!(y.get::<Tracked, _>().map(Tracked::value), Ok(1));

    y.swap(&mut empty);
    assert!(y.is_empty());
    assert_eq!(empty.get::<Tracked, _>().map(Tracked::value), Ok(1));
    assert_eq!(live.get(), 1);
}

#[test]
fn always_exactly_one_or_empty() {
    let live = LiveCount::new();
    let mut slot = Slot::new();

    let check = |slot: &Slot| {
        let held = [
            slot.holds::<Tracked, _>(),
            slot.holds::<String, _>(),
            slot.holds::<u32, _>(),
        ]
        .into_iter()
        .filter(|&held| held)
        .count();
        assert_eq!(held, usize::from(!slot.is_empty()));
    };

    check(&slot);
    slot.emplace(Tracked::new(0, &live));
    check(&slot);
    slot.emplace(1u32);
    check(&slot);
    slot.set(String::new());
    check(&slot);
    slot.reset();
    check(&slot);
}
