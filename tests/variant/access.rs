use oneof::{BadVariantAccess, Variant};

type IntOrText = Variant<(i64, String)>;

#[test]
fn int_then_text_then_int() {
    let mut value = IntOrText::from_value(1i64);
    assert_eq!(value.index(), Some(0));
    assert_eq!(value.get::<i64, _>(), Ok(&1));

    value.set(String::from("hi"));
    assert_eq!(value.index(), Some(1));
    assert_eq!(
        value.get::<i64, _>(),
        Err(BadVariantAccess {
            requested: 0,
            active: Some(1)
        })
    );
    assert_eq!(value.get::<String, _>().map(String::as_str), Ok("hi"));

    value.emplace(2i64);
    assert_eq!(value.index(), Some(0));
    assert_eq!(value.get::<i64, _>(), Ok(&2));
}

#[test]
fn constructed_value_matches_direct_construction() {
    type Cell = Variant<(i32, String, Vec<u8>)>;

    let int = Cell::from_value(-4i32);
    assert_eq!(int.index(), Some(0));
    assert_eq!(int.get_at::<0>(), Ok(&-4));

    let text = Cell::from_value(String::from("abc"));
    assert_eq!(text.index(), Some(1));
    assert_eq!(text.get::<String, _>(), Ok(&String::from("abc")));

    let bytes = Cell::from_index::<2>(vec![1, 2, 3]);
    assert_eq!(bytes.index(), Some(2));
    assert_eq!(bytes.get_if::<Vec<u8>, _>(), Some(&vec![1, 2, 3]));
    assert_eq!(bytes.get_if::<String, _>(), None);

    for cell in [&int, &text, &bytes] {
        let held = (0..Cell::ALTERNATIVES)
            .filter(|&index| cell.holds_index(index))
            .count();
        assert_eq!(held, 1);
        assert!(!cell.is_empty());
    }
}

#[test]
fn empty_holds_nothing() {
    let empty = IntOrText::new();
    assert!(empty.is_empty());
    assert_eq!(empty.index(), None);
    assert!(!empty.holds::<i64, _>());
    assert!(!empty.holds::<String, _>());
    assert_eq!(empty.active_type_name(), None);
    assert_eq!(
        empty.get::<String, _>(),
        Err(BadVariantAccess {
            requested: 1,
            active: None
        })
    );
}

#[test]
fn duplicate_alternatives_by_index() {
    type Pair = Variant<(u16, u16, char)>;

    let mut pair = Pair::from_index::<1>(9);
    assert_eq!(pair.index(), Some(1));
    assert_eq!(pair.get_at::<0>().ok(), None);
    assert_eq!(pair.get_at::<1>(), Ok(&9));

    pair.emplace_at::<0>(3);
    assert_eq!(pair.get_if_at::<0>(), Some(&3));
    assert_eq!(pair.get_if_at::<1>(), None);

    // The unique alternative is still reachable by type.
    pair.set('x');
    assert_eq!(pair.get::<char, _>(), Ok(&'x'));
}

#[test]
fn mutable_access() {
    let mut value = IntOrText::from_value(String::from("ab"));

    value.get_mut::<String, _>().unwrap().push('c');
    value.get_if_mut::<String, _>().unwrap().push('d');
    value.get_at_mut::<1>().unwrap().push('e');
    value.get_if_at_mut::<1>().unwrap().push('f');
    assert_eq!(value.get::<String, _>().unwrap(), "abcdef");

    assert!(value.get_mut::<i64, _>().is_err());
    assert!(value.get_at_mut::<0>().is_err());
    assert!(value.get_if_mut::<i64, _>().is_none());

    unsafe {
        value.get_unchecked_mut::<String, _>().clear();
        assert_eq!(value.get_unchecked::<String, _>(), "");
    }
}

#[test]
fn conversions() {
    let mut value = IntOrText::new();

    value.assign_to::<String, _>("converted");
    assert_eq!(value.get::<String, _>().unwrap(), "converted");

    value.assign_to::<i64, _>(7u8);
    assert_eq!(value.get::<i64, _>(), Ok(&7));

    let value = match value.into_inner::<String, _>() {
        Ok(_) => panic!("should still hold an integer"),
        Err(value) => value,
    };
    assert_eq!(value.into_inner::<i64, _>().ok(), Some(7));
}

#[test]
fn type_names() {
    let value = IntOrText::from_value(String::from("named"));
    assert_eq!(value.active_type_name(), Some(std::any::type_name::<String>()));
    assert_eq!(IntOrText::new().active_type_name(), None);
}

#[test]
fn printing() {
    let value = IntOrText::from_value(42i64);

    let mut out = String::new();
    value.print(&mut out, 2, 3).unwrap();
    assert_eq!(out, "      42\n");

    out.clear();
    value.print(&mut out, -1, 4).unwrap();
    assert_eq!(out, "42\n");

    out.clear();
    value.print(&mut out, 1, -1).unwrap();
    assert_eq!(out, "42");

    out.clear();
    IntOrText::new().print(&mut out, 1, 2).unwrap();
    assert_eq!(out, "");
}

#[test]
fn wide_lists() {
    type Wide = Variant<(
        u8,
        u16,
        u32,
        u64,
        i8,
        i16,
        i32,
        i64,
        f32,
        f64,
        bool,
        char,
        (),
        String,
        Vec<u8>,
        Option<u8>,
        [u8; 32],
        &'static str,
        Box<str>,
        usize,
    )>;

    assert_eq!(Wide::ALTERNATIVES, 20);
    assert!(std::mem::size_of::<Wide>() >= 32);

    let mut wide = Wide::from_value([7u8; 32]);
    assert_eq!(wide.index(), Some(16));

    wide.set("static");
    assert_eq!(wide.get_at::<17>(), Ok(&"static"));

    wide.emplace_at_with::<19>(|| 19);
    assert_eq!(wide.index(), Some(19));
    assert_eq!(wide.clone(), Wide::from_value(19usize));
}
