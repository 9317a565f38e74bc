use std::fmt::Display;

use oneof::{visitor, Nil, Variant, Visit, VisitMut, Visitor};

use super::common::IndexOf;

type Value = Variant<(i32, String, f64)>;

/// Renders anything displayable, including the empty placeholder.
struct Render;

impl Visitor for Render {
    type Output = String;
}

impl<T: Display + ?Sized> Visit<T> for Render {
    fn visit(&mut self, value: &T) -> String {
        value.to_string()
    }
}

#[test]
fn visitor_sees_active_index() {
    let values = [
        Value::from_value(1i32),
        Value::from_value(String::from("one")),
        Value::from_value(1.0f64),
        Value::new(),
    ];

    let indices: Vec<_> = values.iter().map(|value| value.apply(IndexOf)).collect();
    assert_eq!(indices, [Some(0), Some(1), Some(2), None]);

    for value in &values[..3] {
        assert_eq!(value.apply_raw(IndexOf), value.index());
        assert_eq!(unsafe { value.apply_unchecked(IndexOf) }, value.index());
    }
}

#[test]
fn generic_visitor() {
    assert_eq!(Value::from_value(2.5f64).apply(Render), "2.5");
    assert_eq!(Value::new().apply(Render), "");
    assert_eq!(Value::new().apply_or(Render, "unset"), "unset");
    assert_eq!(Value::from_value(3i32).apply_or(Render, "unset"), "3");
}

#[test]
fn explicit_result_type() {
    let index: Option<u64> = Value::from_value(String::new())
        .apply_as::<Option<usize>, _>(IndexOf)
        .map(|index| index as u64);
    assert_eq!(index, Some(1));

    let wide = Value::from_value(4i32).apply_as::<i64, _>(visitor! {
        |n: &i32| *n,
        |s: &String| s.len() as i32,
        |x: &f64| *x as i32,
        |_: &Nil| 0,
    });
    assert_eq!(wide, 4i64);
}

#[test]
fn borrowed_visitor_accumulates() {
    struct Sum(f64);

    impl Visitor for Sum {
        type Output = ();
    }

    impl Visit<i32> for Sum {
        fn visit(&mut self, value: &i32) {
            self.0 += f64::from(*value);
        }
    }

    impl Visit<String> for Sum {
        fn visit(&mut self, value: &String) {
            self.0 += value.len() as f64;
        }
    }

    impl Visit<f64> for Sum {
        fn visit(&mut self, value: &f64) {
            self.0 += value;
        }
    }

    impl Visit<Nil> for Sum {
        fn visit(&mut self, _: &Nil) {}
    }

    let mut sum = Sum(0.0);
    for value in [
        Value::from_value(1i32),
        Value::from_value(String::from("four")),
        Value::from_value(0.5f64),
        Value::new(),
    ] {
        value.apply(&mut sum);
    }
    assert_eq!(sum.0, 5.5);
}

#[test]
fn mutable_visit() {
    let mut value = Value::from_value(String::from("grow"));

    let grown = value.apply_mut(visitor! {
        |n: &mut i32| { *n += 1; true },
        |s: &mut String| { s.push_str("n"); true },
        |x: &mut f64| { *x *= 2.0; true },
        |_: &mut Nil| false,
    });
    assert!(grown);
    assert_eq!(value.get::<String, _>().unwrap(), "grown");

    let mut empty = Value::new();
    let mut doubler = visitor! {
        |n: &mut i32| *n *= 2,
        |s: &mut String| s.push_str(&s.clone()),
        |x: &mut f64| *x *= 2.0,
        |_: &mut Nil| (),
    };

    empty.apply_mut(&mut doubler);
    assert!(empty.is_empty());

    let mut number = Value::from_value(21i32);
    number.apply_raw_mut(&mut doubler);
    assert_eq!(number.get::<i32, _>(), Ok(&42));
}

#[test]
fn raw_visit_needs_no_placeholder_arm() {
    struct Width;

    impl Visitor for Width {
        type Output = usize;
    }

    impl Visit<i32> for Width {
        fn visit(&mut self, value: &i32) -> usize {
            value.to_string().len()
        }
    }

    impl Visit<String> for Width {
        fn visit(&mut self, value: &String) -> usize {
            value.len()
        }
    }

    impl VisitMut<i32> for Width {
        fn visit_mut(&mut self, value: &mut i32) -> usize {
            *value = -*value;
            value.to_string().len()
        }
    }

    impl VisitMut<String> for Width {
        fn visit_mut(&mut self, value: &mut String) -> usize {
            value.push('!');
            value.len()
        }
    }

    let text = Variant::<(i32, String)>::from_value(String::from("x"));
    assert_eq!(text.apply_raw(Width), 1);
    assert_eq!(unsafe { text.apply_unchecked(Width) }, 1);

    let mut number = Variant::<(i32, String)>::from_value(123i32);
    assert_eq!(number.apply_raw_mut(Width), 4);
    assert_eq!(number.get::<i32, _>(), Ok(&-123));
}
