//! A miniature row binder that keeps typed column values by name, the way a database cursor
//! layer would use variants.

use std::collections::BTreeMap;

use oneof::{Nil, Variant, Visit, Visitor};

type Column = Variant<(i64, f64, String, Vec<u8>)>;

#[derive(Debug, Default, Clone, PartialEq)]
struct Row {
    columns: BTreeMap<String, Column>,
}

impl Row {
    fn bind<T, I>(&mut self, name: &str, value: T)
    where
        (i64, f64, String, Vec<u8>): oneof::Contains<T, I>,
    {
        self.columns.entry(name.to_owned()).or_default().set(value);
    }

    fn unset(&mut self, name: &str) {
        if let Some(column) = self.columns.get_mut(name) {
            column.reset();
        }
    }

    /// Concatenates the named columns into a byte key, unset columns become a single zero byte.
    fn search_key(&self, names: &[&str]) -> Vec<u8> {
        let mut encoder = KeyEncoder(Vec::new());
        for name in names {
            match self.columns.get(*name) {
                Some(column) => column.apply(&mut encoder),
                None => encoder.visit(&Nil),
            }
        }
        encoder.0
    }
}

struct KeyEncoder(Vec<u8>);

impl Visitor for KeyEncoder {
    type Output = ();
}

impl Visit<i64> for KeyEncoder {
    fn visit(&mut self, value: &i64) {
        self.0.push(1);
        self.0.extend_from_slice(&value.to_be_bytes());
    }
}

impl Visit<f64> for KeyEncoder {
    fn visit(&mut self, value: &f64) {
        self.0.push(2);
        self.0.extend_from_slice(&value.to_bits().to_be_bytes());
    }
}

impl Visit<String> for KeyEncoder {
    fn visit(&mut self, value: &String) {
        self.0.push(3);
        self.0.extend_from_slice(value.as_bytes());
        self.0.push(0);
    }
}

impl Visit<Vec<u8>> for KeyEncoder {
    fn visit(&mut self, value: &Vec<u8>) {
        self.0.push(4);
        self.0.extend_from_slice(&(value.len() as u32).to_be_bytes());
        self.0.extend_from_slice(value);
    }
}

impl Visit<Nil> for KeyEncoder {
    fn visit(&mut self, _: &Nil) {
        self.0.push(0);
    }
}

#[test]
fn bound_columns_build_key() {
    let mut row = Row::default();
    row.bind("id", 258i64);
    row.bind("name", String::from("ab"));
    row.bind("blob", vec![9u8]);

    assert_eq!(
        row.search_key(&["id", "name", "missing", "blob"]),
        [
            &[1, 0, 0, 0, 0, 0, 0, 1, 2][..],
            &[3, b'a', b'b', 0],
            &[0],
            &[4, 0, 0, 0, 1, 9],
        ]
        .concat()
    );
}

#[test]
fn rebinding_changes_type() {
    let mut row = Row::default();
    row.bind("score", 1i64);
    row.bind("score", 0.5f64);

    let score = &row.columns["score"];
    assert_eq!(score.get::<f64, _>(), Ok(&0.5));
    assert_eq!(row.search_key(&["score"])[0], 2);

    row.unset("score");
    assert!(row.columns["score"].is_empty());
    assert_eq!(row.search_key(&["score"]), [0]);
}

#[test]
fn rows_compare_by_columns() {
    let mut first = Row::default();
    first.bind("a", String::from("x"));

    let mut second = first.clone();
    assert_eq!(first, second);

    second.bind("a", String::from("y"));
    assert_ne!(first, second);
    assert!(first.columns["a"] < second.columns["a"]);
}
