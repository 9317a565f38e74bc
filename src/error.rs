use thiserror::Error;

/// A typed accessor asked for an alternative other than the one held.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Hash)]
#[error("Bad variant access: requested alternative {requested}, {}", describe_active(.active))]
pub struct BadVariantAccess {
    pub requested: usize,
    /// The alternative actually held, `None` if the variant was empty.
    pub active: Option<usize>,
}

fn describe_active(active: &Option<usize>) -> String {
    match active {
        Some(index) => format!("but alternative {index} is active"),
        None => "but the variant is empty".to_owned(),
    }
}
