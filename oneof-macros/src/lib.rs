mod parse;
mod visitor;

/// Builds a visitor out of closures, one per visited type.
///
/// Every closure takes a single parameter annotated as `&T` (implementing `Visit<T>`) or
/// `&mut T` (implementing `VisitMut<T>`), and all closures must return the same type, which
/// becomes the visitor's `Output`. The visited types must be nameable outside of any generic
/// scope.
///
/// ```ignore
/// let describe = visitor! {
///     |n: &i32| format!("int {n}"),
///     |s: &String| format!("text {s:?}"),
///     |_: &Nil| String::from("nothing"),
/// };
/// ```
#[proc_macro]
pub fn visitor(ts: proc_macro::TokenStream) -> proc_macro::TokenStream {
    visitor::visitor_impl(ts)
}
