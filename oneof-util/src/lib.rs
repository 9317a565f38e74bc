use std::mem::MaybeUninit;

/// Returns a pointer to the start of `slot` cast to `T`.
///
/// Meant for type-punned storage that is known to be suitably sized and aligned for `T`,
/// the caller is responsible for only ever reading a `T` that was previously written there.
#[inline]
pub const fn cast_slot<S, T>(slot: &MaybeUninit<S>) -> *const T {
    slot.as_ptr().cast()
}

/// Mutable counterpart of [`cast_slot`].
#[inline]
pub const fn cast_slot_mut<S, T>(slot: &mut MaybeUninit<S>) -> *mut T {
    slot.as_mut_ptr().cast()
}

// Formatting helpers
// Remove once [debug_closure_helpers](https://github.com/rust-lang/rust/issues/117729) is stabilized.

pub struct FormatterFn<F>(pub F)
where
    F: Fn(&mut std::fmt::Formatter<'_>) -> std::fmt::Result;

impl<F> std::fmt::Debug for FormatterFn<F>
where
    F: Fn(&mut std::fmt::Formatter<'_>) -> std::fmt::Result,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        (self.0)(f)
    }
}

impl<F> std::fmt::Display for FormatterFn<F>
where
    F: Fn(&mut std::fmt::Formatter<'_>) -> std::fmt::Result,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        (self.0)(f)
    }
}

pub const fn fmt_from_fn<F>(f: F) -> FormatterFn<F>
where
    F: Fn(&mut std::fmt::Formatter<'_>) -> std::fmt::Result,
{
    FormatterFn(f)
}

/// Writes the leading whitespace for one line of nested, human-readable output.
///
/// A negative `level` suppresses the indentation (the caller is continuing a line),
/// as does a negative `spaces_per_level` (the whole output is on one line).
pub fn write_indent(out: &mut impl std::fmt::Write, level: i32, spaces_per_level: i32) -> std::fmt::Result {
    if level <= 0 || spaces_per_level <= 0 {
        return Ok(());
    }

    for _ in 0..level.saturating_mul(spaces_per_level) {
        out.write_char(' ')?;
    }

    Ok(())
}
