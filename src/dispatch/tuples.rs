use std::any::type_name;

use super::*;
use crate::storage::RawUnion;

macro_rules! raw_union {
    ($head: ident) => { RawUnion<$head, ()> };
    ($head: ident, $($rest: ident),+) => { RawUnion<$head, raw_union!($($rest),+)> };
}

macro_rules! impl_alternatives {
    ($($idx: tt: $ty: ident),+) => {
        impl<$($ty),+> sealed::Sealed for ($($ty,)+) {}

        impl<$($ty),+> Alternatives for ($($ty,)+) {
            type Storage = raw_union!($($ty),+);

            const LEN: usize = Self::DROP.len();

            const DROP: &'static [DropRow] = &[$(drop_row::<$ty>),+];
            const SWAP: &'static [SwapRow] = &[$(swap_row::<$ty>),+];
            const TYPE_NAMES: &'static [TypeNameRow] = &[$(type_name::<$ty>),+];
        }

        unsafe impl<A: Allocator, $($ty: MoveIn<A>),+> MoveRows<A> for ($($ty,)+) {
            const MOVE: &'static [MoveRow] = &[$(move_row::<$ty, A>),+];
            const MOVE_ASSIGN: &'static [MoveRow] = &[$(move_assign_row::<$ty, A>),+];
        }

        unsafe impl<A: Allocator, $($ty: CloneIn<A>),+> CloneRows<A> for ($($ty,)+) {
            const CLONE: &'static [CloneRow] = &[$(clone_row::<$ty, A>),+];
            const CLONE_ASSIGN: &'static [CloneRow] = &[$(clone_assign_row::<$ty, A>),+];
        }

        impl<$($ty: PartialEq),+> PartialEqRows for ($($ty,)+) {
            const EQ: &'static [EqRow] = &[$(eq_row::<$ty>),+];
        }

        impl<$($ty: Eq),+> EqRows for ($($ty,)+) {}

        impl<$($ty: PartialOrd),+> PartialOrdRows for ($($ty,)+) {
            const PARTIAL_CMP: &'static [PartialCmpRow] = &[$(partial_cmp_row::<$ty>),+];
        }

        impl<$($ty: Ord),+> OrdRows for ($($ty,)+) {
            const CMP: &'static [CmpRow] = &[$(cmp_row::<$ty>),+];
        }

        impl<$($ty: Hash),+> HashRows for ($($ty,)+) {
            const HASH: &'static [HashRow] = &[$(hash_row::<$ty>),+];
        }

        impl<$($ty: Debug),+> DebugRows for ($($ty,)+) {
            const DEBUG: &'static [FmtRow] = &[$(debug_row::<$ty>),+];
        }

        impl<$($ty: Display),+> DisplayRows for ($($ty,)+) {
            const DISPLAY: &'static [FmtRow] = &[$(display_row::<$ty>),+];
        }

        impl<V: Visitor, $($ty),+> Accept<V> for ($($ty,)+)
        where
            $(V: Visit<$ty>),+
        {
            #[inline]
            unsafe fn accept(index: usize, ptr: *const u8, visitor: &mut V) -> V::Output {
                match index {
                    $($idx => <V as Visit<$ty>>::visit(visitor, unsafe { &*ptr.cast::<$ty>() }),)+
                    _ => index_out_of_range(index, <Self as Alternatives>::LEN),
                }
            }
        }

        impl<V: Visitor, $($ty),+> AcceptMut<V> for ($($ty,)+)
        where
            $(V: VisitMut<$ty>),+
        {
            #[inline]
            unsafe fn accept_mut(index: usize, ptr: *mut u8, visitor: &mut V) -> V::Output {
                match index {
                    $($idx => <V as VisitMut<$ty>>::visit_mut(visitor, unsafe { &mut *ptr.cast::<$ty>() }),)+
                    _ => index_out_of_range(index, <Self as Alternatives>::LEN),
                }
            }
        }

        // Passing the whole parameter list as a single tt sidesteps "still repeating at this depth".
        impl_alternatives!(@positions [$($ty),+] $($idx $ty)+);
    };
    (@positions $all: tt $($idx: tt $ty: ident)+) => {
        $(impl_alternatives!(@position $all $idx $ty);)+
    };
    (@position [$($all: ident),+] $idx: tt $ty: ident) => {
        unsafe impl<$($all),+> Contains<$ty, Idx<$idx>> for ($($all,)+) {
            const INDEX: usize = $idx;
        }

        impl<$($all),+> At<$idx> for ($($all,)+) {
            type Output = $ty;
        }
    };
}

impl_alternatives!(0: T0);
impl_alternatives!(0: T0, 1: T1);
impl_alternatives!(0: T0, 1: T1, 2: T2);
impl_alternatives!(0: T0, 1: T1, 2: T2, 3: T3);
impl_alternatives!(0: T0, 1: T1, 2: T2, 3: T3, 4: T4);
impl_alternatives!(0: T0, 1: T1, 2: T2, 3: T3, 4: T4, 5: T5);
impl_alternatives!(0: T0, 1: T1, 2: T2, 3: T3, 4: T4, 5: T5, 6: T6);
impl_alternatives!(0: T0, 1: T1, 2: T2, 3: T3, 4: T4, 5: T5, 6: T6, 7: T7);
impl_alternatives!(0: T0, 1: T1, 2: T2, 3: T3, 4: T4, 5: T5, 6: T6, 7: T7, 8: T8);
impl_alternatives!(0: T0, 1: T1, 2: T2, 3: T3, 4: T4, 5: T5, 6: T6, 7: T7, 8: T8, 9: T9);
impl_alternatives!(
    0: T0, 1: T1, 2: T2, 3: T3, 4: T4, 5: T5, 6: T6, 7: T7, 8: T8, 9: T9, 10: T10
);
impl_alternatives!(
    0: T0, 1: T1, 2: T2, 3: T3, 4: T4, 5: T5, 6: T6, 7: T7, 8: T8, 9: T9, 10: T10, 11: T11
);
impl_alternatives!(
    0: T0, 1: T1, 2: T2, 3: T3, 4: T4, 5: T5, 6: T6, 7: T7, 8: T8, 9: T9, 10: T10, 11: T11,
    12: T12
);
impl_alternatives!(
    0: T0, 1: T1, 2: T2, 3: T3, 4: T4, 5: T5, 6: T6, 7: T7, 8: T8, 9: T9, 10: T10, 11: T11,
    12: T12, 13: T13
);
impl_alternatives!(
    0: T0, 1: T1, 2: T2, 3: T3, 4: T4, 5: T5, 6: T6, 7: T7, 8: T8, 9: T9, 10: T10, 11: T11,
    12: T12, 13: T13, 14: T14
);
impl_alternatives!(
    0: T0, 1: T1, 2: T2, 3: T3, 4: T4, 5: T5, 6: T6, 7: T7, 8: T8, 9: T9, 10: T10, 11: T11,
    12: T12, 13: T13, 14: T14, 15: T15
);
impl_alternatives!(
    0: T0, 1: T1, 2: T2, 3: T3, 4: T4, 5: T5, 6: T6, 7: T7, 8: T8, 9: T9, 10: T10, 11: T11,
    12: T12, 13: T13, 14: T14, 15: T15, 16: T16
);
impl_alternatives!(
    0: T0, 1: T1, 2: T2, 3: T3, 4: T4, 5: T5, 6: T6, 7: T7, 8: T8, 9: T9, 10: T10, 11: T11,
    12: T12, 13: T13, 14: T14, 15: T15, 16: T16, 17: T17
);
impl_alternatives!(
    0: T0, 1: T1, 2: T2, 3: T3, 4: T4, 5: T5, 6: T6, 7: T7, 8: T8, 9: T9, 10: T10, 11: T11,
    12: T12, 13: T13, 14: T14, 15: T15, 16: T16, 17: T17, 18: T18
);
impl_alternatives!(
    0: T0, 1: T1, 2: T2, 3: T3, 4: T4, 5: T5, 6: T6, 7: T7, 8: T8, 9: T9, 10: T10, 11: T11,
    12: T12, 13: T13, 14: T14, 15: T15, 16: T16, 17: T17, 18: T18, 19: T19
);
