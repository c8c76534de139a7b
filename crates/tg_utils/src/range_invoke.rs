/// Invokes `$macro` once per tuple arity from `0` to `12`.
///
/// Each invocation receives the arity and the indexed type parameters.
///
/// # Example
///
/// ```ignore
/// range_invoke!(impl_tuple);
/// // expands to
/// impl_tuple!(0: []);
/// impl_tuple!(1: [0: P0]);
/// impl_tuple!(2: [0: P0, 1: P1]);
/// // ...
/// impl_tuple!(12: [0: P0, 1: P1, /* ... */ 11: P11]);
/// ```
#[macro_export]
macro_rules! range_invoke {
    ($macro:ident) => {
        $crate::range_invoke!(@step $macro, 0, [], [
            (1, 0, P0), (2, 1, P1), (3, 2, P2), (4, 3, P3),
            (5, 4, P4), (6, 5, P5), (7, 6, P6), (8, 7, P7),
            (9, 8, P8), (10, 9, P9), (11, 10, P10), (12, 11, P11)
        ]);
    };
    (@step $macro:ident, $n:literal, [$($idx:tt: $ty:ident),*], []) => {
        $macro!($n: [$($idx: $ty),*]);
    };
    (
        @step $macro:ident, $n:literal, [$($idx:tt: $ty:ident),*],
        [($next:literal, $nidx:tt, $nty:ident) $(, $rest:tt)*]
    ) => {
        $macro!($n: [$($idx: $ty),*]);
        $crate::range_invoke!(@step $macro, $next, [$($idx: $ty,)* $nidx: $nty], [$($rest),*]);
    };
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    macro_rules! record {
        ($n:literal: [$($idx:tt: $ty:ident),*]) => {
            OUT.with_borrow_mut(|out: &mut Vec<(usize, usize)>| {
                let params: &[&str] = &[$(stringify!($ty)),*];
                out.push(($n, params.len()));
            });
        };
    }

    std::thread_local! {
        static OUT: core::cell::RefCell<Vec<(usize, usize)>> = const { core::cell::RefCell::new(Vec::new()) };
    }

    #[test]
    fn arities_in_order() {
        fn run() {
            range_invoke!(record);
        }
        run();
        let out = OUT.with_borrow(Clone::clone);
        assert_eq!(out.len(), 13);
        for (i, (n, params)) in out.into_iter().enumerate() {
            assert_eq!(n, i);
            assert_eq!(params, i);
        }
    }
}
