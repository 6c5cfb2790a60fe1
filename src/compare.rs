use std::fmt::{Debug, Formatter};

/// Strict weak order over priority values.
///
/// `less(a, b)` returns `true` iff `a` orders strictly before `b`. The entry whose value is
/// not less than any other sits at the top of a `PriorityMap`.
pub trait Compare<V: ?Sized> {
    /// Is `a` strictly less than `b`?
    fn less(&self, a: &V, b: &V) -> bool;
}

/// Natural ascending order. The maximum is at the top.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Less;

impl<V: Ord + ?Sized> Compare<V> for Less {
    fn less(&self, a: &V, b: &V) -> bool {
        a < b
    }
}

/// Descending order. The minimum is at the top.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Greater;

impl<V: Ord + ?Sized> Compare<V> for Greater {
    fn less(&self, a: &V, b: &V) -> bool {
        a > b
    }
}

/// Comparator built from a closure `Fn(&V, &V) -> bool`
#[derive(Clone, Copy, Default)]
pub struct FnCompare<F>(pub F);

impl<F> Debug for FnCompare<F> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("FnCompare")
    }
}

impl<V: ?Sized, F: Fn(&V, &V) -> bool> Compare<V> for FnCompare<F> {
    fn less(&self, a: &V, b: &V) -> bool {
        (self.0)(a, b)
    }
}

impl<V: ?Sized, C: Compare<V> + ?Sized> Compare<V> for &C {
    fn less(&self, a: &V, b: &V) -> bool {
        (**self).less(a, b)
    }
}

#[cfg(test)]
mod test {
    use crate::compare::{Compare, FnCompare, Greater, Less};

    #[test]
    fn test_less_and_greater() {
        assert!(Less.less(&1, &2));
        assert!(!Less.less(&2, &2));
        assert!(Greater.less(&3, &2));
        assert!(!Greater.less(&2, &2));
        assert!(Less.less("abc", "abd"));
    }

    #[test]
    fn test_fn_compare() {
        // Order by absolute value
        let cmp = FnCompare(|a: &i32, b: &i32| a.abs() < b.abs());
        assert!(cmp.less(&-1, &2));
        assert!(!cmp.less(&-3, &2));
        assert!((&cmp).less(&0, &-7));
    }
}
