use std::cmp::Ordering;

/// Strict weak ordering used to place keys.
///
/// Two keys are considered equal when neither is less than the other.
pub trait Compare<K: ?Sized> {
    fn compare(&self, l: &K, r: &K) -> Ordering;

    fn less(&self, l: &K, r: &K) -> bool {
        self.compare(l, r) == Ordering::Less
    }
}

/// The ordering given by `Ord`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Natural;

impl<K: Ord + ?Sized> Compare<K> for Natural {
    fn compare(&self, l: &K, r: &K) -> Ordering { l.cmp(r) }
}

impl<K: ?Sized, F> Compare<K> for F
where
    F: Fn(&K, &K) -> Ordering,
{
    fn compare(&self, l: &K, r: &K) -> Ordering { self(l, r) }
}

#[test]
fn closures_and_natural() {
    let rev = |l: &i32, r: &i32| r.cmp(l);
    assert!(rev.less(&3, &1));
    assert!(Natural.less(&1, &3));
    assert_eq!(Natural.compare("b", "a"), Ordering::Greater);
}
