pub struct SortedBag<K>(Vec<K>);

impl<K: Ord> SortedBag<K> {
    pub fn new() -> Self { Self(vec![]) }

    pub fn is_empty(&self) -> bool { self.0.is_empty() }
    pub fn len(&self) -> usize { self.0.len() }
    pub fn as_slice(&self) -> &[K] { &self.0 }

    pub fn insert_unique(&mut self, key: K) -> bool {
        match self.0.binary_search(&key) {
            Ok(_) => false,
            Err(i) => {
                self.0.insert(i, key);
                true
            }
        }
    }
    pub fn insert_equal(&mut self, key: K) {
        let i = self.0.partition_point(|x| x <= &key);
        self.0.insert(i, key);
    }

    pub fn remove_one(&mut self, key: &K) -> Option<K> {
        let i = self.0.partition_point(|x| x < key);
        (i < self.0.len() && &self.0[i] == key).then(|| self.0.remove(i))
    }
    pub fn pop_first(&mut self) -> Option<K> {
        (!self.0.is_empty()).then(|| self.0.remove(0))
    }
    pub fn pop_last(&mut self) -> Option<K> { self.0.pop() }

    pub fn contains(&self, key: &K) -> bool { self.count(key) > 0 }
    pub fn count(&self, key: &K) -> usize {
        self.0.iter().filter(|&x| x == key).count()
    }
    pub fn lower_bound(&self, key: &K) -> Option<&K> {
        self.0.iter().find(|&x| x >= key)
    }
    pub fn upper_bound(&self, key: &K) -> Option<&K> {
        self.0.iter().find(|&x| x > key)
    }
}

impl<K: Ord> Default for SortedBag<K> {
    fn default() -> Self { Self::new() }
}

#[test]
fn sanity_check() {
    let mut bag = SortedBag::new();
    assert!(bag.insert_unique(3));
    assert!(bag.insert_unique(1));
    assert!(!bag.insert_unique(3));
    bag.insert_equal(3);
    bag.insert_equal(2);
    assert_eq!(bag.as_slice(), [1, 2, 3, 3]);
    assert_eq!(bag.count(&3), 2);
    assert_eq!(bag.lower_bound(&2), Some(&2));
    assert_eq!(bag.upper_bound(&2), Some(&3));
    assert_eq!(bag.upper_bound(&3), None);
    assert_eq!(bag.remove_one(&3), Some(3));
    assert_eq!(bag.remove_one(&5), None);
    assert_eq!(bag.pop_first(), Some(1));
    assert_eq!(bag.pop_last(), Some(3));
    assert_eq!(bag.len(), 1);
}
