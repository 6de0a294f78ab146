//! A prefix trie keyed by fURI segments.
//!
//! The first key of every entry is the fURI's head (scheme, authority and root slash), followed
//! by its path segments, so `/a/b`, `a/b` and `//host/a/b` occupy distinct slots. A branch adds a
//! trailing marker key. Coefficients and queries are not part of the key.

use std::collections::BTreeMap;

use fhatos_furi::Furi;

const BRANCH: &str = "/";

fn head(id: &Furi) -> String {
    let mut head = id.with_path("").with_coefficient("").no_query().to_string();
    if id.sprefix() && !head.ends_with('/') {
        head.push('/');
    }
    head
}

fn keys(id: &Furi) -> Vec<String> {
    let mut keys = vec![head(id)];
    keys.extend(id.segments().iter().cloned());
    if id.spostfix() && id.has_path() {
        keys.push(BRANCH.to_string());
    }
    keys
}

/// A prefix trie keyed by fURI segments.
///
/// # Example
///
/// ```rust
/// use fhatos_core::FuriTrie;
/// use fhatos_furi::furi;
///
/// let mut trie: FuriTrie<i32> = FuriTrie::new();
/// trie.insert(&furi!("/a/b"), 1);
/// trie.insert(&furi!("/a/b/c"), 2);
///
/// assert_eq!(trie.get(&furi!("/a/b")), Some(&1));
///
/// let (id, value, suffix) = trie.find_ancestor(&furi!("/a/b/c/d")).unwrap();
/// assert_eq!(*id, furi!("/a/b/c"));
/// assert_eq!(*value, 2);
/// assert_eq!(suffix, vec!["d".to_string()]);
/// ```
#[derive(Debug, Clone)]
pub struct FuriTrie<T> {
    value: Option<(Furi, T)>,
    children: BTreeMap<String, FuriTrie<T>>,
}

impl<T> Default for FuriTrie<T> {
    fn default() -> Self {
        Self {
            value: None,
            children: BTreeMap::new(),
        }
    }
}

impl<T> FuriTrie<T> {
    pub fn new() -> Self {
        Self::default()
    }

    fn get_or_create_node(&mut self, keys: &[String]) -> &mut FuriTrie<T> {
        let mut current = self;
        for key in keys {
            current = current.children.entry(key.clone()).or_default();
        }
        current
    }

    fn get_node(&self, keys: &[String]) -> Option<&FuriTrie<T>> {
        let mut current = self;
        for key in keys {
            current = current.children.get(key)?;
        }
        Some(current)
    }

    fn get_node_mut(&mut self, keys: &[String]) -> Option<&mut FuriTrie<T>> {
        let mut current = self;
        for key in keys {
            current = current.children.get_mut(key)?;
        }
        Some(current)
    }

    /// Insert a value at `id`. Returns the previous value if any.
    pub fn insert(&mut self, id: &Furi, value: T) -> Option<T> {
        let node = self.get_or_create_node(&keys(id));
        node.value
            .replace((id.no_query(), value))
            .map(|(_, previous)| previous)
    }

    /// Remove and return the value at exactly `id`. Children remain.
    pub fn remove(&mut self, id: &Furi) -> Option<T> {
        self.get_node_mut(&keys(id))?
            .value
            .take()
            .map(|(_, value)| value)
    }

    pub fn get(&self, id: &Furi) -> Option<&T> {
        self.get_node(&keys(id))?.value.as_ref().map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, id: &Furi) -> Option<&mut T> {
        self.get_node_mut(&keys(id))?
            .value
            .as_mut()
            .map(|(_, v)| v)
    }

    pub fn contains(&self, id: &Furi) -> bool {
        self.get(id).is_some()
    }

    /// Count of values (not nodes).
    pub fn len(&self) -> usize {
        let own = usize::from(self.value.is_some());
        own + self.children.values().map(FuriTrie::len).sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_none() && self.children.values().all(FuriTrie::is_empty)
    }

    /// The deepest stored node-form ancestor of `id` (including `id` itself), with the segments
    /// left over below it.
    pub fn find_ancestor(&self, id: &Furi) -> Option<(&Furi, &T, Vec<String>)> {
        let keys = keys(&id.as_node());
        let mut current = self;
        let mut last: Option<(&Furi, &T, usize)> = None;
        for (depth, key) in keys.iter().enumerate() {
            match current.children.get(key) {
                Some(child) => {
                    current = child;
                    if let Some((stored, value)) = &child.value {
                        last = Some((stored, value, depth + 1));
                    }
                }
                None => break,
            }
        }
        last.map(|(stored, value, depth)| (stored, value, keys[depth..].to_vec()))
    }

    /// Iterate over all `(id, value)` pairs in key order.
    pub fn iter(&self) -> FuriTrieIter<'_, T> {
        FuriTrieIter { stack: vec![self] }
    }

    /// Every stored entry whose id matches `pattern`.
    pub fn matching<'a>(&'a self, pattern: &'a Furi) -> impl Iterator<Item = (&'a Furi, &'a T)> {
        self.iter().filter(move |(id, _)| id.matches(pattern))
    }
}

/// Iterator over `(&Furi, &T)` pairs in a [`FuriTrie`].
pub struct FuriTrieIter<'a, T> {
    stack: Vec<&'a FuriTrie<T>>,
}

impl<'a, T> Iterator for FuriTrieIter<'a, T> {
    type Item = (&'a Furi, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(node) = self.stack.pop() {
            self.stack.extend(node.children.values().rev());
            if let Some((id, value)) = &node.value {
                return Some((id, value));
            }
        }
        None
    }
}
