//!
//! Set algebra over a possibly unbounded universe of keys.
//!
//! A `KeySet` is one of `All`, `None`, `Some(keys)` or `AllExceptSome(keys)`. The smart
//! constructors keep the representation canonical: an empty `Some` is `None` and an
//! empty `AllExceptSome` is `All`, so structural equality is set equality.

use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", content = "elements", rename_all = "camelCase")]
pub enum KeySet<T: Ord> {
    /// Every key.
    All,
    /// No key.
    None,
    /// Exactly the listed keys (never empty when built through `some`).
    Some(BTreeSet<T>),
    /// Every key but the listed ones (never empty when built through `all_except_some`).
    AllExceptSome(BTreeSet<T>),
}

impl<T: Ord + Clone> KeySet<T> {
    pub fn all() -> Self {
        KeySet::All
    }

    pub fn none() -> Self {
        KeySet::None
    }

    /// The listed keys; `None` if the list is empty.
    pub fn some(keys: impl IntoIterator<Item = T>) -> Self {
        let keys: BTreeSet<T> = keys.into_iter().collect();
        if keys.is_empty() {
            KeySet::None
        } else {
            KeySet::Some(keys)
        }
    }

    /// Every key except the listed ones; `All` if the list is empty.
    pub fn all_except_some(keys: impl IntoIterator<Item = T>) -> Self {
        let keys: BTreeSet<T> = keys.into_iter().collect();
        if keys.is_empty() {
            KeySet::All
        } else {
            KeySet::AllExceptSome(keys)
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, KeySet::All)
    }

    pub fn is_none(&self) -> bool {
        matches!(self, KeySet::None)
    }

    /// The listed keys of `Some` / `AllExceptSome`, empty otherwise.
    pub fn elements(&self) -> Vec<T> {
        match self {
            KeySet::Some(keys) | KeySet::AllExceptSome(keys) => keys.iter().cloned().collect(),
            KeySet::All | KeySet::None => Vec::new(),
        }
    }

    pub fn contains(&self, key: &T) -> bool {
        match self {
            KeySet::All => true,
            KeySet::None => false,
            KeySet::Some(keys) => keys.contains(key),
            KeySet::AllExceptSome(keys) => !keys.contains(key),
        }
    }

    /// The complement.
    pub fn invert(&self) -> Self {
        match self {
            KeySet::All => KeySet::None,
            KeySet::None => KeySet::All,
            KeySet::Some(keys) => KeySet::AllExceptSome(keys.clone()),
            KeySet::AllExceptSome(keys) => KeySet::Some(keys.clone()),
        }
    }

    /// Set difference: the keys of `self` that are not in `other`.
    pub fn remove(&self, other: &KeySet<T>) -> Self {
        match (self, other) {
            (KeySet::None, _) | (_, KeySet::All) => KeySet::None,
            (_, KeySet::None) => self.clone(),
            (KeySet::All, KeySet::Some(removed)) => {
                KeySet::all_except_some(removed.iter().cloned())
            }
            (KeySet::All, KeySet::AllExceptSome(kept)) => KeySet::some(kept.iter().cloned()),
            (KeySet::Some(keys), KeySet::Some(removed)) => {
                KeySet::some(keys.difference(removed).cloned())
            }
            (KeySet::Some(keys), KeySet::AllExceptSome(kept)) => {
                KeySet::some(keys.intersection(kept).cloned())
            }
            (KeySet::AllExceptSome(excluded), KeySet::Some(removed)) => {
                KeySet::all_except_some(excluded.union(removed).cloned())
            }
            (KeySet::AllExceptSome(excluded), KeySet::AllExceptSome(kept)) => {
                KeySet::some(kept.difference(excluded).cloned())
            }
        }
    }

    /// Keys in both sets.
    pub fn intersect(&self, other: &KeySet<T>) -> Self {
        self.remove(&other.invert())
    }

    /// Keys in either set.
    pub fn union(&self, other: &KeySet<T>) -> Self {
        self.invert().intersect(&other.invert()).invert()
    }
}
