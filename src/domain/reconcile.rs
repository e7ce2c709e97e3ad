use std::collections::BTreeSet;

/// Outcome of diffing a desired entry list against the keys currently stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetDiff<K, T> {
    /// Entries whose key exists in the current set.
    pub update: Vec<(K, T)>,
    /// Entries without a key.
    pub insert: Vec<T>,
    /// Current keys no desired entry refers to.
    pub delete: Vec<K>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffError<K> {
    /// A desired entry names a key that is not in the current set.
    Unknown(K),
    /// Two desired entries name the same key.
    Duplicate(K),
}

/// Partitions `desired` so that applying the result turns the current set
/// into exactly the desired one.
pub fn diff_by_key<K, T, F>(
    current: impl IntoIterator<Item = K>,
    desired: Vec<T>,
    key_of: F,
) -> Result<SetDiff<K, T>, DiffError<K>>
where
    K: Ord + Copy,
    F: Fn(&T) -> Option<K>,
{
    let current: BTreeSet<K> = current.into_iter().collect();
    let mut remaining = current.clone();
    let mut update = Vec::new();
    let mut insert = Vec::new();

    for entry in desired {
        match key_of(&entry) {
            Some(key) if remaining.remove(&key) => update.push((key, entry)),
            Some(key) if current.contains(&key) => return Err(DiffError::Duplicate(key)),
            Some(key) => return Err(DiffError::Unknown(key)),
            None => insert.push(entry),
        }
    }

    Ok(SetDiff {
        update,
        insert,
        delete: remaining.into_iter().collect(),
    })
}
