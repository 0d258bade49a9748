use crate::regeneration::domain::ReleaseId;
use std::collections::BTreeSet;

/// The set of release identifiers to be processed in one run.
///
/// Set semantics: duplicates from candidate construction are eliminated
/// here, before processing, so every candidate produces exactly one
/// outcome. The group is built once per run and only ever replaced
/// wholesale, never mutated element-by-element. Iteration order is the
/// identifier order, which keeps downstream logs stable; the pipeline
/// itself guarantees no ordering between releases.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReleaseGroup {
    ids: BTreeSet<ReleaseId>,
}

impl ReleaseGroup {
    pub fn new(ids: impl IntoIterator<Item = ReleaseId>) -> Self {
        Self {
            ids: ids.into_iter().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn contains(&self, id: &ReleaseId) -> bool {
        self.ids.contains(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ReleaseId> {
        self.ids.iter()
    }
}

impl IntoIterator for ReleaseGroup {
    type Item = ReleaseId;
    type IntoIter = std::collections::btree_set::IntoIter<ReleaseId>;

    fn into_iter(self) -> Self::IntoIter {
        self.ids.into_iter()
    }
}

impl FromIterator<ReleaseId> for ReleaseGroup {
    fn from_iter<T: IntoIterator<Item = ReleaseId>>(iter: T) -> Self {
        Self::new(iter)
    }
}
