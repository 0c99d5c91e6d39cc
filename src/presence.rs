use crate::table::Table;
use ahash::AHashSet;

/// Which optional fields this chunk actually carries.
///
/// Computed once after uplift and repair; builders receive plain booleans from it so an absent
/// field (no table at all) stays distinguishable from a present-but-empty one.
#[derive(Clone, Debug, Default)]
pub struct ChunkSchema {
    present: AHashSet<String>,
}

impl ChunkSchema {
    pub fn of(table: &Table) -> Self {
        let mut s = Self::default();
        s.observe(table);
        s
    }

    /// Record the columns of another chunk-level table (e.g. raw mentions).
    pub fn observe(&mut self, table: &Table) {
        self.present.extend(table.columns.iter().cloned());
    }

    #[inline]
    pub fn has(&self, field: &str) -> bool {
        self.present.contains(field)
    }
}
