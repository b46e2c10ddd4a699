use shared::domain::RecordId;

/// Which row, if any, has its deals/clients panel open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExpansionTracker {
    expanded: Option<RecordId>,
}

impl ExpansionTracker {
    pub fn expanded(&self) -> Option<RecordId> {
        self.expanded
    }

    pub fn is_expanded(&self, key: RecordId) -> bool {
        self.expanded == Some(key)
    }

    /// Opens `key`, collapsing any other row, or closes it if it is already open.
    pub fn toggle(&mut self, key: RecordId) -> Option<RecordId> {
        self.expanded = if self.is_expanded(key) { None } else { Some(key) };
        self.expanded
    }

    pub fn collapse(&mut self) {
        self.expanded = None;
    }

    /// Drops the expansion when its record is not among `visible`. Returns true
    /// if the expansion was cleared.
    pub fn retain_visible<I>(&mut self, visible: I) -> bool
    where
        I: IntoIterator<Item = RecordId>,
    {
        let Some(current) = self.expanded else {
            return false;
        };
        if visible.into_iter().any(|key| key == current) {
            return false;
        }
        self.expanded = None;
        true
    }
}
