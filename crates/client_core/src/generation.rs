use std::fmt;

/// Issuance order of a request. Only the newest generation may touch visible state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Generation(pub u64);

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Default)]
pub(crate) struct GenerationCounter {
    current: Generation,
}

impl GenerationCounter {
    pub(crate) fn advance(&mut self) -> Generation {
        self.current = Generation(self.current.0 + 1);
        self.current
    }

    pub(crate) fn current(&self) -> Generation {
        self.current
    }

    pub(crate) fn is_current(&self, generation: Generation) -> bool {
        self.current == generation
    }
}
