/// Default number of statements a run may execute before it is stopped.
pub const INSTRUCTION_LIMIT: usize = 500;

/// Counts executed statements and reports when a run has gone past its
/// ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Governor {
    count: usize,
    limit: usize,
}

impl Governor {
    pub fn new(limit: usize) -> Self {
        Self { count: 0, limit }
    }

    /// Records one executed statement. Returns `true` once the count is
    /// strictly above the limit.
    pub fn tick(&mut self) -> bool {
        self.count += 1;
        self.exceeded()
    }

    pub fn exceeded(&self) -> bool {
        self.count > self.limit
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn reset(&mut self) {
        self.count = 0;
    }
}

impl Default for Governor {
    fn default() -> Self {
        Self::new(INSTRUCTION_LIMIT)
    }
}
