/// Records with more keys than this are treated as a runaway match rather
/// than real translation data.
pub const DEFAULT_MAX_KEYS: usize = 10_000;

/// Scan steps a single strategy may spend before it is abandoned.
pub const DEFAULT_STEP_BUDGET: usize = 1_000_000;

#[derive(Debug, Clone)]
pub struct ParseOptions {
    pub max_keys: usize,
    pub step_budget: usize,
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_keys(mut self, max_keys: usize) -> Self {
        self.max_keys = max_keys;
        self
    }

    pub fn with_step_budget(mut self, step_budget: usize) -> Self {
        self.step_budget = step_budget;
        self
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_keys: DEFAULT_MAX_KEYS,
            step_budget: DEFAULT_STEP_BUDGET,
        }
    }
}

/// Countdown over scan steps. Each strategy gets a fresh budget so a
/// pathological input fails one strategy instead of hanging the chain.
#[derive(Debug, Clone, Copy)]
pub struct StepBudget {
    remaining: usize,
}

impl StepBudget {
    pub fn new(limit: usize) -> Self {
        Self { remaining: limit }
    }

    /// Consume one step. Returns false once the budget is spent.
    pub fn tick(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        true
    }
}
