/// Configuration for a turn sequencer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TurnConfig {
    /// Maximum turn log size (oldest events dropped when exceeded). 0 = unlimited.
    pub max_events: usize,
}

impl TurnConfig {
    /// Set the maximum turn log size (0 = unlimited).
    pub fn with_max_events(mut self, max: usize) -> Self {
        self.max_events = max;
        self
    }
}
