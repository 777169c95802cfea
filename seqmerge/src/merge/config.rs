//! Merge configuration.

/// Which version wins when a region cannot be merged element-wise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Fallback {
    /// Keep the current version's edits.
    #[default]
    Current,
    /// Keep the next version's edits.
    Next,
    /// Keep the ancestor's content.
    Previous,
}

impl Fallback {
    /// Returns the lowercase name of this policy.
    pub fn name(&self) -> &'static str {
        match self {
            Fallback::Current => "current",
            Fallback::Next => "next",
            Fallback::Previous => "previous",
        }
    }
}

/// Options for a three-way merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MergeConfig {
    /// Tie-break for conflicting regions.
    pub fallback: Fallback,
}

impl MergeConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of this configuration with another fallback.
    pub fn with_fallback(mut self, fallback: Fallback) -> Self {
        self.fallback = fallback;
        self
    }
}
