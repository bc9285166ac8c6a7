//! Resolution mode
//!
//! A form is resolved in two passes. The mode is passed explicitly to each
//! pass and to dynamic-default callbacks, so nothing has to be reset when a
//! pass fails.

use std::fmt;

/// Which resolution pass is running
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Fail-fast sweep over explicitly supplied flags; never prompts
    BeforeInteraction,
    /// Full resolution with interactive fallback
    #[default]
    Full,
}

impl Mode {
    /// Whether a condition on a not-yet-known value should let the field through
    pub fn tolerates_unknown_dependencies(self) -> bool {
        self == Mode::BeforeInteraction
    }

    /// Whether missing values may be asked for (or reported as missing)
    pub fn resolves_missing_values(self) -> bool {
        self == Mode::Full
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::BeforeInteraction => write!(f, "before-interaction"),
            Mode::Full => write!(f, "full"),
        }
    }
}
