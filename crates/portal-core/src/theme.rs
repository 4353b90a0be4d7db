//! Theme preference model.
//!
//! A simple persisted value, not a state machine. Stored in its own record
//! (`theme-storage`), independent of the session.

use serde::{Deserialize, Serialize};

/// Visual theme preference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}
