//! Pull request status and its transition rules.
//!
//! ```text
//!   open ──► merged
//!     └────► closed
//! ```
//!
//! `merged` and `closed` are terminal. Merging records the decision only;
//! note content is never copied between branches.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PullRequestStatus {
    Open,
    Merged,
    Closed,
}

impl PullRequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Merged => "merged",
            Self::Closed => "closed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Open)
    }

    /// Only `open` may move, and only to a terminal state.
    pub fn can_transition_to(&self, next: PullRequestStatus) -> bool {
        matches!(self, Self::Open) && next.is_terminal()
    }
}

impl fmt::Display for PullRequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PullRequestStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "open" => Ok(Self::Open),
            "merged" => Ok(Self::Merged),
            "closed" => Ok(Self::Closed),
            other => Err(format!(
                "unknown pull request status '{other}' (expected open, merged or closed)"
            )),
        }
    }
}

impl TryFrom<String> for PullRequestStatus {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
