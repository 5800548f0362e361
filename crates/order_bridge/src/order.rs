//! The two orderings the bridge reconciles.
//!
//! [`Phase`] is the fine-grained order internal handlers register against.
//! [`PriorityBucket`] is the coarse order the external dispatcher uses for its
//! listeners. Both are closed, totally ordered by declaration position.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordered stage at which internal handlers run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    Pre,
    AfterPre,
    First,
    Early,
    Default,
    Late,
    Last,
    BeforePost,
    Post,
}

impl Phase {
    /// Number of phases
    pub const COUNT: usize = 9;

    /// Every phase in dispatch order
    pub const ALL: [Phase; Phase::COUNT] = [
        Phase::Pre,
        Phase::AfterPre,
        Phase::First,
        Phase::Early,
        Phase::Default,
        Phase::Late,
        Phase::Last,
        Phase::BeforePost,
        Phase::Post,
    ];

    /// Position of this phase in the total order
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub fn from_index(index: usize) -> Option<Phase> {
        Self::ALL.get(index).copied()
    }

    /// The phase immediately after this one, `None` for [`Phase::Post`]
    #[inline]
    pub fn next(self) -> Option<Phase> {
        Self::from_index(self.index() + 1)
    }

    /// Phases from `from` through `to`, both inclusive. Empty when `from > to`.
    pub fn span(from: Phase, to: Phase) -> &'static [Phase] {
        const ALL: &[Phase] = &Phase::ALL;
        if from > to {
            return &[];
        }
        &ALL[from.index()..=to.index()]
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Phase::Pre => "PRE",
            Phase::AfterPre => "AFTER_PRE",
            Phase::First => "FIRST",
            Phase::Early => "EARLY",
            Phase::Default => "DEFAULT",
            Phase::Late => "LATE",
            Phase::Last => "LAST",
            Phase::BeforePost => "BEFORE_POST",
            Phase::Post => "POST",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse priority used by the external dispatcher when registering listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PriorityBucket {
    Highest,
    High,
    Normal,
    Low,
    Lowest,
}

impl PriorityBucket {
    pub const COUNT: usize = 5;

    pub const ALL: [PriorityBucket; PriorityBucket::COUNT] = [
        PriorityBucket::Highest,
        PriorityBucket::High,
        PriorityBucket::Normal,
        PriorityBucket::Low,
        PriorityBucket::Lowest,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            PriorityBucket::Highest => "HIGHEST",
            PriorityBucket::High => "HIGH",
            PriorityBucket::Normal => "NORMAL",
            PriorityBucket::Low => "LOW",
            PriorityBucket::Lowest => "LOWEST",
        }
    }
}

impl fmt::Display for PriorityBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
