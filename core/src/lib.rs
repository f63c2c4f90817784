#![cfg_attr(not(test), no_std)]

extern crate alloc;

use serde::{Deserialize, Serialize};

pub use cell::*;
pub use difficulty::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use layout::*;
pub use snapshot::*;
pub use timer::*;
pub use types::*;

mod cell;
mod difficulty;
mod engine;
mod error;
mod generator;
mod layout;
mod snapshot;
mod timer;
mod types;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MarkOutcome {
    NoChange,
    Changed,
}

impl MarkOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Changed => true,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    NoChange,
    Revealed,
    HitMine,
    Won,
}

impl RevealOutcome {
    pub const fn has_update(self) -> bool {
        use RevealOutcome::*;
        match self {
            NoChange => false,
            Revealed => true,
            HitMine => true,
            Won => true,
        }
    }
}

/// How a session ended, if it did.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    #[default]
    None,
    Win { elapsed_secs: u32 },
    Loss,
}

impl Outcome {
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::None)
    }
}
