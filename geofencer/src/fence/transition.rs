//! Transition events and expiration policy for geofences.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// A single transition event a geofence can report.
///
/// The backend evaluates device movement against the fenced region and
/// reports the transitions selected in the fence's [`TransitionMask`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Transition {
    /// Device entered the fenced region.
    Enter,
    /// Device left the fenced region.
    Exit,
    /// Device lingered inside the fenced region.
    Dwell,
}

impl Transition {
    fn bit(self) -> u8 {
        match self {
            Transition::Enter => 0b001,
            Transition::Exit => 0b010,
            Transition::Dwell => 0b100,
        }
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transition::Enter => write!(f, "enter"),
            Transition::Exit => write!(f, "exit"),
            Transition::Dwell => write!(f, "dwell"),
        }
    }
}

/// Set of transition events a geofence should report.
///
/// A mask is a subset of {enter, exit, dwell}. An empty mask is rejected at
/// fence construction time since such a fence could never fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TransitionMask(u8);

impl TransitionMask {
    /// Mask reporting only entry events.
    pub const ENTER: TransitionMask = TransitionMask(0b001);

    /// Mask reporting only exit events.
    pub const EXIT: TransitionMask = TransitionMask(0b010);

    /// Mask reporting only dwell events.
    pub const DWELL: TransitionMask = TransitionMask(0b100);

    /// Empty mask (reports nothing).
    pub fn empty() -> Self {
        TransitionMask(0)
    }

    /// Whether the mask selects no transitions.
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Whether the mask selects the given transition.
    pub fn contains(&self, transition: Transition) -> bool {
        self.0 & transition.bit() != 0
    }

    /// Add a transition to the mask.
    pub fn insert(&mut self, transition: Transition) {
        self.0 |= transition.bit();
    }

    /// Return a copy of the mask with the given transition added.
    pub fn with(mut self, transition: Transition) -> Self {
        self.insert(transition);
        self
    }

    /// Iterate over the transitions selected by this mask.
    pub fn iter(&self) -> impl Iterator<Item = Transition> + '_ {
        [Transition::Enter, Transition::Exit, Transition::Dwell]
            .into_iter()
            .filter(|t| self.contains(*t))
    }
}

impl fmt::Display for TransitionMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "none");
        }
        let mut first = true;
        for transition in self.iter() {
            if !first {
                write!(f, "|")?;
            }
            write!(f, "{}", transition)?;
            first = false;
        }
        Ok(())
    }
}

impl From<Transition> for TransitionMask {
    fn from(transition: Transition) -> Self {
        TransitionMask(transition.bit())
    }
}

/// How long a registered geofence remains active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Expiration {
    /// The fence never expires; it stays registered until removed.
    Never,
    /// The fence expires after the given duration.
    After(Duration),
}

impl fmt::Display for Expiration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expiration::Never => write!(f, "never"),
            Expiration::After(d) => write!(f, "{}s", d.as_secs()),
        }
    }
}
