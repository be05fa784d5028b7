//! Poll domain: the closed set of editors, the immutable vote record and the
//! filter used to browse the vote log.

pub mod tally;

pub use tally::{VoteStats, Winner, winner};

use chrono::{DateTime, Utc};
use std::{fmt, str::FromStr};

/// One of the two poll options.
///
/// The discriminant is the ordinal exposed on the wire (form field `voe`,
/// JSON keys and values); the name is what gets stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Editor {
    Vim = 1,
    Emacs = 2,
}

impl Editor {
    pub const ALL: [Editor; 2] = [Editor::Vim, Editor::Emacs];

    pub fn ordinal(self) -> u8 {
        self as u8
    }

    pub fn from_ordinal(ordinal: i64) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|editor| i64::from(editor.ordinal()) == ordinal)
    }

    pub fn name(self) -> &'static str {
        match self {
            Editor::Vim => "vim",
            Editor::Emacs => "emacs",
        }
    }
}

impl fmt::Display for Editor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownEditor(pub String);

impl fmt::Display for UnknownEditor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown editor `{}`", self.0)
    }
}

impl FromStr for Editor {
    type Err = UnknownEditor;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|editor| editor.name() == s)
            .ok_or_else(|| UnknownEditor(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VoteId(pub i64);

impl fmt::Display for VoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A cast vote. Never mutated after insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vote {
    pub id: VoteId,
    pub editor: Editor,
    pub voted_at: DateTime<Utc>,
}

/// Optional constraints for browsing the vote log. Id bounds are inclusive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VoteFilter {
    pub from: Option<i64>,
    pub to: Option<i64>,
    pub editor: Option<Editor>,
}
