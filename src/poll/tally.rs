//! Aggregates derived from the vote log on every read.

use super::{Editor, Vote};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// Outcome of the poll. A tie reports the tied count but no editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Winner {
    pub editor: Option<Editor>,
    pub count: u64,
}

impl Winner {
    pub fn is_tie(&self) -> bool {
        self.editor.is_none() && self.count > 0
    }
}

/// Picks the winner from grouped `(editor, count)` rows.
///
/// Editors missing from `counts` have no votes. Equal top counts never select
/// an editor.
pub fn winner(counts: &[(Editor, u64)]) -> Winner {
    let mut sorted: Vec<(Editor, u64)> = counts.iter().copied().filter(|(_, n)| *n > 0).collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1));

    match sorted.as_slice() {
        [] => Winner {
            editor: None,
            count: 0,
        },
        [(editor, count)] => Winner {
            editor: Some(*editor),
            count: *count,
        },
        [(first, first_count), (_, second_count), ..] => {
            if first_count > second_count {
                Winner {
                    editor: Some(*first),
                    count: *first_count,
                }
            } else {
                Winner {
                    editor: None,
                    count: *first_count,
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteStats {
    pub total: u64,
    /// Always holds every editor, zero included.
    pub per_editor: BTreeMap<Editor, u64>,
    pub first: Option<DateTime<Utc>>,
    pub latest: Option<DateTime<Utc>>,
}

impl VoteStats {
    pub fn from_votes(votes: &[Vote]) -> Self {
        let mut per_editor: BTreeMap<Editor, u64> =
            Editor::ALL.into_iter().map(|editor| (editor, 0)).collect();

        for vote in votes {
            *per_editor.entry(vote.editor).or_default() += 1;
        }

        Self {
            total: votes.len() as u64,
            per_editor,
            first: votes.iter().map(|v| v.voted_at).min(),
            latest: votes.iter().map(|v| v.voted_at).max(),
        }
    }
}
