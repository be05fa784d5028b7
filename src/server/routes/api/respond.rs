use crate::poll::{Editor, Vote, VoteStats};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// Unix time in fractional seconds.
fn unix_seconds(at: DateTime<Utc>) -> f64 {
    // Microsecond precision fits an f64 mantissa for any realistic date.
    #[allow(clippy::cast_precision_loss)]
    let micros = at.timestamp_micros() as f64;
    micros / 1_000_000.0
}

/// `{"1": "vim", "2": "emacs"}`
pub type EditorsBody = BTreeMap<u8, &'static str>;

pub fn editors_body() -> EditorsBody {
    Editor::ALL
        .into_iter()
        .map(|editor| (editor.ordinal(), editor.name()))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VoteEntry {
    pub editor: u8,
    pub voted: f64,
}

/// `{"<id>": {"editor": <ordinal>, "voted": <unix seconds>}}`
pub type VotesBody = BTreeMap<i64, VoteEntry>;

pub fn votes_body(votes: &[Vote]) -> VotesBody {
    votes
        .iter()
        .map(|vote| {
            (
                vote.id.0,
                VoteEntry {
                    editor: vote.editor.ordinal(),
                    voted: unix_seconds(vote.voted_at),
                },
            )
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsBody {
    pub total: u64,
    pub votes: BTreeMap<u8, u64>,
    pub latest: Option<f64>,
    pub first: Option<f64>,
}

impl From<&VoteStats> for StatsBody {
    fn from(stats: &VoteStats) -> Self {
        Self {
            total: stats.total,
            votes: stats
                .per_editor
                .iter()
                .map(|(editor, count)| (editor.ordinal(), *count))
                .collect(),
            latest: stats.latest.map(unix_seconds),
            first: stats.first.map(unix_seconds),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::poll::VoteId;
    use chrono::TimeZone;

    #[test]
    fn editors_serialize_with_string_ordinal_keys() {
        let json = serde_json::to_string(&editors_body()).unwrap();
        assert_eq!(json, r#"{"1":"vim","2":"emacs"}"#);
    }

    #[test]
    fn empty_stats_serialize_nulls() {
        let body = StatsBody::from(&VoteStats::from_votes(&[]));
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "total": 0,
                "votes": {"1": 0, "2": 0},
                "latest": null,
                "first": null,
            })
        );
    }

    #[test]
    fn votes_are_keyed_by_id() {
        let voted_at = Utc.timestamp_opt(1_700_000_000, 500_000_000).unwrap();
        let body = votes_body(&[Vote {
            id: VoteId(7),
            editor: Editor::Emacs,
            voted_at,
        }]);
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"7": {"editor": 2, "voted": 1_700_000_000.5}})
        );
    }
}
