use crate::error::VoeError;
use crate::poll::{Editor, Vote, VoteId};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct DbVote {
    pub id: i64,
    pub editor: String,
    pub voted_at: DateTime<Utc>,
}

impl TryFrom<DbVote> for Vote {
    type Error = VoeError;

    fn try_from(row: DbVote) -> Result<Self, Self::Error> {
        let editor: Editor = row
            .editor
            .parse()
            .map_err(|e| VoeError::Storage(format!("vote id={} is corrupt: {e}", row.id)))?;

        Ok(Vote {
            id: VoteId(row.id),
            editor,
            voted_at: row.voted_at,
        })
    }
}

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct DbEditorCount {
    pub editor: String,
    pub count: i64,
}

impl TryFrom<DbEditorCount> for (Editor, u64) {
    type Error = VoeError;

    fn try_from(row: DbEditorCount) -> Result<Self, Self::Error> {
        let editor: Editor = row
            .editor
            .parse()
            .map_err(|e| VoeError::Storage(format!("vote log is corrupt: {e}")))?;
        let count = u64::try_from(row.count)
            .map_err(|_| VoeError::Storage(format!("negative count for {editor}")))?;
        Ok((editor, count))
    }
}
