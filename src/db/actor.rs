use crate::db::models::{DbEditorCount, DbVote};
use crate::db::schema::SQLITE_INIT;
use crate::error::VoeError;
use crate::poll::{Editor, Vote, VoteFilter, VoteId};
use chrono::Utc;
use ractor::{Actor, ActorProcessingErr, ActorRef, RpcReplyPort};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use std::{str::FromStr, time::Duration};
use tracing::{debug, info};

#[derive(Debug)]
pub enum DbActorMessage {
    /// Append a vote and return its id.
    Append(Editor, RpcReplyPort<Result<VoteId, VoeError>>),

    /// List votes matching a filter, ordered by id.
    Query(VoteFilter, RpcReplyPort<Result<Vec<Vote>, VoeError>>),

    /// Vote counts grouped by editor. Editors without votes are absent.
    EditorCounts(RpcReplyPort<Result<Vec<(Editor, u64)>, VoeError>>),
}

#[derive(Clone)]
pub struct DbActorHandle {
    actor: ActorRef<DbActorMessage>,
}

impl DbActorHandle {
    pub async fn append(&self, editor: Editor) -> Result<VoteId, VoeError> {
        ractor::call!(self.actor, DbActorMessage::Append, editor)
            .map_err(|e| VoeError::RactorError(format!("DbActor Append RPC failed: {e}")))?
    }

    pub async fn query(&self, filter: VoteFilter) -> Result<Vec<Vote>, VoeError> {
        ractor::call!(self.actor, DbActorMessage::Query, filter)
            .map_err(|e| VoeError::RactorError(format!("DbActor Query RPC failed: {e}")))?
    }

    pub async fn editor_counts(&self) -> Result<Vec<(Editor, u64)>, VoeError> {
        ractor::call!(self.actor, DbActorMessage::EditorCounts)
            .map_err(|e| VoeError::RactorError(format!("DbActor EditorCounts RPC failed: {e}")))?
    }
}

struct DbActorState {
    pool: SqlitePool,
}

struct DbActor;

#[ractor::async_trait]
impl Actor for DbActor {
    type Msg = DbActorMessage;
    type State = DbActorState;
    type Arguments = String;

    async fn pre_start(
        &self,
        _myself: ActorRef<Self::Msg>,
        database_url: Self::Arguments,
    ) -> Result<Self::State, ActorProcessingErr> {
        let connect_opts = SqliteConnectOptions::from_str(database_url.as_str())
            .map_err(|e| ActorProcessingErr::from(format!("invalid database url: {e}")))?
            .create_if_missing(true)
            .busy_timeout(Duration::from_secs(5))
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);

        let pool = SqlitePoolOptions::new()
            .connect_with(connect_opts)
            .await
            .map_err(|e| ActorProcessingErr::from(format!("db connect failed: {e}")))?;

        apply_schema(&pool)
            .await
            .map_err(|e| ActorProcessingErr::from(format!("db schema init failed: {e}")))?;

        info!("DbActor initialized");
        Ok(DbActorState { pool })
    }

    async fn handle(
        &self,
        _myself: ActorRef<Self::Msg>,
        message: Self::Msg,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        match message {
            DbActorMessage::Append(editor, reply) => {
                let res = self.append(&state.pool, editor).await;
                let _ = reply.send(res);
            }
            DbActorMessage::Query(filter, reply) => {
                let res = self.query(&state.pool, filter).await;
                let _ = reply.send(res);
            }
            DbActorMessage::EditorCounts(reply) => {
                let res = self.editor_counts(&state.pool).await;
                let _ = reply.send(res);
            }
        }
        Ok(())
    }
}

impl DbActor {
    async fn append(&self, pool: &SqlitePool, editor: Editor) -> Result<VoteId, VoeError> {
        let voted_at = Utc::now();

        // Dropping the transaction on any error rolls the insert back.
        let mut tx = pool.begin().await?;
        let id: i64 = sqlx::query_scalar(
            r#"
        INSERT INTO votes (editor, voted_at)
        VALUES (?, ?)
        RETURNING id
        "#,
        )
        .bind(editor.name())
        .bind(voted_at)
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;

        debug!(id, editor = %editor, voted_at = %voted_at, "vote appended");
        Ok(VoteId(id))
    }

    async fn query(&self, pool: &SqlitePool, filter: VoteFilter) -> Result<Vec<Vote>, VoeError> {
        let mut builder: QueryBuilder<Sqlite> =
            QueryBuilder::new("SELECT id, editor, voted_at FROM votes WHERE 1 = 1");

        if let Some(from) = filter.from {
            builder.push(" AND id >= ").push_bind(from);
        }
        if let Some(to) = filter.to {
            builder.push(" AND id <= ").push_bind(to);
        }
        if let Some(editor) = filter.editor {
            builder.push(" AND editor = ").push_bind(editor.name());
        }
        builder.push(" ORDER BY id");

        let rows = builder.build_query_as::<DbVote>().fetch_all(pool).await?;

        rows.into_iter().map(Vote::try_from).collect()
    }

    async fn editor_counts(&self, pool: &SqlitePool) -> Result<Vec<(Editor, u64)>, VoeError> {
        let rows = sqlx::query_as::<_, DbEditorCount>(
            r#"
        SELECT editor, COUNT(*) AS count
        FROM votes
        GROUP BY editor
        "#,
        )
        .fetch_all(pool)
        .await?;

        rows.into_iter().map(<(Editor, u64)>::try_from).collect()
    }
}

/// Spawn the database actor and return a cloneable handle.
///
/// The actor is unnamed so several stores can live in one process.
pub async fn spawn(database_url: &str) -> Result<DbActorHandle, VoeError> {
    let (actor, _jh) = ractor::Actor::spawn(None, DbActor, database_url.to_string())
        .await
        .map_err(|e| VoeError::Storage(format!("failed to spawn DbActor: {e}")))?;

    Ok(DbActorHandle { actor })
}

async fn apply_schema(pool: &SqlitePool) -> Result<(), VoeError> {
    for stmt in SQLITE_INIT.split(';') {
        let s = stmt.trim();
        if s.is_empty() {
            continue;
        }
        sqlx::query(s).execute(pool).await?;
    }
    Ok(())
}
