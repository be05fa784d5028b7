use super::extract::filter_from_params;
use super::respond::{self, EditorsBody, StatsBody, VotesBody};
use crate::error::VoeError;
use crate::poll::{VoteFilter, VoteStats};
use crate::server::router::VoeState;
use axum::{
    Json,
    extract::{Query, State},
};
use std::collections::HashMap;
use tracing::debug;

/// GET /editors.json
pub(super) async fn editors_handler() -> Json<EditorsBody> {
    Json(respond::editors_body())
}

/// GET /votes.json?from=&to=&editor=
pub(super) async fn votes_handler(
    State(state): State<VoeState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<VotesBody>, VoeError> {
    let filter = filter_from_params(&params);
    let votes = state.db.query(filter).await?;

    debug!(?filter, matched = votes.len(), "Vote log queried");
    Ok(Json(respond::votes_body(&votes)))
}

/// GET /stats.json
///
/// Scans the whole vote log on every call.
pub(super) async fn stats_handler(
    State(state): State<VoeState>,
) -> Result<Json<StatsBody>, VoeError> {
    let votes = state.db.query(VoteFilter::default()).await?;
    let stats = VoteStats::from_votes(&votes);
    Ok(Json(StatsBody::from(&stats)))
}
