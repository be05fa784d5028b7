use super::FLASH_COOKIE;
use super::extract::VoteSubmission;
use crate::error::VoeError;
use crate::poll;
use crate::server::guards::ClientAddr;
use crate::server::pages;
use crate::server::router::VoeState;
use axum::{
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, PrivateCookieJar, SameSite};
use tracing::{info, warn};

/// GET /
///
/// Winner/tie view. Shows and clears the flash message left by a vote.
pub(super) async fn index_handler(
    State(state): State<VoeState>,
    jar: PrivateCookieJar,
) -> Result<(PrivateCookieJar, Html<String>), VoeError> {
    let counts = state.db.editor_counts().await?;
    let winner = poll::winner(&counts);

    let flash = jar.get(FLASH_COOKIE).map(|c| c.value().to_string());
    let jar = match flash {
        Some(_) => jar.remove(Cookie::build(FLASH_COOKIE).path("/")),
        None => jar,
    };

    Ok((jar, pages::index_page(&winner, flash.as_deref())))
}

/// POST /
///
/// Form field `voe` carries the editor ordinal. One accepted vote per client
/// per vote window; rejected attempts get a delayed 429.
pub(super) async fn submit_vote_handler(
    State(state): State<VoeState>,
    ClientAddr(client): ClientAddr,
    jar: PrivateCookieJar,
    VoteSubmission(editor): VoteSubmission,
) -> Result<Response, VoeError> {
    if let Err(err) = state.limiter.check_vote(client) {
        warn!(%client, editor = %editor, "Repeat vote rejected");
        state.limiter.penalize().await;
        return Err(err);
    }

    // The allowance is spent at this point; a failed insert does not refund it.
    let id = state.db.append(editor).await?;
    info!(%client, id = %id, editor = %editor, "Vote recorded");

    let message = format!("Your vote for `{editor}` with ID `{id}` has been recorded.");
    let cookie = Cookie::build((FLASH_COOKIE, message))
        .path("/")
        .http_only(true)
        .secure(!state.site.insecure_cookie)
        .same_site(SameSite::Lax)
        .build();

    Ok((jar.add(cookie), Redirect::to("/")).into_response())
}

/// GET /votes
pub(super) async fn votes_page_handler() -> Html<String> {
    pages::votes_page()
}
