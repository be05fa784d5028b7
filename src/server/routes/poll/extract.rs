use crate::error::VoeError;
use crate::poll::Editor;
use axum::{
    Form,
    extract::{FromRequest, Request},
};
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct VoteForm {
    voe: Option<String>,
}

/// Validated vote selection from the `POST /` form body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct VoteSubmission(pub(crate) Editor);

/// Parses the `voe` field: the editor's ordinal as decimal text.
pub(crate) fn parse_selection(voe: Option<&str>) -> Result<Editor, VoeError> {
    let raw = voe
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| VoeError::BadRequest("missing vote selection".to_string()))?;

    let ordinal: i64 = raw
        .parse()
        .map_err(|_| VoeError::BadRequest("vote selection must be a number".to_string()))?;

    Editor::from_ordinal(ordinal)
        .ok_or_else(|| VoeError::BadRequest(format!("no editor with number {ordinal}")))
}

impl<S> FromRequest<S> for VoteSubmission
where
    S: Send + Sync,
{
    type Rejection = VoeError;

    /// Rejections:
    /// - body that is not an urlencoded form => `BadRequest`
    /// - missing, empty or non-numeric `voe` => `BadRequest`
    /// - ordinal outside the editor set => `BadRequest`
    ///
    /// Runs before the vote limiter, so malformed submissions never consume a
    /// client's daily vote.
    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Form(form) = Form::<VoteForm>::from_request(req, state).await?;
        let editor = parse_selection(form.voe.as_deref())?;

        debug!(editor = %editor, "Extracted vote submission");
        Ok(Self(editor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_known_ordinals() {
        assert_eq!(parse_selection(Some("1")).unwrap(), Editor::Vim);
        assert_eq!(parse_selection(Some(" 2 ")).unwrap(), Editor::Emacs);
    }

    #[test]
    fn rejects_missing_and_non_numeric() {
        assert!(matches!(parse_selection(None), Err(VoeError::BadRequest(_))));
        assert!(matches!(parse_selection(Some("")), Err(VoeError::BadRequest(_))));
        assert!(matches!(
            parse_selection(Some("vim")),
            Err(VoeError::BadRequest(_))
        ));
    }

    #[test]
    fn rejects_out_of_range() {
        for raw in ["0", "3", "99", "-1"] {
            assert!(
                matches!(parse_selection(Some(raw)), Err(VoeError::BadRequest(_))),
                "{raw} should be rejected"
            );
        }
    }
}
