use crate::poll::{Editor, VoteFilter};
use std::collections::HashMap;

fn int_param(params: &HashMap<String, String>, key: &str) -> Option<i64> {
    params.get(key).and_then(|v| v.trim().parse().ok())
}

/// Builds a vote filter from `/votes.json` query parameters.
///
/// Each parameter is optional. Values that do not parse, and editor numbers
/// outside the editor set, are dropped individually instead of failing the
/// whole query.
pub(crate) fn filter_from_params(params: &HashMap<String, String>) -> VoteFilter {
    VoteFilter {
        from: int_param(params, "from"),
        to: int_param(params, "to"),
        editor: int_param(params, "editor").and_then(Editor::from_ordinal),
    }
}
