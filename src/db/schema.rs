//! SQL DDL for initializing the database schema.

/// SQLite schema includes:
/// - `votes` table (append-only vote log; rows are never updated or deleted)
pub const SQLITE_INIT: &str = r#"
-- ---------------------------------------------------------------------------
-- Vote log
-- ---------------------------------------------------------------------------
CREATE TABLE IF NOT EXISTS votes (
    id INTEGER PRIMARY KEY NOT NULL,
    editor TEXT NOT NULL CHECK (editor IN ('vim', 'emacs')),
    voted_at TEXT NOT NULL -- RFC3339
);

CREATE INDEX IF NOT EXISTS idx_votes_editor ON votes(editor);
"#;
