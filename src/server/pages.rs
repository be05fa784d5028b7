//! Server-rendered HTML. The pages are small enough to build with `format!`.

use crate::poll::{Editor, Winner};
use axum::response::Html;
use std::fmt::Write as _;

const STYLE: &str = "body{background:#181818;color:#fbfbfb;font-family:sans-serif;\
max-width:42rem;margin:auto;padding:1rem}a{color:#c4a7e7}\
button{font-size:1.2rem;padding:.5rem 1.5rem;margin:.25rem}\
.flash{border:1px solid #fbfbfb;padding:.5rem}table{width:100%}";

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            c => out.push(c),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> Html<String> {
    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8" />
<meta name="viewport" content="width=device-width, initial-scale=1" />
<title>{title}</title>
<link rel="manifest" href="/manifest.json" />
<link rel="icon" href="/favicon.ico" />
<style>{STYLE}</style>
</head>
<body>
{body}
</body>
</html>
"#,
        title = escape(title),
    ))
}

pub fn winner_summary(winner: &Winner) -> String {
    let plural = |n: u64| if n == 1 { "vote" } else { "votes" };
    if winner.is_tie() {
        return format!("it is a tie at {} {} each", winner.count, plural(winner.count));
    }
    match winner.editor {
        Some(editor) => format!(
            "{editor} is winning with {} {}",
            winner.count,
            plural(winner.count)
        ),
        None => "nobody has voted yet".to_string(),
    }
}

pub fn index_page(winner: &Winner, flash: Option<&str>) -> Html<String> {
    let mut body = String::from("<h1>vim or emacs?</h1>\n");

    if let Some(message) = flash {
        let _ = writeln!(body, r#"<p class="flash">{}</p>"#, escape(message));
    }

    let _ = writeln!(body, "<p><strong>{}</strong></p>", escape(&winner_summary(winner)));

    body.push_str(r#"<form method="post" action="/">"#);
    for editor in Editor::ALL {
        let _ = write!(
            body,
            r#"<button type="submit" name="voe" value="{}">{}</button>"#,
            editor.ordinal(),
            editor.name()
        );
    }
    body.push_str("</form>\n");
    body.push_str(
        "<p>you can vote once a day. \
         <a href=\"/votes\">browse votes</a> \
         or grab the <a href=\"/stats.json\">stats</a>.</p>\n",
    );

    layout("vim or emacs?", &body)
}

const VOTES_SCRIPT: &str = r#"
const form = document.getElementById("filter");
const rows = document.getElementById("rows");
let editors = {};

function load() {
    const params = new URLSearchParams();
    for (const key of ["from", "to", "editor"]) {
        const value = form.elements[key].value.trim();
        if (value !== "") params.set(key, value);
    }
    fetch("/votes.json?" + params.toString())
        .then((r) => r.json())
        .then((votes) => {
            rows.replaceChildren();
            for (const [id, vote] of Object.entries(votes)) {
                const tr = document.createElement("tr");
                for (const text of [id, editors[vote.editor] ?? vote.editor,
                                    new Date(vote.voted * 1000).toISOString()]) {
                    const td = document.createElement("td");
                    td.textContent = text;
                    tr.appendChild(td);
                }
                rows.appendChild(tr);
            }
        });
}

fetch("/editors.json")
    .then((r) => r.json())
    .then((list) => {
        editors = list;
        for (const [ordinal, name] of Object.entries(list)) {
            const option = document.createElement("option");
            option.value = ordinal;
            option.textContent = name;
            form.elements.editor.appendChild(option);
        }
        load();
    });

form.addEventListener("submit", (e) => {
    e.preventDefault();
    load();
});
"#;

pub fn votes_page() -> Html<String> {
    let body = format!(
        r#"<h1>votes</h1>
<p><a href="/">back</a></p>
<form id="filter">
<input name="from" type="number" min="1" placeholder="from id" />
<input name="to" type="number" min="1" placeholder="to id" />
<select name="editor"><option value="">any editor</option></select>
<button type="submit">filter</button>
</form>
<table>
<thead><tr><th>id</th><th>editor</th><th>voted</th></tr></thead>
<tbody id="rows"></tbody>
</table>
<noscript>this page needs javascript; the raw data is at <a href="/votes.json">/votes.json</a>.</noscript>
<script>{VOTES_SCRIPT}</script>"#
    );
    layout("votes", &body)
}

pub fn error_page(code: u16, summary: &str, description: &str) -> Html<String> {
    let body = format!(
        "<h1>{code} {summary}</h1>\n<p>{description}</p>\n<p><a href=\"/\">home</a></p>\n",
        summary = escape(summary),
        description = escape(description),
    );
    layout(&format!("{code} {summary}"), &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_distinguishes_win_tie_and_empty() {
        let win = Winner {
            editor: Some(Editor::Vim),
            count: 3,
        };
        let tie = Winner {
            editor: None,
            count: 2,
        };
        let empty = Winner {
            editor: None,
            count: 0,
        };
        assert_eq!(winner_summary(&win), "vim is winning with 3 votes");
        assert_eq!(winner_summary(&tie), "it is a tie at 2 votes each");
        assert_eq!(winner_summary(&empty), "nobody has voted yet");
    }

    #[test]
    fn flash_is_escaped() {
        let Html(page) = index_page(
            &Winner {
                editor: None,
                count: 0,
            },
            Some("<script>"),
        );
        assert!(page.contains("&lt;script&gt;"));
        assert!(!page.contains("<p class=\"flash\"><script>"));
    }

    #[test]
    fn error_page_carries_code_and_text() {
        let Html(page) = error_page(404, "not found", "no such page");
        assert!(page.contains("<h1>404 not found</h1>"));
        assert!(page.contains("no such page"));
    }
}
