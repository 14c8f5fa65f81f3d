//! HTML pages.
//!
//! Markdown is rendered in the browser (markdown-it with task lists,
//! sanitized by DOMPurify); the server only escapes and embeds the source.

use crate::notes::{Note, Slug};

const MARKDOWN_IT_JS: &str = "https://cdn.jsdelivr.net/npm/markdown-it@14.1.0/dist/markdown-it.min.js";
const TASK_LISTS_JS: &str =
    "https://cdn.jsdelivr.net/npm/markdown-it-task-lists@2.1.1/dist/markdown-it-task-lists.min.js";
const DOMPURIFY_JS: &str = "https://cdn.jsdelivr.net/npm/dompurify@3.1.6/dist/purify.min.js";

const STYLE: &str = r#"<style>
  body { font-family: system-ui, sans-serif; max-width: 48rem; margin: 2rem auto; padding: 0 1rem; line-height: 1.5; }
  .tabs { display: flex; gap: .5rem; margin-bottom: 1rem; }
  .tabs button { border: 1px solid #ccc; background: #f6f6f6; padding: .3rem .9rem; cursor: pointer; }
  .tabs button.active { background: #fff; border-bottom-color: #fff; font-weight: 600; }
  #editor { width: 100%; min-height: 20rem; font-family: ui-monospace, monospace; font-size: .95rem; }
  #preview ul.contains-task-list { list-style: none; padding-left: 1.2rem; }
  .error { color: #a00; }
</style>
"#;

// Checkbox clicks rewrite the n-th task item in the source and save.
const NOTE_SCRIPT: &str = r#"<script>
(function () {
  var data = JSON.parse(document.getElementById("note-data").textContent);
  var md = window.markdownit({ linkify: true }).use(window.markdownitTaskLists, { enabled: true });
  var preview = document.getElementById("preview");
  var editorWrap = document.getElementById("editor-wrap");
  var editor = document.getElementById("editor");
  var form = document.getElementById("note-form");
  var previewTab = document.getElementById("preview-tab");
  var editTab = document.getElementById("edit-tab");
  var TASK = /^(\s*(?:[-*+]|\d+[.)])\s+\[)([ xX])(\])/;
  var FENCE = /^ {0,3}(`{3,}|~{3,})/;

  function toggleTask(index, checked) {
    var lines = editor.value.split("\n");
    var seen = -1;
    var fence = null;
    for (var i = 0; i < lines.length; i++) {
      var open = FENCE.exec(lines[i]);
      if (fence) {
        // Only a run of the same character, at least as long, closes it.
        if (open && open[1][0] === fence[0] && open[1].length >= fence.length &&
            lines[i].slice(open[0].length).trim() === "") {
          fence = null;
        }
        continue;
      }
      if (open) {
        fence = open[1];
        continue;
      }
      if (TASK.test(lines[i])) {
        seen++;
        if (seen === index) {
          lines[i] = lines[i].replace(TASK, "$1" + (checked ? "x" : " ") + "$3");
          break;
        }
      }
    }
    editor.value = lines.join("\n");
    form.submit();
  }

  function render() {
    preview.innerHTML = DOMPurify.sanitize(md.render(editor.value));
    preview.querySelectorAll('input[type="checkbox"]').forEach(function (box, index) {
      box.disabled = false;
      box.addEventListener("change", function () { toggleTask(index, box.checked); });
    });
  }

  function show(mode) {
    var editing = mode === "edit";
    editorWrap.hidden = !editing;
    preview.hidden = editing;
    editTab.classList.toggle("active", editing);
    previewTab.classList.toggle("active", !editing);
    if (!editing) { render(); }
  }

  previewTab.addEventListener("click", function () { show("preview"); });
  editTab.addEventListener("click", function () { show("edit"); });
  editor.value = data.markdown;
  show("preview");
})();
</script>
"#;

/// Escape text for HTML element content and double-quoted attributes.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// JSON safe to place inside a `<script>` element.
fn script_json(value: &serde_json::Value) -> String {
    value
        .to_string()
        .replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026")
}

fn page_head(title: &str, scripts: &[&str]) -> String {
    let mut html = String::from("<!doctype html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!("<title>{}</title>\n", escape_html(title)));
    html.push_str(STYLE);
    for src in scripts {
        html.push_str(&format!("<script src=\"{}\"></script>\n", src));
    }
    html.push_str("</head>\n<body>\n");
    html
}

/// Landing page.
pub fn index_page() -> String {
    let mut html = page_head("Tiny Markdown Notes", &[]);
    html.push_str("<h1>Tiny Markdown Notes</h1>\n");
    html.push_str(
        "<p>Go to <code>/notes/&lt;slug&gt;?key=ADMIN_KEY</code> to create a new note.</p>\n",
    );
    html.push_str(
        "<p>Anyone with the link to an existing note can read and edit it: \
         <code>/notes/&lt;slug&gt;</code>.</p>\n",
    );
    html.push_str("</body>\n</html>\n");
    html
}

/// View/edit page of one note.
pub fn note_page(slug: &Slug, note: &Note) -> String {
    let data = serde_json::json!({
        "slug": slug.as_str(),
        "markdown": note.markdown,
        "version": note.version,
    });

    let mut html = page_head(
        &format!("Note: {}", slug),
        &[MARKDOWN_IT_JS, TASK_LISTS_JS, DOMPURIFY_JS],
    );
    html.push_str(&format!("<h1>Note: {}</h1>\n", escape_html(slug.as_str())));
    html.push_str(
        "<nav class=\"tabs\">\n\
         <button type=\"button\" id=\"preview-tab\" class=\"active\">Preview</button>\n\
         <button type=\"button\" id=\"edit-tab\">Edit</button>\n\
         </nav>\n",
    );
    html.push_str("<div id=\"preview\"></div>\n");
    html.push_str(&format!(
        "<form id=\"note-form\" method=\"post\" action=\"/notes/{}\">\n",
        escape_html(slug.as_str())
    ));
    html.push_str("<div id=\"editor-wrap\" hidden>\n");
    html.push_str(&format!(
        "<textarea id=\"editor\" name=\"markdown\" rows=\"20\">{}</textarea>\n",
        escape_html(&note.markdown)
    ));
    html.push_str("<p><button type=\"submit\">Save</button></p>\n</div>\n");
    html.push_str(&format!(
        "<input type=\"hidden\" name=\"version\" value=\"{}\">\n",
        note.version
    ));
    html.push_str("</form>\n");
    html.push_str(&format!(
        "<script type=\"application/json\" id=\"note-data\">{}</script>\n",
        script_json(&data)
    ));
    html.push_str(NOTE_SCRIPT);
    html.push_str("</body>\n</html>\n");
    html
}

/// Page shown when a save was based on an outdated version.
pub fn conflict_page(slug: &Slug) -> String {
    let slug = escape_html(slug.as_str());
    let mut html = page_head("Conflict", &[]);
    html.push_str("<h1>Conflict</h1>\n");
    html.push_str(&format!(
        "<p class=\"error\">Note <strong>{slug}</strong> was changed by someone else \
         after you opened it. Your edit was not saved.</p>\n"
    ));
    html.push_str(&format!(
        "<p><a href=\"/notes/{slug}\">Reload the latest version</a> and apply your change again.</p>\n"
    ));
    html.push_str("</body>\n</html>\n");
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(markdown: &str, version: u64) -> Note {
        Note {
            markdown: markdown.to_string(),
            version,
            created_at: None,
        }
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#x27;Jerry&#x27;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_note_page_contents() {
        let slug = Slug::parse("ui-test").unwrap();
        let html = note_page(&slug, &note("# ui-test\n\n- [ ] First item\n", 3));
        assert!(html.contains("Note: ui-test"));
        assert!(html.contains("First item"));
        assert!(html.contains(r#"name="version" value="3""#));
        assert!(html.contains("id=\"preview-tab\""));
        assert!(html.contains("id=\"editor-wrap\""));
        assert!(html.contains("markdown-it-task-lists"));
        assert!(html.contains("dompurify"));
    }

    #[test]
    fn test_note_markdown_cannot_break_out() {
        let slug = Slug::parse("xss").unwrap();
        let html = note_page(&slug, &note("</script><script>alert(1)</script></textarea>", 1));
        assert!(!html.contains("<script>alert(1)"));
        assert!(!html.contains("</textarea></textarea>"));
        assert!(html.contains("\\u003c/script\\u003e"));
    }

    #[test]
    fn test_task_toggle_skips_fenced_code() {
        let note = note("```\n- [ ] not a task\n```\n- [ ] real task\n", 1);
        let html = note_page(&Slug::parse("fenced").unwrap(), &note);
        assert!(html.contains("var FENCE = /^ {0,3}(`{3,}|~{3,})/;"));
        assert!(html.contains("if (fence) {"));
        assert!(html.contains("```\\n- [ ] not a task"));
    }

    #[test]
    fn test_conflict_page() {
        let html = conflict_page(&Slug::parse("busy").unwrap());
        assert!(html.contains("Conflict"));
        assert!(html.contains("/notes/busy"));
    }

    #[test]
    fn test_index_page() {
        assert!(index_page().contains("Tiny Markdown Notes"));
    }
}
