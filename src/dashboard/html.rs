//! Markup for the dashboard page.
//!
//! Produces one self-contained HTML file: Bootstrap for styling,
//! vanilla-DataTables for paging and sorting, and a small inline script
//! for the keyword buttons. Every string that came from the feed or the
//! config goes through [`escape`] before it is written.
//!
//! ## Client behavior
//!
//! * Exactly one button carries `active`.
//! * The `[data-all]` button shows every row. A `[data-kw]` button shows
//!   exactly the rows whose space-separated `data-tags` contains its
//!   `data-kw`, so a keyword spelled `ALL` is still just a keyword.
//! * The Seeders cell carries `data-sort` with the same number it displays,
//!   so sorting is numeric and paging never touches the filter.

use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::Path;

use super::{Control, Dashboard, Filter, Row};

const HEADING: &str = "Latest Feed";

const HEAD: &str = r#"<link rel="stylesheet"
      href="https://cdn.jsdelivr.net/npm/bootstrap@5.3.2/dist/css/bootstrap.min.css">
<script src="https://cdn.jsdelivr.net/npm/vanilla-datatables@1.8.4/dist/vanilla-dataTables.min.js"></script>
<link rel="stylesheet"
      href="https://cdn.jsdelivr.net/npm/vanilla-datatables@1.8.4/dist/vanilla-dataTables.min.css">
"#;

const SCRIPT: &str = r##"<script>
const ctrlBtns = document.querySelectorAll('[data-all], [data-kw]');
const table    = new DataTable("#tbl", {perPage: 50, perPageSelect: [10, 25, 50, 100]});

ctrlBtns.forEach(btn => {
  btn.addEventListener('click', () => {
    ctrlBtns.forEach(b => b.classList.remove('active'));
    btn.classList.add('active');
    const showAll = btn.hasAttribute('data-all');
    const kw = btn.dataset.kw;
    document.querySelectorAll('#tbl tbody tr').forEach(row => {
      if (showAll) {
        row.style.display = '';
      } else {
        const tags = (row.getAttribute('data-tags') || '').split(' ').filter(t => t !== '');
        row.style.display = tags.includes(kw) ? '' : 'none';
      }
    });
  });
});
</script>
"##;

/// Escape text for use in element content and double- or single-quoted
/// attributes.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Render the whole page.
pub fn to_html(dashboard: &Dashboard) -> String {
    let date = dashboard.date.format("%Y-%m-%d");
    let mut buf = String::new();

    buf.push_str("<!doctype html>\n<html lang=\"en\">\n<meta charset=\"utf-8\">\n");
    let _ = writeln!(buf, "<title>{HEADING} {date}</title>");
    buf.push_str(HEAD);

    buf.push_str("\n<div class=\"container my-4\">\n");
    let _ = writeln!(
        buf,
        "  <h1 class=\"mb-3\">{HEADING} <small class=\"text-muted\">{date}</small> \
         <span class=\"badge bg-secondary fs-6\">{} entries</span></h1>",
        dashboard.rows.len()
    );

    buf.push_str("\n  <div class=\"btn-group mb-3\" role=\"group\">\n");
    for control in &dashboard.controls {
        render_control(&mut buf, control);
    }
    buf.push_str("  </div>\n");

    buf.push_str(
        "\n  <table id=\"tbl\" class=\"table table-striped table-sm\">\n    <thead>\n      \
         <tr><th>Title</th><th>Seeders</th><th>Size</th><th>DL</th></tr>\n    \
         </thead>\n    <tbody>\n",
    );
    let filter = dashboard.active_filter();
    for row in &dashboard.rows {
        render_row(&mut buf, row, filter.shows(row));
    }
    buf.push_str("    </tbody>\n  </table>\n</div>\n\n");

    buf.push_str(SCRIPT);
    buf.push_str("</html>\n");
    buf
}

fn render_control(buf: &mut String, control: &Control) {
    let style = match control.filter {
        Filter::All => "btn-outline-secondary",
        Filter::Keyword(_) => "btn-outline-primary",
    };
    let active = if control.active { " active" } else { "" };
    let rule = control
        .min_seeders
        .map(|min| format!(" data-min-seeders=\"{min}\""))
        .unwrap_or_default();
    let target = match control.filter.token() {
        Some(token) => format!("data-kw=\"{}\"", escape(&token)),
        None => "data-all".to_string(),
    };
    let _ = writeln!(
        buf,
        "    <button class=\"btn {style}{active}\" {target}{rule}>{}</button>",
        escape(&control.label),
    );
}

fn render_row(buf: &mut String, row: &Row, shown: bool) {
    let title = escape(&row.title);
    let hidden = if shown { "" } else { " style=\"display: none\"" };
    let _ = writeln!(
        buf,
        "      <tr data-title=\"{title}\" data-seeders=\"{seeders}\" data-tags=\"{tags}\"{hidden}>\n        \
         <td>{title}</td>\n        \
         <td data-sort=\"{seeders}\">{seeders}</td>\n        \
         <td>{size}</td>\n        \
         <td><a href=\"{link}\" target=\"_blank\" rel=\"noopener\">DL</a></td>\n      \
         </tr>",
        seeders = row.seeders,
        tags = escape(&row.tag_list()),
        size = escape(&row.size),
        link = escape(&row.link),
    );
}

/// Write `markup` to `path`, replacing any previous file and creating parent
/// directories.
pub fn save(path: &Path, markup: &str) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, markup)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
