//! HTML report rendering.
//!
//! Emits a single self-contained HTML document: a header naming the target
//! and one sortable table (via DataTables, loaded from a CDN) with a row per
//! used emoji and a count column per sender. Emoji cells embed the catalog's
//! PNG payload inline as a `data:` URI, so the document needs no local
//! assets.
//!
//! Sorting and paging behavior in the browser is DataTables' concern; the
//! table is emitted pre-sorted descending by total so the document reads
//! correctly even without JavaScript.

use std::io::Write;

use crate::attribution::SenderAggregates;
use crate::catalog::EmojiCatalog;
use crate::contacts::{ContactBook, strip_non_ascii};
use crate::error::Result;
use crate::tally::TallyMatrix;

/// Escapes the five HTML-special characters in text content.
fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Writes the complete report document to `out`.
///
/// Rows cover exactly the emojis with a nonzero total, sorted descending by
/// total; columns follow the aggregate's sender order, with sender ids
/// resolved to display names where the contact book knows them.
pub fn render<W: Write>(
    out: &mut W,
    target: &str,
    contacts: &ContactBook,
    aggregates: &SenderAggregates,
    catalog: &EmojiCatalog,
    matrix: &TallyMatrix,
) -> Result<()> {
    let title = strip_non_ascii(&contacts.display_name(target));

    write_header(out, &title)?;
    write_table(out, contacts, aggregates, catalog, matrix)?;
    write_footer(out)?;
    out.flush()?;
    Ok(())
}

fn write_header<W: Write>(out: &mut W, title: &str) -> Result<()> {
    let title = escape_html(title);
    write!(
        out,
        r##"<!DOCTYPE html>
<html>
  <head>
    <title>Emoji Statistics for {title}</title>
    <meta http-equiv="Content-type" content="text/html; charset=utf-8">
    <!-- DataTables CSS -->
    <link rel="stylesheet" type="text/css" href="https://cdn.datatables.net/1.10.0/css/jquery.dataTables.css">
    <!-- jQuery -->
    <script type="text/javascript" charset="utf8" src="https://code.jquery.com/jquery-1.10.2.min.js"></script>
    <!-- DataTables -->
    <script type="text/javascript" charset="utf8" src="https://cdn.datatables.net/1.10.0/js/jquery.dataTables.js"></script>
    <script>
      $(document).ready(function () {{
        $('#emoji_table').dataTable({{
          "aLengthMenu": [[25, 50, 100, 200, -1], [25, 50, 100, 200, "All"]],
          "iDisplayLength": -1,
          "bFilter": false
        }});
      }});
    </script>
  </head>
  <body>
    <h1>Stats for '{title}'</h1>
"##
    )?;
    Ok(())
}

fn write_table<W: Write>(
    out: &mut W,
    contacts: &ContactBook,
    aggregates: &SenderAggregates,
    catalog: &EmojiCatalog,
    matrix: &TallyMatrix,
) -> Result<()> {
    writeln!(out, "    <table border=2 id=emoji_table>")?;
    writeln!(out, "      <thead>")?;
    writeln!(out, "        <tr>")?;
    writeln!(out, "          <th>Emoticon</th><th>Total</th>")?;
    for sender in aggregates.senders() {
        writeln!(
            out,
            "          <th>{}</th>",
            escape_html(&contacts.display_name(sender))
        )?;
    }
    writeln!(out, "        </tr>")?;
    writeln!(out, "      </thead>")?;
    writeln!(out, "      <tbody>")?;

    for (emoji, total) in matrix.ranked_rows() {
        writeln!(out, "        <tr>")?;
        let image = catalog.image(emoji).unwrap_or_default();
        writeln!(
            out,
            "          <td><img src='data:image/png;base64, {image}'/></td>"
        )?;
        writeln!(out, "          <td>{total}</td>")?;
        for sender in aggregates.senders() {
            writeln!(out, "          <td>{}</td>", matrix.get(emoji, sender))?;
        }
        writeln!(out, "        </tr>")?;
    }

    writeln!(out, "      </tbody>")?;
    writeln!(out, "    </table>")?;
    Ok(())
}

fn write_footer<W: Write>(out: &mut W) -> Result<()> {
    write!(
        out,
        "  </body>
</html>
"
    )?;
    Ok(())
}
