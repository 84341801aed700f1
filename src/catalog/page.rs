//! Listing page markup.

use super::CatalogEntry;

pub const FILE_DIR: &str = "files";
pub const ICON_DIR: &str = "icons";
const ATTRIBUTION_URL: &str = "https://en.wikipedia.org/wiki/QR_code";

const HEAD: &str = r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0, user-scalable=no">
    <title>QRshare</title>
    <style>
        html, body { width: 100%; padding: 0; margin: 0; background-color: #F1F1F1; }
        body { font-family: Ubuntu, sans-serif; font-size: 18px; line-height: 150%; }
        h1 {
            font-size: 140%; font-weight: normal; margin: 0; padding: 15px 0 15px 2%;
            width: 98%; height: 28px; background-color: #2C001E; color: white;
            position: fixed; top: 0; left: 0;
        }
        div.table { width: 100%; margin-top: 57px; border-top: 1px solid #2C001E; }
        div.table a {
            display: block; width: 97%; padding: 15px 0 11px 1%; margin: 0 1%;
            border-bottom: 1px solid #2C001E; text-decoration: none; color: black;
        }
        div.table a:visited { color: #DD4814; }
        div.table a:hover, div.table a:active { color: #DD4814; text-decoration: underline; }
        img { width: 24px; height: 24px; vertical-align: middle; margin: 0 4px 4px 0; }
        span { font-size: 80%; }
        footer { font-size: 70%; text-align: center; padding: 12px 0; color: #666; }
        footer a { color: #666; }
    </style>
</head>
<body>
"#;

/// Renders the complete listing document.
pub(crate) fn render(base_uri: &str, entries: &[CatalogEntry], user: &str, host: &str) -> String {
    let mut html = String::from(HEAD);

    html.push_str("<div class=\"table\">\n");
    for entry in entries {
        html.push_str(&format!(
            "<a href=\"{link}\"><img src=\"{icon}\" alt=\"\">{name} &nbsp;&nbsp;&nbsp;<span>({size})</span></a>\n",
            link = escape_html(&entry_link(base_uri, FILE_DIR, entry.index)),
            icon = escape_html(&entry_link(base_uri, ICON_DIR, entry.index)),
            name = escape_html(&entry.file_name()),
            size = escape_html(&entry.display_size),
        ));
    }
    html.push_str("</div>\n");

    html.push_str(&format!(
        "<h1>QRshare - {}@{}</h1>\n",
        escape_html(user),
        escape_html(host)
    ));
    html.push_str(&format!(
        "<footer>Shared with <a href=\"{ATTRIBUTION_URL}\">QRshare</a> {}</footer>\n",
        env!("CARGO_PKG_VERSION")
    ));
    html.push_str("</body>\n</html>\n");
    html
}

/// `<base>files/3`, `<base>icons/3`
pub fn entry_link(base_uri: &str, dir: &str, index: usize) -> String {
    format!("{base_uri}{dir}/{index}")
}

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup_characters() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn links_are_relative_to_base_uri() {
        assert_eq!(
            entry_link("http://10.0.0.2:4000/", FILE_DIR, 7),
            "http://10.0.0.2:4000/files/7"
        );
        assert_eq!(entry_link("", ICON_DIR, 0), "icons/0");
    }
}
