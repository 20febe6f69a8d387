//! HTML rendering of directory listings.

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use repository::{DirectoryListing, FileEntry};

/// Characters escaped within one path segment of a link.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'[')
    .add(b']')
    .add(b'\\')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

pub(crate) fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// Absolute link to `segments` below `base`.
pub(crate) fn href<'a>(base: &str, segments: impl IntoIterator<Item = &'a str>) -> String {
    let mut link = base.trim_end_matches('/').to_owned();
    for segment in segments {
        link.push('/');
        link.extend(utf8_percent_encode(segment, SEGMENT));
    }
    link
}

/// Render one listing page.
///
/// `segments` is the browsed location below `base`, starting with `storages`.
pub(crate) fn listing(base: &str, segments: &[&str], listing: &DirectoryListing) -> String {
    let title = format!("/{}", segments.join("/"));
    let mut html = format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>Index of {title}</title>\n</head>\n<body>\n<h1>Index of {title}</h1>\n<table>\n<tr><th>Name</th><th>Size</th><th>Last modified</th></tr>\n",
        title = escape(&title)
    );

    if segments.len() > 1 {
        let parent = href(base, segments[..segments.len() - 1].iter().copied());
        html.push_str(&format!(
            "<tr><td><a href=\"{}/\">..</a></td><td></td><td></td></tr>\n",
            escape(&parent)
        ));
    }

    for entry in &listing.directories {
        html.push_str(&row(base, segments, entry, true));
    }
    for entry in &listing.files {
        html.push_str(&row(base, segments, entry, false));
    }

    html.push_str("</table>\n</body>\n</html>\n");
    html
}

fn row(base: &str, segments: &[&str], entry: &FileEntry, directory: bool) -> String {
    let mut link = href(base, segments.iter().copied().chain([entry.name.as_str()]));
    let mut name = escape(&entry.name);
    if directory {
        link.push('/');
        name.push('/');
    }

    let size = entry.size.map(|s| s.to_string()).unwrap_or_default();
    let modified = entry
        .last_modified
        .map(|m| m.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_default();

    format!(
        "<tr><td><a href=\"{}\">{name}</a></td><td>{size}</td><td>{modified}</td></tr>\n",
        escape(&link)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn links_are_encoded_per_segment() {
        assert_eq!(
            href("http://localhost:8080/", ["storages", "storage0", "a b", "@scope"]),
            "http://localhost:8080/storages/storage0/a%20b/@scope"
        );
        assert_eq!(href("", ["storages"]), "/storages");
    }

    #[test]
    fn listing_links() {
        let listing = DirectoryListing::new(
            vec![FileEntry::named("1.1")],
            vec![FileEntry {
                name: "test-browsing-1.1.jar".into(),
                size: Some(12),
                last_modified: None,
            }],
        );
        let html = super::listing(
            "http://localhost",
            &["storages", "storage0", "releases", "org", "example"],
            &listing,
        );

        assert!(html.contains("<title>Index of /storages/storage0/releases/org/example</title>"));
        assert!(html.contains(
            r#"<a href="http://localhost/storages/storage0/releases/org/example/1.1/">1.1/</a>"#
        ));
        assert!(html.contains(
            r#"<a href="http://localhost/storages/storage0/releases/org/example/test-browsing-1.1.jar">test-browsing-1.1.jar</a></td><td>12</td>"#
        ));
        assert!(html.contains(r#"<a href="http://localhost/storages/storage0/releases/org/">..</a>"#));
    }

    #[test]
    fn names_are_escaped() {
        let listing = DirectoryListing::new(Vec::new(), vec![FileEntry::named("<script>&.txt")]);
        let html = super::listing("", &["storages", "s", "r"], &listing);
        assert!(html.contains(">&lt;script&gt;&amp;.txt</a>"));
        assert!(html.contains(r#"href="/storages/s/r/%3Cscript%3E&amp;.txt""#));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn storages_page_has_no_parent() {
        let listing = DirectoryListing::of_directories(["storage0"]);
        let html = super::listing("", &["storages"], &listing);
        assert!(!html.contains(">..<"));
        assert!(html.contains(r#"<a href="/storages/storage0/">storage0/</a>"#));
    }
}
