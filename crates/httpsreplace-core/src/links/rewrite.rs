//! In-place rewrite of matched links inside one content blob.

use super::LinkMatch;

/// Replaces each link for which `replacement` returns `Some(new_url)`.
///
/// `links` must come from `find_http_links(content)` (ascending, disjoint
/// spans). Returns `None` when nothing changed.
pub fn rewrite_links<F>(content: &str, links: &[LinkMatch], mut replacement: F) -> Option<String>
where
    F: FnMut(&LinkMatch) -> Option<String>,
{
    let mut out = String::with_capacity(content.len() + links.len());
    let mut cursor = 0;
    let mut changed = false;

    for link in links {
        let Some(new_url) = replacement(link) else {
            continue;
        };
        if new_url == link.url {
            continue;
        }
        out.push_str(&content[cursor..link.span.start]);
        out.push_str(&new_url);
        cursor = link.span.end;
        changed = true;
    }

    if !changed {
        return None;
    }
    out.push_str(&content[cursor..]);
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::links::find_http_links;

    #[test]
    fn rewrites_selected_links_only() {
        let content = r#"<img src="http://a.example/1.png"><img src="http://b.example/2.png">"#;
        let links = find_http_links(content);
        let out = rewrite_links(content, &links, |l| {
            (l.host == "b.example").then(|| l.upgraded(None))
        })
        .unwrap();
        assert_eq!(
            out,
            r#"<img src="http://a.example/1.png"><img src="https://b.example/2.png">"#
        );
    }

    #[test]
    fn unchanged_content_returns_none() {
        let content = r#"<img src="http://a.example/1.png">"#;
        let links = find_http_links(content);
        assert!(rewrite_links(content, &links, |_| None).is_none());
        assert!(rewrite_links(content, &links, |l| Some(l.url.clone())).is_none());
    }

    #[test]
    fn renamed_hosts_are_substituted() {
        let content = r#"<script src="http://example.com/test.js"><img src="http://EXAMPLE.COM/someimage.png">"#;
        let links = find_http_links(content);
        let out = rewrite_links(content, &links, |l| Some(l.upgraded(Some("secure.example.com"))))
            .unwrap();
        assert_eq!(
            out,
            r#"<script src="https://secure.example.com/test.js"><img src="https://secure.example.com/someimage.png">"#
        );
    }
}
