//! Attribute scan over raw HTML text.

use regex::Regex;
use std::sync::OnceLock;

use super::LinkMatch;

/// `src=` / `data=`, optional spaces, an opening quote, then `http://` and a
/// URL body that ends on a non-punctuation char, `/`, or a `(word)` group
/// right before a closing quote. Regex-over-HTML is deliberately shallow.
const ATTRIBUTE_LINK_PATTERN: &str = r#"(?i)(\b(?:src|data)\s*=\s*['"])(http://)([^\s()<>]+(?:\([\w\d]+\)|[^[:punct:]\s]|/))['"]"#;

fn attribute_link_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(ATTRIBUTE_LINK_PATTERN).expect("valid attribute link regex"))
}

/// Finds every `http://` link in a `src` or `data` attribute of `content`.
///
/// Links whose URL does not parse or has no host are dropped here, so callers
/// never mutate them.
pub fn find_http_links(content: &str) -> Vec<LinkMatch> {
    let mut links = Vec::new();
    for caps in attribute_link_regex().captures_iter(content) {
        let (Some(attribute), Some(scheme), Some(body)) = (caps.get(1), caps.get(2), caps.get(3))
        else {
            continue;
        };
        match parse_link(scheme.as_str(), body.as_str()) {
            Some((authority, host, port, remainder)) => links.push(LinkMatch {
                span: scheme.start()..body.end(),
                attribute: attribute.as_str().to_string(),
                url: content[scheme.start()..body.end()].to_string(),
                authority,
                host,
                port,
                remainder,
            }),
            None => {
                tracing::debug!(url = %body.as_str(), "skipping unparseable link");
            }
        }
    }
    links
}

/// Splits the URL body into (authority, normalized host, port, remainder).
fn parse_link(scheme: &str, body: &str) -> Option<(String, String, Option<u16>, String)> {
    let split_at = body.find(['/', '?', '#']).unwrap_or(body.len());
    let (authority, remainder) = body.split_at(split_at);
    if authority.is_empty() {
        return None;
    }

    let parsed = url::Url::parse(&format!("{}{}", scheme.to_ascii_lowercase(), body)).ok()?;
    let host = parsed.host_str()?.to_lowercase();
    if host.is_empty() {
        return None;
    }

    Some((
        authority.to_string(),
        host,
        parsed.port(),
        remainder.to_string(),
    ))
}
