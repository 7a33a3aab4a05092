//! Link modeling: find `http://` URLs in `src=` / `data=` attributes.
//!
//! Only the value that starts right after the attribute's opening quote is a
//! candidate, so anchors (`href`), plain text and URLs nested in another URL's
//! query string never match.

mod rewrite;
mod scan;
mod site;

pub use rewrite::rewrite_links;
pub use scan::find_http_links;
pub use site::SiteRoot;

use std::ops::Range;

/// One `http://` URL found inside a `src` or `data` attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkMatch {
    /// Byte range of the URL (scheme included) in the scanned content.
    pub span: Range<usize>,
    /// Attribute prefix as written, e.g. `src="` or `DATA = '`.
    pub attribute: String,
    /// URL exactly as written in the content.
    pub url: String,
    /// Authority as written (userinfo, host, port).
    pub authority: String,
    /// Normalized host: lowercase, IDNA-encoded.
    pub host: String,
    /// Explicit port, if the authority carries one.
    pub port: Option<u16>,
    /// Path, query and fragment as written.
    pub remainder: String,
}

impl LinkMatch {
    /// The https form of this link. With `renamed_host` the host is swapped
    /// (userinfo and explicit port survive); otherwise the authority is kept
    /// verbatim and only the scheme changes.
    pub fn upgraded(&self, renamed_host: Option<&str>) -> String {
        let authority = match renamed_host {
            None => self.authority.clone(),
            Some(new_host) => {
                let mut out = String::new();
                if let Some((userinfo, _)) = self.authority.rsplit_once('@') {
                    out.push_str(userinfo);
                    out.push('@');
                }
                out.push_str(new_host);
                if let Some(port) = self.port {
                    out.push(':');
                    out.push_str(&port.to_string());
                }
                out
            }
        };
        format!("https://{}{}", authority, self.remainder)
    }
}
