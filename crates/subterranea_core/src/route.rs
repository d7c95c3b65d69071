//! Shareable routes for the catalog views.
//!
//! Search terms travel in the `q` query parameter so a search can be
//! bookmarked; encoding matches `encodeURIComponent`.

use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Landing inventory spread.
    Inventory,
    /// Search view; `None` shows the empty search prompt.
    Search { term: Option<String> },
    Book { id: String },
    /// Category shelf ("view all").
    Shelf,
}

impl Route {
    /// Search route for `term`, or the bare search page for a blank term.
    pub fn search(term: &str) -> Self {
        let term = term.trim();
        Self::Search {
            term: (!term.is_empty()).then(|| term.to_string()),
        }
    }

    pub fn href(&self) -> String {
        match self {
            Self::Inventory => "/".to_string(),
            Self::Search { term: None } => "/search".to_string(),
            Self::Search { term: Some(term) } => format!("/search?q={}", encode_component(term)),
            Self::Book { id } => format!("/book/{}", encode_component(id)),
            Self::Shelf => "/viewallbooks".to_string(),
        }
    }

    /// Parses an href produced by [`Route::href`]; unknown paths yield `None`.
    pub fn parse(href: &str) -> Option<Self> {
        let (path, query) = match href.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (href, None),
        };
        let path = path.trim_end_matches('/');

        match path {
            "" => Some(Self::Inventory),
            "/viewallbooks" => Some(Self::Shelf),
            "/search" => {
                let term = query
                    .into_iter()
                    .flat_map(|query| query.split('&'))
                    .filter_map(|pair| pair.strip_prefix("q="))
                    .find_map(decode_component);
                Some(Self::search(term.as_deref().unwrap_or("")))
            }
            _ => {
                let id = path.strip_prefix("/book/")?;
                if id.is_empty() || id.contains('/') {
                    return None;
                }
                decode_component(id).map(|id| Self::Book { id })
            }
        }
    }
}

impl Display for Route {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.href())
    }
}

fn is_unreserved(byte: u8) -> bool {
    byte.is_ascii_alphanumeric()
        || matches!(byte, b'-' | b'_' | b'.' | b'!' | b'~' | b'*' | b'\'' | b'(' | b')')
}

/// Percent-encodes every byte outside the `encodeURIComponent` unreserved set.
pub fn encode_component(value: &str) -> String {
    let mut encoded = String::with_capacity(value.len());
    for byte in value.bytes() {
        if is_unreserved(byte) {
            encoded.push(char::from(byte));
        } else {
            encoded.push_str(&format!("%{byte:02X}"));
        }
    }
    encoded
}

/// Decodes percent escapes; `None` for malformed escapes or invalid UTF-8.
pub fn decode_component(value: &str) -> Option<String> {
    let bytes = value.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut index = 0;
    while index < bytes.len() {
        if bytes[index] == b'%' {
            let hex = value
                .get(index + 1..index + 3)
                .filter(|hex| hex.bytes().all(|byte| byte.is_ascii_hexdigit()))?;
            decoded.push(u8::from_str_radix(hex, 16).ok()?);
            index += 3;
        } else {
            decoded.push(bytes[index]);
            index += 1;
        }
    }
    String::from_utf8(decoded).ok()
}
