//! services/api/src/web/bookmarks.rs
//!
//! The "my tests" bookmark list kept in the `userGeneratedTests` cookie.
//!
//! The browser front end reads and writes the same cookie, so its value keeps
//! the front end's format: a URL-encoded JSON array of test ids.

use axum::http::{header, HeaderMap};
use serde::Deserialize;

pub const BOOKMARK_COOKIE: &str = "userGeneratedTests";
const MAX_AGE_SECS: i64 = 365 * 24 * 60 * 60;

/// One cookie entry. Older front-end builds stored ids as strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredId {
    Number(u32),
    Text(String),
}

impl StoredId {
    fn id(&self) -> Option<u32> {
        match self {
            StoredId::Number(id) => Some(*id),
            StoredId::Text(text) => text.trim().parse().ok(),
        }
    }
}

/// Reads the bookmarked test ids from the request cookies.
///
/// Ids may be numbers or numeric strings; other entries are skipped. A missing
/// or malformed cookie yields an empty list.
pub fn read_bookmarks(headers: &HeaderMap) -> Vec<u32> {
    let prefix = format!("{BOOKMARK_COOKIE}=");
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .find_map(|c| c.trim().strip_prefix(prefix.as_str()))
        .and_then(percent_decode)
        .and_then(|json| serde_json::from_str::<Vec<StoredId>>(&json).ok())
        .map(|entries| entries.iter().filter_map(StoredId::id).collect())
        .unwrap_or_default()
}

/// Appends `id` unless it is already bookmarked. Returns whether it was added.
pub fn add_bookmark(ids: &mut Vec<u32>, id: u32) -> bool {
    if ids.contains(&id) {
        return false;
    }
    ids.push(id);
    true
}

pub fn remove_bookmark(ids: &mut Vec<u32>, id: u32) {
    ids.retain(|existing| *existing != id);
}

/// Builds the `Set-Cookie` value for the given bookmark list.
pub fn bookmark_cookie(ids: &[u32]) -> String {
    let json = serde_json::to_string(ids).unwrap_or_else(|_| "[]".to_string());
    format!(
        "{}={}; Path=/; Max-Age={}; SameSite=Lax",
        BOOKMARK_COOKIE,
        percent_encode(&json),
        MAX_AGE_SECS
    )
}

fn percent_encode(value: &str) -> String {
    value
        .bytes()
        .map(|b| match b {
            b'0'..=b'9' | b'a'..=b'z' | b'A'..=b'Z' | b'-' | b'_' | b'.' | b'~' => {
                (b as char).to_string()
            }
            _ => format!("%{:02X}", b),
        })
        .collect()
}

fn percent_decode(value: &str) -> Option<String> {
    let bytes = value.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = value.get(i + 1..i + 3)?;
            out.push(u8::from_str_radix(hex, 16).ok()?);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with_cookie(cookie: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(cookie).unwrap());
        headers
    }

    #[test]
    fn reads_front_end_encoded_cookie() {
        let headers = headers_with_cookie("theme=dark; userGeneratedTests=%5B123456%2C654321%5D");
        assert_eq!(read_bookmarks(&headers), vec![123456, 654321]);
    }

    #[test]
    fn reads_unencoded_cookie() {
        let headers = headers_with_cookie("userGeneratedTests=[111111]");
        assert_eq!(read_bookmarks(&headers), vec![111111]);
    }

    #[test]
    fn reads_ids_stored_as_strings() {
        let headers =
            headers_with_cookie("userGeneratedTests=%5B%22123456%22%2C654321%2C%22abc%22%5D");
        assert_eq!(read_bookmarks(&headers), vec![123456, 654321]);
    }

    #[test]
    fn malformed_or_missing_cookie_is_empty() {
        assert!(read_bookmarks(&HeaderMap::new()).is_empty());
        assert!(read_bookmarks(&headers_with_cookie("userGeneratedTests=%5Bnope")).is_empty());
        assert!(read_bookmarks(&headers_with_cookie("userGeneratedTests=%ZZ")).is_empty());
    }

    #[test]
    fn cookie_round_trips_through_headers() {
        let cookie = bookmark_cookie(&[123456, 234567]);
        assert!(cookie.starts_with("userGeneratedTests=%5B123456%2C234567%5D;"));

        let value = cookie.split(';').next().unwrap();
        assert_eq!(read_bookmarks(&headers_with_cookie(value)), vec![123456, 234567]);
    }

    #[test]
    fn add_and_remove() {
        let mut ids = vec![1, 2];
        assert!(!add_bookmark(&mut ids, 2));
        assert!(add_bookmark(&mut ids, 3));
        remove_bookmark(&mut ids, 1);
        assert_eq!(ids, vec![2, 3]);
    }
}
