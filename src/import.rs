//! Playlist URL parsing for the import flow. The fetch itself is an
//! external collaborator; the core only validates and extracts the id.

use crate::error::{Result, TiercadeError};
use std::fmt;

const ACCEPTED_HOSTS: [&str; 3] = ["music.youtube.com", "www.youtube.com", "youtube.com"];

/// Identifier extracted from a playlist URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlaylistId(String);

impl PlaylistId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlaylistId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Extracts the playlist id from a supported URL.
///
/// Supported forms: `music.youtube.com/playlist?list=…` and
/// `(www.)youtube.com/playlist?list=…`, with or without the scheme.
pub fn parse_playlist_url(url: &str) -> Result<PlaylistId> {
    let invalid = || TiercadeError::InvalidPlaylistUrl(url.to_string());

    let trimmed = url.trim();
    let rest = trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"))
        .unwrap_or(trimmed);

    let (host, path) = rest.split_once('/').ok_or_else(invalid)?;
    if !ACCEPTED_HOSTS.contains(&host) {
        return Err(invalid());
    }

    let (route, query) = path.split_once('?').ok_or_else(invalid)?;
    if route != "playlist" {
        return Err(invalid());
    }

    query
        .split('&')
        .find_map(|pair| pair.strip_prefix("list="))
        .filter(|id| !id.is_empty())
        .map(|id| PlaylistId(id.to_string()))
        .ok_or_else(invalid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_supported_hosts() {
        for url in [
            "https://music.youtube.com/playlist?list=PLx123",
            "https://www.youtube.com/playlist?list=PLx123",
            "http://youtube.com/playlist?list=PLx123",
            "music.youtube.com/playlist?list=PLx123",
        ] {
            let id = parse_playlist_url(url).unwrap();
            assert_eq!(id.as_str(), "PLx123", "{url}");
        }
    }

    #[test]
    fn test_extracts_list_among_other_params() {
        let id =
            parse_playlist_url("https://music.youtube.com/playlist?si=abc&list=PLx9&feature=share")
                .unwrap();
        assert_eq!(id.as_str(), "PLx9");
    }

    #[test]
    fn test_rejects_unsupported_urls() {
        for url in [
            "https://example.com/playlist?list=PLx123",
            "https://music.youtube.com/watch?v=abc",
            "https://music.youtube.com/playlist?list=",
            "https://music.youtube.com/playlist",
            "not a url",
            "",
        ] {
            assert!(
                matches!(
                    parse_playlist_url(url),
                    Err(TiercadeError::InvalidPlaylistUrl(_))
                ),
                "{url}"
            );
        }
    }

    #[test]
    fn test_surrounding_whitespace_tolerated() {
        let id = parse_playlist_url("  https://youtube.com/playlist?list=PL1  ").unwrap();
        assert_eq!(id.as_str(), "PL1");
    }
}
