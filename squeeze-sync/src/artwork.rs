//! Cover art URL resolution from `status ... tags:K` replies

use crate::model::PlayerId;

/// Token prefix carrying the artwork path or URL
pub const ARTWORK_URL_PREFIX: &str = "artwork_url:";

/// Outcome of resolving a status reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtworkResolution {
    Resolved(String),
    /// The server's HTTP port is not known yet; ask again later
    Deferred,
}

/// Work out the current artwork URL from a status reply
///
/// Only the last token is inspected. An `artwork_url:` value containing
/// `//` is taken verbatim, any other value is a path on the server's web
/// interface. Without the prefix the server's current cover is used, with a
/// `t` parameter so clients do not serve a cached image.
pub fn resolve_artwork(
    tokens: &[String],
    host: &str,
    http_port: Option<u16>,
    player: &PlayerId,
    stamp: u32,
) -> ArtworkResolution {
    let last = tokens.last().map(String::as_str).unwrap_or_default();

    if let Some(url) = last.strip_prefix(ARTWORK_URL_PREFIX) {
        if url.contains("//") {
            return ArtworkResolution::Resolved(url.to_string());
        }
        return match http_port {
            Some(port) => ArtworkResolution::Resolved(format!(
                "http://{}:{}/{}",
                host,
                port,
                url.trim_start_matches('/')
            )),
            None => ArtworkResolution::Deferred,
        };
    }

    match http_port {
        Some(port) => ArtworkResolution::Resolved(format!(
            "http://{}:{}/music/current/cover.jpg?player={}&t={}",
            host, port, player, stamp
        )),
        None => ArtworkResolution::Deferred,
    }
}

/// Cache-busting stamp: current time in milliseconds, modulo 100000
pub fn cache_buster() -> u32 {
    (chrono::Utc::now().timestamp_millis().rem_euclid(100_000)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn tokens(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn kitchen() -> PlayerId {
        PlayerId::new("00:04:20:aa:bb:cc")
    }

    #[rstest]
    #[case(
        "artwork_url:http://cdn.example.com/a.jpg",
        None,
        ArtworkResolution::Resolved("http://cdn.example.com/a.jpg".into())
    )]
    #[case(
        "artwork_url:/imageproxy/x/image.png",
        Some(9000),
        ArtworkResolution::Resolved("http://192.168.1.10:9000/imageproxy/x/image.png".into())
    )]
    #[case("artwork_url:plugins/cover.png", None, ArtworkResolution::Deferred)]
    #[case("tags:K", None, ArtworkResolution::Deferred)]
    fn test_resolve_artwork(
        #[case] last: &str,
        #[case] port: Option<u16>,
        #[case] expected: ArtworkResolution,
    ) {
        let line = tokens(&["status", "0", "1", last]);
        assert_eq!(resolve_artwork(&line, "192.168.1.10", port, &kitchen(), 42), expected);
    }

    #[test]
    fn test_fallback_cover_url() {
        let line = tokens(&["status", "0", "1", "tags:K", "mode:play"]);
        assert_eq!(
            resolve_artwork(&line, "192.168.1.10", Some(9000), &kitchen(), 1234),
            ArtworkResolution::Resolved(
                "http://192.168.1.10:9000/music/current/cover.jpg?player=00:04:20:aa:bb:cc&t=1234".into()
            )
        );
    }

    #[test]
    fn test_empty_tokens_use_fallback() {
        assert_eq!(
            resolve_artwork(&[], "h", Some(1), &kitchen(), 0),
            ArtworkResolution::Resolved("http://h:1/music/current/cover.jpg?player=00:04:20:aa:bb:cc&t=0".into())
        );
    }

    #[test]
    fn test_cache_buster_range() {
        assert!(cache_buster() < 100_000);
    }
}
