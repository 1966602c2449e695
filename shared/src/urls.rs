//! Secure-URL checking for outbound callouts.

use url::Url;

/// Loopback hosts that may use plain http for local development.
const LOOPBACK_HOSTS: &[&str] = &["localhost", "127.0.0.1", "[::1]"];

/// Returns true iff the URL parses and is safe to call out to: https, or
/// http against a loopback host.
pub fn is_secure(url: &str) -> bool {
    let Ok(parsed) = Url::parse(url) else {
        return false;
    };
    match parsed.scheme() {
        "https" => true,
        "http" => matches!(parsed.host_str(), Some(host) if LOOPBACK_HOSTS.contains(&host)),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_https_is_secure() {
        assert!(is_secure("https://example.com/rtc?s=1"));
    }

    #[test]
    fn test_plain_http_is_not_secure() {
        assert!(!is_secure("http://example.com/rtc"));
    }

    #[test]
    fn test_loopback_http_is_allowed() {
        assert!(is_secure("http://localhost:8080/rtc"));
        assert!(is_secure("http://127.0.0.1:8080/rtc"));
        assert!(is_secure("http://[::1]:8080/rtc"));
    }

    #[test]
    fn test_other_schemes_are_not_secure() {
        assert!(!is_secure("ftp://example.com/rtc"));
        assert!(!is_secure("data:text/plain,hello"));
    }

    #[test]
    fn test_unparseable_url_is_not_secure() {
        assert!(!is_secure("not a url"));
        assert!(!is_secure(""));
    }
}
