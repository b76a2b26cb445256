//! Outbound proxy URL construction
//!
//! Playback and downloads for some providers are routed through our own
//! HTTP endpoints so the player never talks to the upstream host directly.
//! Targets and referers are percent-encoded as query components, so
//! decoding the emitted parameters gives back the exact input.

/// Path of the vidmoly playback proxy, relative to the service base URL
pub const VIDMOLY_PROXY_PATH: &str = "/api/vidmoly-proxy";

/// Path of the vixsrc playback proxy, relative to the service base URL
pub const VIXSRC_PROXY_PATH: &str = "/api/vixsrc-proxy";

/// Build `base?url=<target>[&referer=<referer>]`.
///
/// If `base` already carries a query string the parameters are appended
/// with `&` instead.
pub fn build(base: &str, target: &str, referer: Option<&str>) -> String {
    let separator = if base.contains('?') { '&' } else { '?' };
    let mut out = format!("{}{}url={}", base, separator, urlencoding::encode(target));
    if let Some(referer) = referer {
        out.push_str("&referer=");
        out.push_str(&urlencoding::encode(referer));
    }
    out
}

/// Proxy URL builder bound to one service base URL
#[derive(Debug, Clone)]
pub struct ProxyUrlBuilder {
    base_url: String,
}

impl ProxyUrlBuilder {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Wrap a vidmoly manifest behind `/api/vidmoly-proxy`
    pub fn vidmoly(&self, target: &str, referer: &str) -> String {
        build(
            &format!("{}{}", self.base_url, VIDMOLY_PROXY_PATH),
            target,
            Some(referer),
        )
    }

    /// Wrap a vixsrc stream behind `/api/vixsrc-proxy`
    pub fn vixsrc(&self, target: &str) -> String {
        build(
            &format!("{}{}", self.base_url, VIXSRC_PROXY_PATH),
            target,
            None,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_without_referer() {
        assert_eq!(
            build("https://p.example/api/vixsrc-proxy", "https://a.b/x.m3u8", None),
            "https://p.example/api/vixsrc-proxy?url=https%3A%2F%2Fa.b%2Fx.m3u8"
        );
    }

    #[test]
    fn test_build_with_referer() {
        let out = build("/proxy", "a&b=c", Some("https://vidmoly.net/"));
        assert_eq!(out, "/proxy?url=a%26b%3Dc&referer=https%3A%2F%2Fvidmoly.net%2F");
    }

    #[test]
    fn test_build_appends_to_existing_query() {
        assert_eq!(build("/proxy?v=2", "x", None), "/proxy?v=2&url=x");
    }

    #[test]
    fn test_builder_trims_trailing_slash() {
        let builder = ProxyUrlBuilder::new("https://svc.example/");
        assert_eq!(
            builder.vixsrc("x"),
            "https://svc.example/api/vixsrc-proxy?url=x"
        );
    }
}
