//! Proxy URL tests
//!
//! Emitted parameters must decode back to the exact target and referer.

use streamfan::proxy::{build, ProxyUrlBuilder};

fn decoded(proxied: &str, name: &str) -> Option<String> {
    url::Url::parse(proxied)
        .unwrap()
        .query_pairs()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.into_owned())
}

#[test]
fn test_round_trip_tricky_targets() {
    let builder = ProxyUrlBuilder::new("https://svc.example");
    let targets = [
        "https://cdn.example/hls/master.m3u8?token=a+b&exp=1#frag",
        "https://cdn.example/path with spaces/é.m3u8",
        "https://cdn.example/hls/,a,b,.urlset/master.m3u8",
        "https://cdn.example/x?referer=https%3A%2F%2Falready.encoded%2F",
    ];

    for target in targets {
        let vixsrc = builder.vixsrc(target);
        assert_eq!(decoded(&vixsrc, "url").as_deref(), Some(target));
        assert!(decoded(&vixsrc, "referer").is_none());

        let vidmoly = builder.vidmoly(target, "https://vidmoly.to/embed-1.html?a=1&b=2");
        assert_eq!(decoded(&vidmoly, "url").as_deref(), Some(target));
        assert_eq!(
            decoded(&vidmoly, "referer").as_deref(),
            Some("https://vidmoly.to/embed-1.html?a=1&b=2")
        );
    }
}

#[test]
fn test_paths() {
    let builder = ProxyUrlBuilder::new("https://svc.example/");
    assert!(builder
        .vidmoly("x", "y")
        .starts_with("https://svc.example/api/vidmoly-proxy?url="));
    assert!(builder
        .vixsrc("x")
        .starts_with("https://svc.example/api/vixsrc-proxy?url="));
}

#[test]
fn test_build_keeps_existing_query() {
    let proxied = build("https://svc.example/p?v=2", "https://a/b?c=d", None);
    assert_eq!(decoded(&proxied, "v").as_deref(), Some("2"));
    assert_eq!(decoded(&proxied, "url").as_deref(), Some("https://a/b?c=d"));
}
