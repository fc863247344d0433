//! Jellyfin Server Discovery
//!
//! Turns a free-form server address ("media.local", "media.local:8096",
//! "https://example.com/jellyfin", ...) into the server's canonical base URL:
//!
//! 1. normalize the address into an absolute URL
//! 2. rank candidate base URLs by scheme/port heuristics (lower score first)
//! 3. probe every candidate concurrently against `System/Info/Public`
//! 4. pick the first successful candidate in rank order and return the
//!    address the server advertises for itself

use std::collections::HashSet;
use std::str::Utf8Error;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use futures::future::join_all;
use percent_encoding::percent_decode_str;
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, info, warn};
use url::Url;

use teevi_core::config::{ClientConfig, HttpConfig};

use super::error::{CandidateFailure, DiscoveryError, JellyfinError};
use super::types::PublicSystemInfo;
use crate::error::{build_client_with_timeouts, check_response, json_with_limit, ProviderClientError};

/// Jellyfin default plaintext port
pub const JELLYFIN_HTTP_PORT: u16 = 8096;
/// Jellyfin default TLS port
pub const JELLYFIN_HTTPS_PORT: u16 = 8920;

const DEFAULT_HTTP_PORT: u16 = 80;
const DEFAULT_HTTPS_PORT: u16 = 443;

const SYSTEM_INFO_PATH: &str = "System/Info/Public";
const PRODUCT_NAME: &str = "Jellyfin Server";
const SLOW_RESPONSE: Duration = Duration::from_secs(3);

/// Characters that stay escaped when decoding the path
const RESERVED: &[u8] = b";/?:@&=+$,#";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scheme {
    Http,
    Https,
}

impl Scheme {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Https => "https",
        }
    }

    const fn default_port(self) -> u16 {
        match self {
            Self::Http => DEFAULT_HTTP_PORT,
            Self::Https => DEFAULT_HTTPS_PORT,
        }
    }

    /// Plain http is tried early but is not secure
    const fn base_score(self) -> i32 {
        match self {
            Self::Http => -5,
            Self::Https => 5,
        }
    }
}

/// A base URL the resolver is willing to probe. Lower score is tried first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerCandidate {
    pub url: String,
    pub score: i32,
}

/// Canonical server base URL, always ending with `/`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedServer {
    pub address: String,
}

impl ResolvedServer {
    fn from_advertised(address: &str) -> Self {
        let address = address.trim();
        let address = if address.ends_with('/') {
            address.to_string()
        } else {
            format!("{address}/")
        };
        Self { address }
    }
}

/// Normalize a user-supplied server address into an absolute URL.
///
/// Blocks `data:`/`view-source:` addresses and schemes other than http(s),
/// defaults to `http://`, collapses and percent-decodes the path (reserved
/// characters such as `%2F` stay escaped; the path always ends with `/`),
/// drops a trailing dot from the hostname and lower-cases scheme and host.
pub fn normalize_address(input: &str) -> Result<Url, DiscoveryError> {
    let trimmed = input.trim();
    let lower = trimmed.to_ascii_lowercase();

    if lower.starts_with("data:") || lower.starts_with("view-source:") {
        return Err(DiscoveryError::invalid_input(input, "unsupported URL protocol"));
    }

    let absolute = if lower.starts_with("http://") || lower.starts_with("https://") {
        trimmed.to_string()
    } else if trimmed.starts_with("//") {
        format!("http:{trimmed}")
    } else if has_foreign_scheme(trimmed) {
        return Err(DiscoveryError::invalid_input(input, "only http and https are supported"));
    } else {
        format!("http://{trimmed}")
    };

    let mut url =
        Url::parse(&absolute).map_err(|e| DiscoveryError::invalid_input(input, e.to_string()))?;

    let host = url
        .host_str()
        .filter(|host| !host.is_empty())
        .ok_or_else(|| DiscoveryError::invalid_input(input, "missing host"))?
        .to_string();

    let collapsed = collapse_slashes(url.path());
    let decoded = decode_path(&collapsed)
        .map_err(|e| DiscoveryError::invalid_input(input, format!("invalid path encoding: {e}")))?;
    if decoded.ends_with('/') {
        url.set_path(&decoded);
    } else {
        url.set_path(&format!("{decoded}/"));
    }

    let normalized_host = host.strip_suffix('.').unwrap_or(&host).to_ascii_lowercase();
    if normalized_host != host {
        url.set_host(Some(&normalized_host))
            .map_err(|e| DiscoveryError::invalid_input(input, e.to_string()))?;
    }

    Ok(url)
}

/// Candidate base URLs for `input`, best first.
pub fn find_server_candidates(input: &str) -> Result<Vec<String>, DiscoveryError> {
    Ok(score_server_candidates(input)?
        .into_iter()
        .map(|candidate| candidate.url)
        .collect())
}

/// Scored candidates for `input`, sorted by ascending score and deduplicated.
///
/// An address with both an explicit scheme and an explicit port is taken as
/// authoritative and yields itself only.
pub fn score_server_candidates(input: &str) -> Result<Vec<ServerCandidate>, DiscoveryError> {
    let url = normalize_address(input)?;
    let input_port = explicit_port(input, &url);

    if let Some(port) = input_port.filter(|_| has_explicit_scheme(input)) {
        return Ok(vec![ServerCandidate {
            url: candidate_url(url.scheme(), &url, port),
            score: 0,
        }]);
    }

    let mut candidates = vec![
        create_candidate(&url, input_port, Scheme::Http, DEFAULT_HTTP_PORT),
        create_candidate(&url, input_port, Scheme::Https, DEFAULT_HTTPS_PORT),
    ];

    if url.scheme() == "https" {
        candidates.push(create_candidate(&url, input_port, Scheme::Https, JELLYFIN_HTTP_PORT));
        candidates.push(create_candidate(&url, input_port, Scheme::Https, JELLYFIN_HTTPS_PORT));
    } else {
        candidates.push(create_candidate(&url, input_port, Scheme::Http, JELLYFIN_HTTP_PORT));
    }

    candidates.sort_by_key(|candidate| candidate.score);

    let mut seen = HashSet::new();
    candidates.retain(|candidate| seen.insert(candidate.url.clone()));

    if candidates.is_empty() {
        return Err(DiscoveryError::NoCandidates {
            input: input.to_string(),
        });
    }

    Ok(candidates)
}

/// Candidate on `scheme`, keeping the address' own port if it has one.
fn create_candidate(
    url: &Url,
    input_port: Option<u16>,
    scheme: Scheme,
    fallback_port: u16,
) -> ServerCandidate {
    let port = input_port.unwrap_or(fallback_port);

    let mut score = scheme.base_score();
    if port == scheme.default_port() {
        // standard ports need no firewall/NAT setup
        score -= 3;
    } else if input_port == Some(JELLYFIN_HTTP_PORT) {
        score -= 2;
    } else if input_port == Some(JELLYFIN_HTTPS_PORT) {
        score += 1;
    }

    ServerCandidate {
        url: candidate_url(scheme.as_str(), url, port),
        score,
    }
}

/// `scheme://host:port/path/` with the port always written out; query and
/// fragment are dropped.
fn candidate_url(scheme: &str, url: &Url, port: u16) -> String {
    let host = url.host().map(|host| host.to_string()).unwrap_or_default();
    format!("{scheme}://{host}:{port}{}", url.path())
}

/// Port as typed in the address, including one equal to the scheme default
/// (which `Url::port` hides).
fn explicit_port(input: &str, url: &Url) -> Option<u16> {
    let trimmed = input.trim();
    let rest = if has_explicit_scheme(trimmed) {
        trimmed.split_once("://").map_or(trimmed, |(_, rest)| rest)
    } else {
        trimmed.strip_prefix("//").unwrap_or(trimmed)
    };

    let authority = rest.split(['/', '?', '#']).next().unwrap_or_default();
    let host_port = authority.rsplit_once('@').map_or(authority, |(_, host_port)| host_port);
    // skip the colons of a bracketed IPv6 literal
    let port_part = host_port.rfind(']').map_or(host_port, |end| &host_port[end + 1..]);

    port_part
        .rsplit_once(':')
        .is_some_and(|(_, port)| !port.is_empty())
        .then(|| url.port_or_known_default())
        .flatten()
}

/// Percent-decode a path, leaving escaped reserved characters untouched.
fn decode_path(path: &str) -> Result<String, Utf8Error> {
    let mut decoded = String::with_capacity(path.len());
    let mut start = 0;
    let mut idx = 0;

    while idx < path.len() {
        let reserved = path
            .get(idx..idx + 3)
            .filter(|escape| escape.starts_with('%'))
            .filter(|escape| escape[1..].bytes().all(|b| b.is_ascii_hexdigit()))
            .and_then(|escape| u8::from_str_radix(&escape[1..], 16).ok())
            .is_some_and(|byte| RESERVED.contains(&byte));

        if reserved {
            decoded.push_str(&percent_decode_str(&path[start..idx]).decode_utf8()?);
            decoded.push_str(&path[idx..idx + 3].to_ascii_uppercase());
            idx += 3;
            start = idx;
        } else {
            idx += 1;
        }
    }

    decoded.push_str(&percent_decode_str(&path[start..]).decode_utf8()?);
    Ok(decoded)
}

fn has_explicit_scheme(input: &str) -> bool {
    let lower = input.trim().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// `true` for inputs like `ftp://host` (a scheme that is not http/https)
fn has_foreign_scheme(input: &str) -> bool {
    input.find("://").is_some_and(|idx| {
        let scheme = &input[..idx];
        scheme.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
            && scheme
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
    })
}

fn collapse_slashes(path: &str) -> String {
    let mut collapsed = String::with_capacity(path.len());
    let mut previous_slash = false;
    for c in path.chars() {
        if c == '/' {
            if previous_slash {
                continue;
            }
            previous_slash = true;
        } else {
            previous_slash = false;
        }
        collapsed.push(c);
    }
    collapsed
}

/// Reachability check for a single candidate
#[async_trait]
pub trait ServerProbe: Send + Sync {
    /// Fetch the unauthenticated status of the server at `candidate`.
    async fn probe(&self, candidate: &str) -> Result<PublicSystemInfo, ProviderClientError>;
}

/// Probe over HTTP with a per-request timeout
pub struct HttpProbe {
    client: Client,
}

impl HttpProbe {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, ProviderClientError> {
        Ok(Self {
            client: build_client_with_timeouts(timeout, timeout, user_agent)?,
        })
    }
}

#[async_trait]
impl ServerProbe for HttpProbe {
    async fn probe(&self, candidate: &str) -> Result<PublicSystemInfo, ProviderClientError> {
        let endpoint = Url::parse(candidate)
            .and_then(|base| base.join(SYSTEM_INFO_PATH))
            .map_err(|e| ProviderClientError::InvalidConfig(format!("{candidate}: {e}")))?;

        let started = Instant::now();
        let response = self
            .client
            .get(endpoint)
            .header(ACCEPT, "application/json")
            .send()
            .await?;
        let response = check_response(response)?;
        let info: PublicSystemInfo = json_with_limit(response).await?;

        let elapsed = started.elapsed();
        if elapsed > SLOW_RESPONSE {
            warn!(
                candidate,
                elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
                "Slow response from Jellyfin server"
            );
        }

        Ok(info)
    }
}

/// Resolves a server address to the server's canonical base URL
pub struct ServerResolver<P = HttpProbe> {
    probe: P,
}

impl ServerResolver<HttpProbe> {
    /// Resolver probing over HTTP, each probe bounded by `timeout`
    pub fn with_http_probe(timeout: Duration, user_agent: &str) -> Result<Self, ProviderClientError> {
        Ok(Self::new(HttpProbe::new(timeout, user_agent)?))
    }
}

impl<P: ServerProbe> ServerResolver<P> {
    pub const fn new(probe: P) -> Self {
        Self { probe }
    }

    /// Resolve `input` to the server's advertised address.
    ///
    /// All candidates are probed concurrently and every probe runs to
    /// completion; the winner is the first success in candidate order, not
    /// the fastest responder.
    pub async fn resolve_server(&self, input: &str) -> Result<ResolvedServer, DiscoveryError> {
        let candidates = find_server_candidates(input)?;
        debug!(input, ?candidates, "Probing Jellyfin server candidates");

        let outcomes = join_all(
            candidates
                .iter()
                .map(|candidate| self.probe.probe(candidate)),
        )
        .await;

        let mut failures = Vec::with_capacity(candidates.len());
        for (candidate, outcome) in candidates.into_iter().zip(outcomes) {
            match outcome.and_then(require_local_address) {
                Ok(info) => {
                    if let Some(product) = info.product_name.as_deref() {
                        if product != PRODUCT_NAME {
                            warn!(candidate, product, "Unexpected product name");
                        }
                    }
                    let server = ResolvedServer::from_advertised(&info.local_address);
                    info!(
                        input,
                        candidate,
                        address = %server.address,
                        version = %info.version,
                        "Resolved Jellyfin server"
                    );
                    return Ok(server);
                }
                Err(err) => {
                    debug!(candidate, error = %err, "Candidate probe failed");
                    failures.push(CandidateFailure {
                        url: candidate,
                        reason: err.to_string(),
                    });
                }
            }
        }

        Err(DiscoveryError::ServerNotFound {
            input: input.to_string(),
            failures,
        })
    }
}

/// Resolve `input` over HTTP with the default probe timeout and client
/// identity.
pub async fn resolve_server(input: &str) -> Result<ResolvedServer, JellyfinError> {
    let client = ClientConfig::default();
    let resolver = ServerResolver::with_http_probe(
        HttpConfig::default().probe_timeout(),
        &format!("{}/{}", client.name, client.version),
    )?;
    Ok(resolver.resolve_server(input).await?)
}

fn require_local_address(info: PublicSystemInfo) -> Result<PublicSystemInfo, ProviderClientError> {
    if info.local_address.trim().is_empty() {
        return Err(ProviderClientError::Parse(
            "response has no LocalAddress".to_string(),
        ));
    }
    Ok(info)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Probe answering from a fixed table; unknown candidates fail.
    #[derive(Default)]
    struct StubProbe {
        responses: HashMap<String, (Duration, String)>,
        calls: AtomicUsize,
    }

    impl StubProbe {
        fn answering(mut self, candidate: &str, local_address: &str) -> Self {
            self.responses
                .insert(candidate.to_string(), (Duration::ZERO, local_address.to_string()));
            self
        }

        fn answering_after(mut self, candidate: &str, delay: Duration, local_address: &str) -> Self {
            self.responses
                .insert(candidate.to_string(), (delay, local_address.to_string()));
            self
        }
    }

    #[async_trait]
    impl ServerProbe for StubProbe {
        async fn probe(&self, candidate: &str) -> Result<PublicSystemInfo, ProviderClientError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.responses.get(candidate) {
                Some((delay, local_address)) => {
                    tokio::time::sleep(*delay).await;
                    Ok(PublicSystemInfo {
                        local_address: local_address.clone(),
                        version: "10.10.3".to_string(),
                        server_name: "stub".to_string(),
                        id: "stub-id".to_string(),
                        product_name: Some(PRODUCT_NAME.to_string()),
                    })
                }
                None => Err(ProviderClientError::Network("connection refused".to_string())),
            }
        }
    }

    #[test]
    fn test_normalize_collapses_path_and_lowercases_host() {
        let url = normalize_address("EXAMPLE.com//a//b").unwrap();
        assert_eq!(url.scheme(), "http");
        assert_eq!(url.host_str(), Some("example.com"));
        assert_eq!(url.path(), "/a/b/");
    }

    #[test]
    fn test_normalize_trims_and_strips_trailing_dot() {
        let url = normalize_address("  Media.Example.com.  ").unwrap();
        assert_eq!(url.host_str(), Some("media.example.com"));
        assert_eq!(url.path(), "/");
    }

    #[test]
    fn test_normalize_decodes_path() {
        let url = normalize_address("example.com/%7Euser/jellyfin").unwrap();
        assert_eq!(url.path(), "/~user/jellyfin/");
    }

    #[test]
    fn test_normalize_keeps_escaped_slashes() {
        let url = normalize_address("example.com/a%2F%2Fb").unwrap();
        assert_eq!(url.path(), "/a%2F%2Fb/");
        assert!(!url.path().contains("//"));

        let candidates = find_server_candidates("example.com/a%2F%2Fb").unwrap();
        assert!(candidates.iter().all(|c| c.ends_with("/a%2F%2Fb/")));
        assert_eq!(candidates[0], "http://example.com:80/a%2F%2Fb/");
    }

    #[test]
    fn test_normalize_rejects_invalid_utf8_path() {
        for input in ["example.com/%FF", "https://example.com/web/%C3%28"] {
            let err = normalize_address(input).unwrap_err();
            assert!(
                matches!(err, DiscoveryError::InvalidInput { .. }),
                "{input} should be rejected"
            );
            assert!(find_server_candidates(input).is_err());
        }
    }

    #[test]
    fn test_normalize_protocol_relative() {
        let url = normalize_address("//example.com:8096").unwrap();
        assert_eq!(url.as_str(), "http://example.com:8096/");
    }

    #[test]
    fn test_normalize_rejects_blocked_schemes() {
        for input in ["data:text/html,x", "DATA:text/plain,y", "view-source:http://example.com"] {
            let err = normalize_address(input).unwrap_err();
            assert!(
                matches!(err, DiscoveryError::InvalidInput { .. }),
                "{input} should be rejected"
            );
        }
    }

    #[test]
    fn test_normalize_rejects_foreign_scheme_and_garbage() {
        assert!(matches!(
            normalize_address("ftp://example.com"),
            Err(DiscoveryError::InvalidInput { .. })
        ));
        assert!(matches!(normalize_address("   "), Err(DiscoveryError::InvalidInput { .. })));
        assert!(matches!(
            normalize_address("http://exa mple.com"),
            Err(DiscoveryError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_explicit_scheme_and_port_is_authoritative() {
        for (input, expected) in [
            ("https://example.com:8096", "https://example.com:8096/"),
            ("http://Example.com:8920//web", "http://example.com:8920/web/"),
            ("HTTP://10.0.0.5:8096/", "http://10.0.0.5:8096/"),
            ("https://example.com:80", "https://example.com:80/"),
        ] {
            assert_eq!(find_server_candidates(input).unwrap(), vec![expected.to_string()]);
            assert_eq!(normalize_address(input).unwrap().as_str(), expected);
        }
    }

    #[test]
    fn test_explicit_default_port_is_authoritative() {
        for (input, expected) in [
            ("https://example.com:443", "https://example.com:443/"),
            ("http://example.com:80/", "http://example.com:80/"),
            ("HTTPS://user@Example.com:443/jellyfin", "https://example.com:443/jellyfin/"),
        ] {
            let scored = score_server_candidates(input).unwrap();
            assert_eq!(scored, vec![ServerCandidate { url: expected.to_string(), score: 0 }]);
        }
    }

    #[test]
    fn test_authoritative_candidate_drops_query_and_fragment() {
        for input in [
            "https://example.com:8096?x=1#frag",
            "https://example.com:8096/?x=1",
            "https://example.com:8096#frag",
        ] {
            assert_eq!(
                find_server_candidates(input).unwrap(),
                vec!["https://example.com:8096/".to_string()],
                "{input}"
            );
        }
    }

    #[test]
    fn test_empty_port_is_not_explicit() {
        let candidates = find_server_candidates("http://example.com:/").unwrap();
        assert_eq!(candidates.len(), 3);
        assert_eq!(candidates[0], "http://example.com:80/");
    }

    #[test]
    fn test_bare_host_candidates() {
        let candidates = find_server_candidates("example.com").unwrap();
        assert_eq!(
            candidates,
            vec![
                "http://example.com:80/".to_string(),
                "http://example.com:8096/".to_string(),
                "https://example.com:443/".to_string(),
            ]
        );
    }

    #[test]
    fn test_https_candidates_keep_8920_last() {
        let candidates = find_server_candidates("https://example.com").unwrap();
        let position = |url: &str| candidates.iter().position(|c| c == url).unwrap();

        let p443 = position("https://example.com:443/");
        let p8096 = position("https://example.com:8096/");
        let p8920 = position("https://example.com:8920/");
        assert!(p8920 > p443);
        assert!(p8920 > p8096);
        assert_eq!(candidates[0], "http://example.com:80/");
    }

    #[test]
    fn test_candidate_scores() {
        let scored = score_server_candidates("https://example.com").unwrap();
        let scores: Vec<(&str, i32)> = scored.iter().map(|c| (c.url.as_str(), c.score)).collect();
        assert_eq!(
            scores,
            vec![
                ("http://example.com:80/", -8),
                ("https://example.com:443/", 2),
                ("https://example.com:8096/", 5),
                ("https://example.com:8920/", 5),
            ]
        );
    }

    #[test]
    fn test_port_without_scheme_is_kept_and_deduplicated() {
        let scored = score_server_candidates("example.com:8096").unwrap();
        let scores: Vec<(&str, i32)> = scored.iter().map(|c| (c.url.as_str(), c.score)).collect();
        assert_eq!(
            scores,
            vec![("http://example.com:8096/", -7), ("https://example.com:8096/", 3)]
        );

        let candidates = find_server_candidates("media.local:8920").unwrap();
        assert_eq!(
            candidates,
            vec![
                "http://media.local:8920/".to_string(),
                "https://media.local:8920/".to_string(),
            ]
        );

        let candidates = find_server_candidates("example.com:80").unwrap();
        assert_eq!(
            candidates,
            vec![
                "http://example.com:80/".to_string(),
                "https://example.com:80/".to_string(),
            ]
        );
    }

    #[test]
    fn test_candidates_keep_sub_path() {
        let candidates = find_server_candidates("demo.jellyfin.org/stable").unwrap();
        assert!(candidates.contains(&"https://demo.jellyfin.org:443/stable/".to_string()));
        assert!(candidates.iter().all(|c| c.ends_with("/stable/")));
    }

    #[test]
    fn test_ipv6_candidates() {
        let candidates = find_server_candidates("[::1]:8096").unwrap();
        assert_eq!(candidates[0], "http://[::1]:8096/");
    }

    #[test]
    fn test_resolved_server_appends_slash() {
        assert_eq!(
            ResolvedServer::from_advertised("https://example.com:8096").address,
            "https://example.com:8096/"
        );
        assert_eq!(
            ResolvedServer::from_advertised("https://example.com/jf/").address,
            "https://example.com/jf/"
        );
    }

    #[tokio::test]
    async fn test_resolve_uses_advertised_address() {
        let probe = StubProbe::default()
            .answering("https://example.com:8096/", "https://example.com:8096");
        let resolver = ServerResolver::new(probe);

        let server = resolver.resolve_server("https://example.com").await.unwrap();
        assert_eq!(server.address, "https://example.com:8096/");
        // every candidate was probed, not just the winner
        assert_eq!(resolver.probe.calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_resolve_prefers_advertised_over_probed_url() {
        let probe = StubProbe::default().answering("http://10.0.0.5:80/", "http://jellyfin.lan:8096");
        let resolver = ServerResolver::new(probe);

        let server = resolver.resolve_server("10.0.0.5").await.unwrap();
        assert_eq!(server.address, "http://jellyfin.lan:8096/");
    }

    #[tokio::test(start_paused = true)]
    async fn test_resolve_selects_by_rank_not_latency() {
        let probe = StubProbe::default()
            .answering_after("http://example.com:80/", Duration::from_secs(2), "http://slow.example")
            .answering("https://example.com:443/", "https://fast.example");
        let resolver = ServerResolver::new(probe);

        let server = resolver.resolve_server("example.com").await.unwrap();
        assert_eq!(server.address, "http://slow.example/");
    }

    #[tokio::test]
    async fn test_resolve_skips_empty_local_address() {
        let probe = StubProbe::default()
            .answering("http://example.com:80/", "")
            .answering("https://example.com:443/", "https://example.com");
        let resolver = ServerResolver::new(probe);

        let server = resolver.resolve_server("example.com").await.unwrap();
        assert_eq!(server.address, "https://example.com/");
    }

    #[tokio::test]
    async fn test_resolve_all_failing_reports_input() {
        let resolver = ServerResolver::new(StubProbe::default());

        let err = resolver.resolve_server("media.local").await.unwrap_err();
        match err {
            DiscoveryError::ServerNotFound { input, failures } => {
                assert_eq!(input, "media.local");
                assert_eq!(failures.len(), 3);
                assert_eq!(failures[0].url, "http://media.local:80/");
                assert!(failures[0].reason.contains("connection refused"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_resolve_invalid_input_probes_nothing() {
        let resolver = ServerResolver::new(StubProbe::default());

        let err = resolver.resolve_server("data:text/html,x").await.unwrap_err();
        assert!(matches!(err, DiscoveryError::InvalidInput { .. }));
        assert_eq!(resolver.probe.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_resolve_is_repeatable() {
        let probe = StubProbe::default()
            .answering("https://example.com:8096/", "https://example.com:8096");
        let resolver = ServerResolver::new(probe);

        let first = resolver.resolve_server("https://example.com").await.unwrap();
        let second = resolver.resolve_server("https://example.com").await.unwrap();
        assert_eq!(first, second);
        assert_eq!(resolver.probe.calls.load(Ordering::SeqCst), 8);
    }
}
