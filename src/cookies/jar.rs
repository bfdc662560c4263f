use std::sync::Arc;

use dashmap::DashMap;
use time::OffsetDateTime;
use url::Url;

use crate::cookies::canonical_cookie::{CanonicalCookie, SameSite};
use crate::cookies::psl;

/// In-memory cookie store, bucketed by domain.
///
/// Cloning is cheap and every clone shares the same store, so the jar can
/// be handed to concurrently running fetches. All mutation goes through
/// `DashMap` entry locks; a cookie added by one in-flight request is never
/// lost to another.
#[derive(Clone, Debug)]
pub struct CookieJar {
    // Map<Domain, List<Cookie>>
    store: Arc<DashMap<String, Vec<CanonicalCookie>>>,
}

impl Default for CookieJar {
    fn default() -> Self {
        Self::new()
    }
}

impl CookieJar {
    pub fn new() -> Self {
        Self {
            store: Arc::new(DashMap::new()),
        }
    }

    /// Insert a cookie, replacing any existing one with the same
    /// (name, domain, path) identity. Timestamps are clamped to whole
    /// seconds on the way in, the resolution persistence keeps.
    pub fn add(&self, cookie: CanonicalCookie) {
        let cookie = cookie.at_second_resolution();
        let mut entry = self.store.entry(cookie.domain.clone()).or_default();
        entry.retain(|c| c.name != cookie.name || c.path != cookie.path);
        entry.push(cookie);
    }

    /// Cookies applicable to `url` under RFC 6265 scoping, in precedence
    /// order: longest path first, ties to the oldest cookie. The sort is
    /// stable, so fully tied cookies keep bucket insertion order.
    pub fn cookies_for_url(&self, url: &Url) -> Vec<CanonicalCookie> {
        let mut result = Vec::new();
        let host = url.host_str().unwrap_or("");
        let now = OffsetDateTime::now_utc();

        for domain in Self::matching_domains(host) {
            if let Some(entry) = self.store.get(&domain) {
                for cookie in entry.iter() {
                    if !Self::domain_matches(&cookie.domain, host, cookie.host_only) {
                        continue;
                    }
                    if !Self::path_matches(&cookie.path, url.path()) {
                        continue;
                    }
                    if cookie.secure && url.scheme() != "https" {
                        continue;
                    }
                    if cookie.is_expired(now) {
                        continue;
                    }
                    result.push(cookie.clone());
                }
            }
        }

        result.sort_by(|a, b| {
            b.path
                .len()
                .cmp(&a.path.len())
                .then_with(|| a.creation_time.cmp(&b.creation_time))
        });

        result
    }

    /// Every stored cookie regardless of scope, expired ones included.
    pub fn all(&self) -> Vec<CanonicalCookie> {
        self.store
            .iter()
            .flat_map(|entry| entry.value().clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.store.iter().map(|entry| entry.value().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.store.clear();
    }

    /// Parse one `Set-Cookie` header value received from `url` and store
    /// the result. Unparseable values, public-suffix domains, domains not
    /// covering the request host, and invalid `__Secure-`/`__Host-`
    /// prefixes are rejected the way browsers reject them: dropped with a
    /// debug log, never an error.
    pub fn set_from_header(&self, url: &Url, header: &str) {
        let parsed = match cookie::Cookie::parse(header) {
            Ok(parsed) => parsed,
            Err(error) => {
                tracing::debug!(error = %error, value = header, "unparseable Set-Cookie value");
                return;
            }
        };

        let now = OffsetDateTime::now_utc();
        let host = url.host_str().unwrap_or("");

        let (domain, host_only) = match parsed.domain() {
            Some(domain) => {
                let domain = domain.trim_start_matches('.').to_lowercase();
                if !psl::is_valid_cookie_domain(&domain, host) {
                    tracing::debug!(domain = %domain, host = %host, "rejected cookie domain");
                    return;
                }
                (domain, false)
            }
            None => (host.to_lowercase(), true),
        };

        let path = parsed.path().unwrap_or("/").to_string();

        // Max-Age wins over Expires (RFC 6265 section 5.3)
        let expiration_time = match parsed.max_age() {
            Some(age) => Some(now + age),
            None => parsed.expires().and_then(|e| e.datetime()),
        };

        let same_site = match parsed.same_site() {
            Some(cookie::SameSite::Lax) => SameSite::Lax,
            Some(cookie::SameSite::Strict) => SameSite::Strict,
            Some(cookie::SameSite::None) => SameSite::NoRestriction,
            None => SameSite::Unspecified,
        };

        let cookie = CanonicalCookie {
            name: parsed.name().to_string(),
            value: parsed.value().to_string(),
            domain,
            path,
            creation_time: now,
            expiration_time,
            last_access_time: now,
            secure: parsed.secure().unwrap_or(false),
            http_only: parsed.http_only().unwrap_or(false),
            host_only,
            same_site,
        };

        if !cookie.prefix_is_valid(url.scheme() == "https") {
            tracing::debug!(name = %cookie.name, "rejected cookie with invalid name prefix");
            return;
        }

        self.add(cookie);
    }

    /// RFC 6265 domain matching: host-only cookies need an exact match,
    /// domain cookies also match any subdomain of their domain.
    fn domain_matches(cookie_domain: &str, request_host: &str, host_only: bool) -> bool {
        if host_only {
            return cookie_domain.eq_ignore_ascii_case(request_host);
        }

        let cookie_domain = cookie_domain.trim_start_matches('.');

        if request_host.eq_ignore_ascii_case(cookie_domain) {
            return true;
        }

        if request_host.len() > cookie_domain.len() {
            let suffix = &request_host[request_host.len() - cookie_domain.len()..];
            if suffix.eq_ignore_ascii_case(cookie_domain) {
                let char_before = request_host
                    .chars()
                    .nth(request_host.len() - cookie_domain.len() - 1);
                return char_before == Some('.');
            }
        }

        false
    }

    /// RFC 6265 path matching: the cookie path is the request path or a
    /// directory prefix of it.
    fn path_matches(cookie_path: &str, request_path: &str) -> bool {
        if request_path == cookie_path {
            return true;
        }

        if request_path.starts_with(cookie_path) {
            if cookie_path.ends_with('/') {
                return true;
            }
            return request_path.chars().nth(cookie_path.len()) == Some('/');
        }

        false
    }

    /// Domains whose buckets may hold cookies for `host`: the host itself
    /// and every parent domain short of the TLD.
    fn matching_domains(host: &str) -> Vec<String> {
        let mut domains = vec![host.to_string()];

        let parts: Vec<&str> = host.split('.').collect();
        for i in 1..parts.len().saturating_sub(1) {
            domains.push(parts[i..].join("."));
        }

        domains
    }
}
