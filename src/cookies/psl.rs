//! Public Suffix List validation for cookie domains.
//!
//! A `Domain=` attribute naming a public suffix (`.com`, `.co.uk`, etc.)
//! would let one site plant cookies visible to every other site under
//! that suffix. Browsers reject such cookies; so does the jar.
//!
//! Uses Mozilla's Public Suffix List via the `psl` crate.

use psl::{List, Psl};

/// Check if a domain is itself a public suffix (e.g., "com", "co.uk").
pub fn is_public_suffix(domain: &str) -> bool {
    let domain_lower = domain.to_lowercase();
    let domain_bytes = domain_lower.as_bytes();

    match List.suffix(domain_bytes) {
        Some(suffix) => suffix.as_bytes() == domain_bytes,
        // Unknown TLD, not listed as a suffix
        None => false,
    }
}

/// Check if a cookie domain may be set from a URL with the given host:
/// the domain must not be a public suffix and the host must equal it or
/// be one of its subdomains.
pub fn is_valid_cookie_domain(cookie_domain: &str, url_host: &str) -> bool {
    let cookie_domain = cookie_domain.strip_prefix('.').unwrap_or(cookie_domain);
    let cookie_domain_lower = cookie_domain.to_lowercase();
    let url_host_lower = url_host.to_lowercase();

    if is_public_suffix(&cookie_domain_lower) {
        return false;
    }

    if url_host_lower == cookie_domain_lower {
        return true;
    }

    url_host_lower.ends_with(&format!(".{cookie_domain_lower}"))
}
