//! Cookie management: the record type, the jar, and its persisted form.
//!
//! | Piece | Responsibility |
//! |-------|----------------|
//! | [`CanonicalCookie`](canonical_cookie::CanonicalCookie) | Single cookie with scoping attributes |
//! | [`CookieJar`](jar::CookieJar) | Concurrent in-memory store, queryable by URL |
//! | [`persist`] | JSON document round trip for the whole jar |
//! | [`psl`] | Public-suffix validation of `Domain=` attributes |
//!
//! The jar enforces RFC 6265 scoping on both ends: `Set-Cookie` values
//! are validated (domain coverage, public suffixes, `__Secure-`/`__Host-`
//! prefixes) before they are stored, and URL lookups apply domain, path,
//! secure, and expiry filtering with deterministic precedence.

pub mod canonical_cookie;
pub mod jar;
pub mod persist;
pub mod psl;
