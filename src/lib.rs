//! # cookiesnap
//!
//! Fetches a handful of pages concurrently into one shared cookie jar,
//! persists the jar to disk as a JSON document, reloads it, and shows
//! that the reloaded jar answers URL lookups exactly like the original.
//!
//! ## What it demonstrates
//!
//! - **Shared jar**: all requests accumulate `Set-Cookie` headers into
//!   the same RFC 6265 store, and later requests send them back
//! - **Full enumeration**: the jar exposes every entry, so the persisted
//!   document is a typed list of cookie records per domain, not an
//!   opaque blob
//! - **Round trip**: serialize → clear → deserialize reproduces the
//!   cookie set for every URL lookup
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cookiesnap::cookies::jar::CookieJar;
//! use cookiesnap::fetch::Fetcher;
//! use url::Url;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let jar = CookieJar::new();
//!     let urls = vec![Url::parse("https://example.com/")?];
//!     Fetcher::new()?.fetch_all(&urls, &jar).await;
//!     println!("{} cookies collected", jar.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`cookies`] - Cookie record, jar, persistence, and PSL validation
//! - [`fetch`] - Concurrent GET requests sharing the jar
//! - [`report`] - Per-URL cookie listing for the console
//! - [`error`] - Error taxonomy

pub mod cookies;
pub mod error;
pub mod fetch;
pub mod report;
