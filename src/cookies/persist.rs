//! Cookie persistence - save and load the jar as a JSON document.
//!
//! The document carries top-level store metadata (`version`,
//! `cookie_count`) and one array of cookie records per domain bucket.
//! Buckets live in a `BTreeMap`, so serializing the same jar twice
//! produces the same document. Loading rebuilds the jar by replaying
//! [`CookieJar::add`] for every record; nothing reaches into store
//! internals.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::cookies::canonical_cookie::{CanonicalCookie, SameSite};
use crate::cookies::jar::CookieJar;
use crate::error::{SnapError, STORE_VERSION};

/// One cookie as it appears in the persisted document.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CookieRecord {
    name: String,
    value: String,
    domain: String,
    path: String,
    secure: bool,
    http_only: bool,
    host_only: bool,
    same_site: SameSite,
    expires_unix_secs: Option<i64>,
    creation_unix_secs: i64,
}

/// The full persisted representation of a [`CookieJar`].
#[derive(Serialize, Deserialize, Debug)]
pub struct StoreDocument {
    pub version: u32,
    pub cookie_count: usize,
    pub domains: BTreeMap<String, Vec<CookieRecord>>,
}

/// Snapshot the jar into a document.
pub fn to_document(jar: &CookieJar) -> StoreDocument {
    let mut cookie_count = 0;
    let mut domains: BTreeMap<String, Vec<CookieRecord>> = BTreeMap::new();

    for cookie in jar.all() {
        cookie_count += 1;
        domains
            .entry(cookie.domain.clone())
            .or_default()
            .push(record_from(cookie));
    }

    StoreDocument {
        version: STORE_VERSION,
        cookie_count,
        domains,
    }
}

/// Rebuild a jar from a document.
///
/// Rejects documents with an unknown version or a `cookie_count` that
/// does not match the records present. Records whose expiry already
/// passed are dropped, matching what a browser restoring a cookie
/// database would keep.
pub fn from_document(document: StoreDocument) -> Result<CookieJar, SnapError> {
    if document.version != STORE_VERSION {
        return Err(SnapError::UnsupportedVersion {
            found: document.version,
            expected: STORE_VERSION,
        });
    }

    let found = document.domains.values().map(Vec::len).sum::<usize>();
    if found != document.cookie_count {
        return Err(SnapError::CountMismatch {
            declared: document.cookie_count,
            found,
        });
    }

    let jar = CookieJar::new();
    let now = OffsetDateTime::now_utc();

    for record in document.domains.into_values().flatten() {
        let cookie = cookie_from(record)?;
        if cookie.is_expired(now) {
            continue;
        }
        jar.add(cookie);
    }

    Ok(jar)
}

/// Serialize the jar and write it to `path` as pretty-printed JSON.
pub fn save_jar(jar: &CookieJar, path: &Path) -> Result<(), SnapError> {
    let json = serde_json::to_string_pretty(&to_document(jar)).map_err(SnapError::Serialize)?;
    fs::write(path, json)?;
    Ok(())
}

/// Read `path` and rebuild the jar it holds.
pub fn load_jar(path: &Path) -> Result<CookieJar, SnapError> {
    let json = fs::read_to_string(path)?;
    let document: StoreDocument = serde_json::from_str(&json).map_err(SnapError::Deserialize)?;
    from_document(document)
}

fn record_from(cookie: CanonicalCookie) -> CookieRecord {
    CookieRecord {
        name: cookie.name,
        value: cookie.value,
        domain: cookie.domain,
        path: cookie.path,
        secure: cookie.secure,
        http_only: cookie.http_only,
        host_only: cookie.host_only,
        same_site: cookie.same_site,
        expires_unix_secs: cookie.expiration_time.map(|t| t.unix_timestamp()),
        creation_unix_secs: cookie.creation_time.unix_timestamp(),
    }
}

fn cookie_from(record: CookieRecord) -> Result<CanonicalCookie, SnapError> {
    let creation_time = OffsetDateTime::from_unix_timestamp(record.creation_unix_secs).map_err(
        |_| SnapError::InvalidTimestamp {
            name: record.name.clone(),
            secs: record.creation_unix_secs,
        },
    )?;

    let expiration_time = match record.expires_unix_secs {
        Some(secs) => {
            Some(
                OffsetDateTime::from_unix_timestamp(secs).map_err(|_| {
                    SnapError::InvalidTimestamp {
                        name: record.name.clone(),
                        secs,
                    }
                })?,
            )
        }
        None => None,
    };

    Ok(CanonicalCookie {
        name: record.name,
        value: record.value,
        domain: record.domain,
        path: record.path,
        creation_time,
        expiration_time,
        last_access_time: creation_time,
        secure: record.secure,
        http_only: record.http_only,
        host_only: record.host_only,
        same_site: record.same_site,
    })
}
