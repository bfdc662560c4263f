use std::fmt;

use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc2822;
use time::OffsetDateTime;

/// A single cookie with every attribute the store keeps for it.
///
/// Identity within the store is (name, domain, path). `host_only`
/// distinguishes cookies that match the request host exactly from
/// domain cookies that also match subdomains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalCookie {
    pub name: String,
    pub value: String,
    pub domain: String,
    pub path: String,
    pub creation_time: OffsetDateTime,
    pub expiration_time: Option<OffsetDateTime>,
    pub last_access_time: OffsetDateTime,
    pub secure: bool,
    pub http_only: bool,
    pub host_only: bool,
    pub same_site: SameSite,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SameSite {
    Unspecified,
    NoRestriction,
    Lax,
    Strict,
}

impl CanonicalCookie {
    pub fn new(
        name: String,
        value: String,
        domain: String,
        path: String,
        creation_time: OffsetDateTime,
        expiration_time: Option<OffsetDateTime>,
    ) -> Self {
        Self {
            name,
            value,
            domain,
            path,
            creation_time,
            expiration_time,
            last_access_time: creation_time,
            secure: false,
            http_only: false,
            host_only: true,
            same_site: SameSite::Unspecified,
        }
    }

    /// Session cookies (no expiry) never expire.
    pub fn is_expired(&self, current_time: OffsetDateTime) -> bool {
        match self.expiration_time {
            Some(expiry) => expiry < current_time,
            None => false,
        }
    }

    /// `__Secure-` and `__Host-` name prefix rules per RFC 6265bis.
    /// - `__Secure-` cookies require the Secure attribute and a secure origin
    /// - `__Host-` cookies additionally require Path="/" and no Domain attribute
    pub fn prefix_is_valid(&self, secure_origin: bool) -> bool {
        if self.name.starts_with("__Secure-") && (!self.secure || !secure_origin) {
            return false;
        }

        if self.name.starts_with("__Host-")
            && (!self.secure || self.path != "/" || !self.host_only || !secure_origin)
        {
            return false;
        }

        true
    }

    /// Copy with every timestamp clamped to whole seconds, the
    /// resolution the persisted document keeps. The store applies this
    /// on insert so a reloaded cookie compares equal to the one that
    /// was saved.
    pub(crate) fn at_second_resolution(mut self) -> Self {
        self.creation_time = strip_subsecond(self.creation_time);
        self.last_access_time = strip_subsecond(self.last_access_time);
        self.expiration_time = self.expiration_time.map(strip_subsecond);
        self
    }
}

fn strip_subsecond(t: OffsetDateTime) -> OffsetDateTime {
    t.replace_nanosecond(0).unwrap_or(t)
}

impl fmt::Display for CanonicalCookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}={}; Domain={}; Path={}",
            self.name, self.value, self.domain, self.path
        )?;
        if let Some(expiry) = self.expiration_time {
            if let Ok(stamp) = expiry.format(&Rfc2822) {
                write!(f, "; Expires={stamp}")?;
            }
        }
        if self.secure {
            write!(f, "; Secure")?;
        }
        if self.http_only {
            write!(f, "; HttpOnly")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_cookie(name: &str) -> CanonicalCookie {
        CanonicalCookie::new(
            name.to_string(),
            "v".to_string(),
            "example.com".to_string(),
            "/".to_string(),
            OffsetDateTime::now_utc(),
            None,
        )
    }

    #[test]
    fn session_cookie_never_expires() {
        let cookie = base_cookie("session");
        assert!(!cookie.is_expired(OffsetDateTime::now_utc() + time::Duration::days(10_000)));
    }

    #[test]
    fn expired_cookie_detected() {
        let mut cookie = base_cookie("old");
        cookie.expiration_time = Some(OffsetDateTime::now_utc() - time::Duration::hours(1));
        assert!(cookie.is_expired(OffsetDateTime::now_utc()));
    }

    #[test]
    fn display_includes_attributes() {
        let mut cookie = base_cookie("id");
        cookie.secure = true;
        cookie.http_only = true;
        let rendered = cookie.to_string();
        assert!(rendered.starts_with("id=v; Domain=example.com; Path=/"));
        assert!(rendered.contains("; Secure"));
        assert!(rendered.contains("; HttpOnly"));
        assert!(!rendered.contains("Expires"));
    }

    #[test]
    fn display_renders_expiry() {
        let mut cookie = base_cookie("id");
        cookie.expiration_time = Some(OffsetDateTime::from_unix_timestamp(1_735_689_600).unwrap());
        assert!(cookie.to_string().contains("Expires="));
    }

    #[test]
    fn secure_prefix_requires_secure_attribute() {
        let mut cookie = base_cookie("__Secure-id");
        assert!(!cookie.prefix_is_valid(true));
        cookie.secure = true;
        assert!(cookie.prefix_is_valid(true));
        assert!(!cookie.prefix_is_valid(false));
    }

    #[test]
    fn host_prefix_requires_root_path_and_host_only() {
        let mut cookie = base_cookie("__Host-id");
        cookie.secure = true;
        assert!(cookie.prefix_is_valid(true));

        cookie.path = "/app".to_string();
        assert!(!cookie.prefix_is_valid(true));

        cookie.path = "/".to_string();
        cookie.host_only = false;
        assert!(!cookie.prefix_is_valid(true));
    }

    #[test]
    fn unprefixed_names_are_unrestricted() {
        let cookie = base_cookie("plain");
        assert!(cookie.prefix_is_valid(false));
    }
}
