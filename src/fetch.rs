//! Concurrent page fetches sharing one cookie jar.
//!
//! Redirects are followed manually rather than by the client: every hop
//! must drain its `Set-Cookie` headers into the jar and send the jar's
//! cookies, and an automatic redirect policy would hide the intermediate
//! responses.

use std::time::Duration;

use futures::future::join_all;
use reqwest::header::{COOKIE, LOCATION, SET_COOKIE};
use reqwest::StatusCode;
use url::Url;

use crate::cookies::jar::CookieJar;
use crate::error::SnapError;

/// Redirect hop limit per URL (Chromium's default).
const REDIRECT_LIMIT: usize = 20;

const USER_AGENT: &str = concat!("cookiesnap/", env!("CARGO_PKG_VERSION"));

/// What happened to one URL of the batch.
#[derive(Debug)]
pub struct FetchOutcome {
    pub url: Url,
    pub result: Result<FetchSummary, SnapError>,
}

/// A request that reached a terminal, successful response.
#[derive(Debug)]
pub struct FetchSummary {
    pub final_url: Url,
    pub status: StatusCode,
    pub body_len: usize,
}

/// Issues the batch's GET requests against a shared [`CookieJar`].
#[derive(Clone)]
pub struct Fetcher {
    http: reqwest::Client,
}

impl Fetcher {
    pub fn new() -> Result<Self, SnapError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::none())
            .timeout(Duration::from_secs(20))
            .build()
            .map_err(SnapError::Client)?;

        Ok(Self { http })
    }

    /// Fetch every URL concurrently, mutating `jar` as `Set-Cookie`
    /// headers arrive. Returns once every request has completed or
    /// failed; per-URL failures are reported and collected in the
    /// outcomes, never fatal to the batch. Prints the body length of
    /// each successful response as it completes.
    pub async fn fetch_all(&self, urls: &[Url], jar: &CookieJar) -> Vec<FetchOutcome> {
        let tasks = urls.iter().map(|url| async move {
            let result = self.fetch_one(url, jar).await;
            match &result {
                Ok(summary) => println!("uri: {url}, length: {}", summary.body_len),
                Err(error) => eprintln!("uri: {url}, error: {error}"),
            }
            FetchOutcome {
                url: url.clone(),
                result,
            }
        });

        join_all(tasks).await
    }

    async fn fetch_one(&self, url: &Url, jar: &CookieJar) -> Result<FetchSummary, SnapError> {
        let mut current = url.clone();

        for _ in 0..REDIRECT_LIMIT {
            let mut request = self.http.get(current.clone());

            let cookies = jar.cookies_for_url(&current);
            if !cookies.is_empty() {
                // "name=value; name2=value2", already in precedence order
                let header = cookies
                    .iter()
                    .map(|c| format!("{}={}", c.name, c.value))
                    .collect::<Vec<_>>()
                    .join("; ");
                request = request.header(COOKIE, header);
            }

            let response = request.send().await.map_err(|source| SnapError::Fetch {
                url: current.to_string(),
                source,
            })?;

            for value in response.headers().get_all(SET_COOKIE) {
                if let Ok(s) = value.to_str() {
                    jar.set_from_header(&current, s);
                }
            }

            let status = response.status();
            if status.is_redirection() {
                let next = response
                    .headers()
                    .get(LOCATION)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|loc| current.join(loc).ok());
                if let Some(next) = next {
                    tracing::debug!(from = %current, to = %next, "following redirect");
                    current = next;
                    continue;
                }
                // No usable Location; treat the 3xx as terminal below.
            }

            if !status.is_success() {
                return Err(SnapError::HttpStatus {
                    url: current.to_string(),
                    status,
                });
            }

            let body = response.bytes().await.map_err(|source| SnapError::Fetch {
                url: current.to_string(),
                source,
            })?;

            return Ok(FetchSummary {
                final_url: current,
                status,
                body_len: body.len(),
            });
        }

        Err(SnapError::TooManyRedirects {
            url: url.to_string(),
        })
    }
}
