//! Per-URL cookie listing for the console.
//!
//! Each line shows the URL left-aligned in a fixed column, then the
//! cookie's display form cut to the active display width.

use url::Url;

use crate::cookies::jar::CookieJar;

/// Width of the URL column. The cookie column starts after it plus one
/// separating space, which is where the truncation margin of 31 comes
/// from.
const URL_COLUMN: usize = 30;

const ELLIPSIS: &str = "...";

/// Fallback when `COLUMNS` is unset or unparseable.
pub const DEFAULT_WIDTH: usize = 120;

/// Active display width: the `COLUMNS` environment variable when present
/// and numeric, else [`DEFAULT_WIDTH`].
pub fn display_width() -> usize {
    std::env::var("COLUMNS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_WIDTH)
}

/// Print one line per applicable cookie for each URL, in the order the
/// URLs are given. Does not mutate the jar.
pub fn report(urls: &[Url], jar: &CookieJar, width: usize) {
    for url in urls {
        for cookie in jar.cookies_for_url(url) {
            println!(
                "{:<col$} {}",
                url,
                truncate(&cookie.to_string(), width),
                col = URL_COLUMN
            );
        }
    }
}

/// Cut `text` to fit next to the URL column on a `width`-column display:
/// anything longer than `width - 31` characters is cut to `width - 34`
/// and finished with `...`. Operates on char boundaries.
pub fn truncate(text: &str, width: usize) -> String {
    let available = width.saturating_sub(URL_COLUMN + 1);
    if text.chars().count() <= available {
        return text.to_string();
    }

    let kept: String = text
        .chars()
        .take(available.saturating_sub(ELLIPSIS.len()))
        .collect();
    format!("{kept}{ELLIPSIS}")
}
