use anyhow::Context;
use tempfile::NamedTempFile;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};
use url::Url;

use cookiesnap::cookies::jar::CookieJar;
use cookiesnap::cookies::persist;
use cookiesnap::error::SnapError;
use cookiesnap::fetch::Fetcher;
use cookiesnap::report;

const DEFAULT_PAGES: [&str; 4] = [
    "http://www.couchbase.com/",
    "http://www.github.com/",
    "http://www.apple.com/",
    "http://www.google.com/",
];

/// URLs from the command line, or the default page list.
fn configured_urls() -> Result<Vec<Url>, SnapError> {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let raw: Vec<&str> = if args.is_empty() {
        DEFAULT_PAGES.to_vec()
    } else {
        args.iter().map(String::as_str).collect()
    };

    raw.into_iter()
        .map(|s| {
            Url::parse(s).map_err(|source| SnapError::InvalidUrl {
                url: s.to_string(),
                source,
            })
        })
        .collect()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logging
    let _ = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .finish()
        .try_init();

    let urls = configured_urls()?;
    let width = report::display_width();

    let jar = CookieJar::new();
    let fetcher = Fetcher::new()?;

    println!("\nDownloading some URIs...\n");
    let outcomes = fetcher.fetch_all(&urls, &jar).await;
    let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
    if failed > 0 {
        println!(
            "{failed} of {} fetches failed; continuing with the cookies we have",
            outcomes.len()
        );
    }

    println!("\nHere are the cookies we received...\n");
    report::report(&urls, &jar, width);

    let file = NamedTempFile::new().context("creating the cookie temp file")?;
    println!("\nSaving them to disk at {}\n", file.path().display());
    persist::save_jar(&jar, file.path()).context("saving the cookie store")?;

    // Discard the in-memory store; the reload must stand on the file alone.
    jar.clear();
    drop(jar);

    println!("\nNow loading from disk...\n");
    let jar = persist::load_jar(file.path()).context("reloading the cookie store")?;
    report::report(&urls, &jar, width);

    file.close().context("removing the cookie temp file")?;
    Ok(())
}
