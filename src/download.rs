//! Remote raw assets.
//!
//! The pipeline only sees the [`Fetcher`] trait; failures surface as
//! `Error::Download` and are never retried here. The blocking HTTP
//! implementation lives behind the `download` feature.

use crate::Result;

/// Fetches the full body of a URL.
pub trait Fetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

impl<F> Fetcher for F
where
    F: Fn(&str) -> Result<Vec<u8>>,
{
    fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        self(url)
    }
}

/// Plain HTTP GET via `ureq`.
#[cfg(feature = "download")]
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher;

#[cfg(feature = "download")]
impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        use std::io::Read;
        use crate::Error;

        let failed = |message: String| Error::Download { url: url.to_string(), message };

        let response = ureq::get(url).call().map_err(|e| failed(e.to_string()))?;
        if response.status() >= 400 {
            return Err(failed(format!("HTTP {}", response.status())));
        }

        let mut body = Vec::new();
        response
            .into_reader()
            .read_to_end(&mut body)
            .map_err(|e| failed(e.to_string()))?;

        tracing::info!(url, bytes = body.len(), "downloaded");
        Ok(body)
    }
}
