use std::ops::Deref;

use reqwest::header::HeaderMap;

use crate::{error::Error, http::HttpFetch};

pub struct Scraper(pub reqwest::Client);

impl Default for Scraper {
    fn default() -> Self {
        Scraper(reqwest::Client::new())
    }
}

impl Deref for Scraper {
    type Target = reqwest::Client;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl HttpFetch for Scraper {
    async fn get_bytes(&self, url: &str, headers: HeaderMap) -> Result<Vec<u8>, Error> {
        let resp = self
            .get(url)
            .headers(headers)
            .header("Accept-Language", "en-US,en;q=0.9")
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to make http request"))?;

        if !resp.status().is_success() {
            return Err(Error::Status {
                status: resp.status().as_u16(),
                url: url.to_owned(),
            });
        }

        Ok(resp.bytes().await?.to_vec())
    }
}
