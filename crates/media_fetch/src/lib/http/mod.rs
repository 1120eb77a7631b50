pub mod scraper;

use std::future::Future;

use reqwest::header::HeaderMap;

use crate::error::Error;

/// Plain GET access to the track host and its CDN
pub trait HttpFetch {
    /// Fetches `url` with `headers` and returns the body.
    /// Non-success statuses are reported as [`Error::Status`].
    fn get_bytes(
        &self,
        url: &str,
        headers: HeaderMap,
    ) -> impl Future<Output = Result<Vec<u8>, Error>>;

    fn get_text(
        &self,
        url: &str,
        headers: HeaderMap,
    ) -> impl Future<Output = Result<String, Error>> {
        async move {
            let body = self.get_bytes(url, headers).await?;
            Ok(String::from_utf8_lossy(&body).into_owned())
        }
    }
}

impl<H: HttpFetch> HttpFetch for &H {
    async fn get_bytes(&self, url: &str, headers: HeaderMap) -> Result<Vec<u8>, Error> {
        (**self).get_bytes(url, headers).await
    }
}
