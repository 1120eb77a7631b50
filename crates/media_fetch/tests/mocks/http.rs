use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use media_fetch::{http::HttpFetch, Error};
use reqwest::header::HeaderMap;

#[derive(Clone, Default)]
pub struct MockHttp {
    pub routes: HashMap<String, (u16, Vec<u8>)>,
    pub calls: Arc<Mutex<Vec<(String, HeaderMap)>>>,
}

impl MockHttp {
    pub fn route(mut self, url: &str, body: impl Into<Vec<u8>>) -> Self {
        self.routes.insert(url.to_string(), (200, body.into()));
        self
    }

    pub fn failing(mut self, url: &str, status: u16) -> Self {
        self.routes.insert(url.to_string(), (status, Vec::new()));
        self
    }

    pub fn requested_urls(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(url, _)| url.clone())
            .collect()
    }
}

impl HttpFetch for MockHttp {
    async fn get_bytes(&self, url: &str, headers: HeaderMap) -> Result<Vec<u8>, Error> {
        self.calls.lock().unwrap().push((url.to_string(), headers));

        match self.routes.get(url) {
            Some((status, body)) if (200..300).contains(status) => Ok(body.clone()),
            Some((status, _)) => Err(Error::Status {
                status: *status,
                url: url.to_string(),
            }),
            None => Err(Error::Status {
                status: 404,
                url: url.to_string(),
            }),
        }
    }
}
