use crate::{
    auth::{Anonymous, AuthProvider},
    http::HttpFetch,
    FetchConfig, MediaFetcher,
};

pub struct MediaFetcherBuilder<H = (), A = Anonymous> {
    config: FetchConfig,
    http: H,
    auth: A,
}

impl MediaFetcherBuilder {
    pub fn new(client_id: impl Into<String>) -> Self {
        Self {
            config: FetchConfig::new(client_id),
            http: (),
            auth: Anonymous,
        }
    }
}

impl<H, A> MediaFetcherBuilder<H, A> {
    pub fn http<H2: HttpFetch>(self, http: H2) -> MediaFetcherBuilder<H2, A> {
        MediaFetcherBuilder {
            config: self.config,
            http,
            auth: self.auth,
        }
    }

    pub fn auth<A2: AuthProvider>(self, auth: A2) -> MediaFetcherBuilder<H, A2> {
        MediaFetcherBuilder {
            config: self.config,
            http: self.http,
            auth,
        }
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    pub fn api_base(mut self, api_base: impl Into<String>) -> Self {
        self.config.api_base = api_base.into();
        self
    }
}

impl<H, A> MediaFetcherBuilder<H, A>
where
    H: HttpFetch,
    A: AuthProvider,
{
    pub fn build(self) -> MediaFetcher<H, A> {
        MediaFetcher::new(self.config, self.http, self.auth)
    }
}
