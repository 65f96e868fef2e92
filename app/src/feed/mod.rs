use crate::error::FetchError;
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

#[cfg(test)]
pub mod mock;

/// A read-only upstream source returning a raw JSON body
#[async_trait]
pub trait Feed: Send + Sync {
    fn name(&self) -> &str;

    async fn fetch(&self) -> Result<String, FetchError>;
}

/// Plain timed GET against an upstream endpoint
pub struct HttpFeed {
    name: String,
    url: String,
    client: reqwest::Client,
}

impl HttpFeed {
    pub fn new(name: &str, url: &str, timeout: Duration) -> Result<Self, FetchError> {
        Ok(Self::with_client(name, url, http_client(timeout)?))
    }

    /// Shares one connection pool between feeds
    pub fn with_client(name: &str, url: &str, client: reqwest::Client) -> Self {
        HttpFeed {
            name: name.to_owned(),
            url: url.to_owned(),
            client,
        }
    }

    fn classify(&self, err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::Timeout {
                feed: self.name.clone(),
            }
        } else {
            FetchError::Unreachable {
                feed: self.name.clone(),
                source: err,
            }
        }
    }
}

#[async_trait]
impl Feed for HttpFeed {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self) -> Result<String, FetchError> {
        let resp = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                feed: self.name.clone(),
                status: status.as_u16(),
            });
        }

        let body = resp.text().await.map_err(|e| self.classify(e))?;
        debug!(feed = self.name.as_str(), bytes = body.len(), "Fetched feed");
        Ok(body)
    }
}

/// Builds the http client shared by both feeds
pub fn http_client(timeout: Duration) -> Result<reqwest::Client, FetchError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(FetchError::Client)
}
