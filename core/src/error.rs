use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Malformed {feed} payload: {source}")]
    Payload {
        feed: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl ParseError {
    pub fn feed(&self) -> &'static str {
        match self {
            ParseError::Payload { feed, .. } => feed,
        }
    }
}
