//! Byte lengths of enclosure media.
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LookupError {
    #[error("{0}")]
    HttpError(#[from] Box<ureq::Error>),

    #[error("No Content-Length for '{0}'")]
    MissingLength(String),

    #[error("Invalid Content-Length '{value}' for '{url}'")]
    InvalidLength { url: String, value: String },

    #[error("Length lookup disabled")]
    Unavailable,
}

/// Looks up the size of the media behind an enclosure URL.
pub trait EnclosureLength {
    fn length_of(&self, url: &str) -> Result<u64, LookupError>;
}

/// Asks the media host with a `HEAD` request.
pub struct HttpLengthProbe {
    agent: ureq::Agent,
}

impl HttpLengthProbe {
    pub fn new(timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self { agent }
    }
}

impl Default for HttpLengthProbe {
    fn default() -> Self {
        Self::new(Duration::from_secs(10))
    }
}

impl EnclosureLength for HttpLengthProbe {
    fn length_of(&self, url: &str) -> Result<u64, LookupError> {
        let response = self.agent.head(url).call().map_err(Box::new)?;
        let value = response
            .header("Content-Length")
            .ok_or_else(|| LookupError::MissingLength(url.to_owned()))?;
        let length = value.trim().parse::<u64>().map_err(|_| LookupError::InvalidLength {
            url: url.to_owned(),
            value: value.to_owned(),
        })?;
        tracing::debug!(url, length, "probed enclosure length");
        Ok(length)
    }
}

/// Reports the same length for every URL.
#[derive(Clone, Copy, Debug)]
pub struct FixedLength(pub u64);

impl EnclosureLength for FixedLength {
    fn length_of(&self, _url: &str) -> Result<u64, LookupError> {
        Ok(self.0)
    }
}

/// Never knows a length.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoLengthLookup;

impl EnclosureLength for NoLengthLookup {
    fn length_of(&self, _url: &str) -> Result<u64, LookupError> {
        Err(LookupError::Unavailable)
    }
}
