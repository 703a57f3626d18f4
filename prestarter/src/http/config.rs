use crate::defaults::DEFAULT_CONNECT_TIMEOUT_SECS;
use std::time::Duration;
use url::Url;

#[derive(Debug, Clone, PartialEq)]
pub struct HttpConfig {
    /// Deadline for a whole request, body included. `None` lets big downloads take their time.
    pub(crate) timeout: Option<Duration>,
    pub(crate) conn_timeout: Duration,
    pub(crate) proxy: Option<Url>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: None,
            conn_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            proxy: None,
        }
    }
}

impl HttpConfig {
    pub fn new(timeout: Option<Duration>, conn_timeout: Duration) -> Self {
        Self {
            timeout,
            conn_timeout,
            proxy: None,
        }
    }

    pub fn with_proxy(self, proxy: Url) -> Self {
        Self {
            proxy: Some(proxy),
            ..self
        }
    }
}
