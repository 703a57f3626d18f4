use super::config::HttpConfig;
use reqwest::{
    Proxy,
    blocking::{Client, ClientBuilder},
};
use std::time::Duration;

#[derive(thiserror::Error, Debug)]
pub enum ReqwestBuildError {
    #[error("could not build the reqwest client: {0}")]
    ClientBuilder(String),
}

/// Builds a reqwest blocking client according to the provided configuration.
pub fn try_build_reqwest_client(config: HttpConfig) -> Result<Client, ReqwestBuildError> {
    let mut builder = reqwest_builder_with_timeout(config.timeout, config.conn_timeout);

    if let Some(proxy_url) = config.proxy {
        let proxy = Proxy::all(proxy_url)
            .map_err(|err| ReqwestBuildError::ClientBuilder(format!("invalid proxy url: {err}")))?;
        builder = builder.proxy(proxy);
    }

    builder
        .build()
        .map_err(|err| ReqwestBuildError::ClientBuilder(err.to_string()))
}

/// Returns a reqwest [ClientBuilder] with the default setup and the provided timeout values.
pub fn reqwest_builder_with_timeout(
    timeout: Option<Duration>,
    conn_timeout: Duration,
) -> ClientBuilder {
    Client::builder()
        .use_rustls_tls() // Use rust-tls backend
        .tls_built_in_native_certs(true) // Load system (native) certificates
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .timeout(timeout)
        .connect_timeout(conn_timeout)
}
