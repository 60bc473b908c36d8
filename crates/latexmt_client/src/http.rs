use url::Url;

use crate::{ClientSettings, FailureKind, FetchError};

/// Resolves `path` (relative, e.g. `api/jobs`) against the server base URL,
/// keeping any path prefix the base carries.
pub fn endpoint_url(base: &Url, path: &str) -> Result<Url, FetchError> {
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let with_slash = format!("{}/", base.path());
        base.set_path(&with_slash);
    }
    base.join(path.trim_start_matches('/'))
        .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))
}

/// `reqwest`-backed implementation of the server's HTTP API.
#[derive(Debug, Clone)]
pub struct ReqwestApi {
    base_url: Url,
    client: reqwest::Client,
}

impl ReqwestApi {
    pub fn new(settings: &ClientSettings) -> Result<Self, FetchError> {
        let base_url = Url::parse(&settings.base_url)
            .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(FetchError::new(
                FailureKind::InvalidUrl,
                format!("unsupported scheme {}", base_url.scheme()),
            ));
        }

        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout())
            .timeout(settings.request_timeout())
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))?;

        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub(crate) fn client(&self) -> &reqwest::Client {
        &self.client
    }

    pub(crate) fn endpoint(&self, path: &str) -> Result<Url, FetchError> {
        endpoint_url(&self.base_url, path)
    }
}

pub(crate) fn status_error(status: reqwest::StatusCode) -> FetchError {
    FetchError::new(FailureKind::HttpStatus(status.as_u16()), status.to_string())
}

pub(crate) fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_decode() {
        return FetchError::new(FailureKind::Decode, err.to_string());
    }
    FetchError::new(FailureKind::Network, err.to_string())
}
