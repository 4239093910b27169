use crate::infra::config::OpenMetadataConfig;

/// Build the shared reqwest client with the configured connect/request timeouts.
/// Redirects are not followed: the catalog API answers directly.
pub fn make_http_client(cfg: &OpenMetadataConfig) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .connect_timeout(cfg.connect_timeout)
        .timeout(cfg.request_timeout)
        .redirect(reqwest::redirect::Policy::none())
        .build()
}
