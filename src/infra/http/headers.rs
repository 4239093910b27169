use reqwest::RequestBuilder;

use crate::infra::config::Auth;

/// Generate a simple request id suitable for logging/correlation.
pub fn generate_request_id() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    format!("omgw-{}-{}", now.as_secs(), now.subsec_nanos())
}

/// Add standard headers to an outgoing request. Returns the updated builder
/// and the request id used.
pub fn add_standard_headers(
    builder: RequestBuilder,
    request_id: Option<String>,
) -> (RequestBuilder, String) {
    let rid = request_id.unwrap_or_else(generate_request_id);
    let b = builder.header("x-request-id", rid.as_str()).header(
        reqwest::header::USER_AGENT,
        format!("openmetadata-mcp-gateway/{}", env!("CARGO_PKG_VERSION")),
    );
    (b, rid)
}

/// Attach credentials. Basic auth is not wired: the request goes out unauthenticated.
pub fn apply_auth(builder: RequestBuilder, auth: &Auth) -> RequestBuilder {
    match auth {
        Auth::Bearer(token) => builder.bearer_auth(token),
        Auth::Basic { .. } => builder,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_ids_carry_prefix() {
        assert!(generate_request_id().starts_with("omgw-"));
    }

    #[test]
    fn standard_headers_keep_given_request_id() {
        let client = reqwest::Client::new();
        let (builder, rid) =
            add_standard_headers(client.get("http://localhost/x"), Some("rid-1".into()));
        assert_eq!(rid, "rid-1");
        let req = builder.build().unwrap();
        assert_eq!(req.headers()["x-request-id"], "rid-1");
        assert!(req.headers()[reqwest::header::USER_AGENT]
            .to_str()
            .unwrap()
            .starts_with("openmetadata-mcp-gateway/"));
    }

    #[test]
    fn bearer_auth_sets_authorization_header() {
        let client = reqwest::Client::new();
        let req = apply_auth(client.get("http://localhost/x"), &Auth::Bearer("tok".into()))
            .build()
            .unwrap();
        assert_eq!(req.headers()[reqwest::header::AUTHORIZATION], "Bearer tok");
    }

    #[test]
    fn basic_auth_sends_no_credentials() {
        let client = reqwest::Client::new();
        let auth = Auth::Basic {
            username: "admin".into(),
            password: "secret".into(),
        };
        let req = apply_auth(client.get("http://localhost/x"), &auth)
            .build()
            .unwrap();
        assert!(req.headers().get(reqwest::header::AUTHORIZATION).is_none());
    }
}
