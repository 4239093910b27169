use std::time::Instant;

use reqwest::{Client, RequestBuilder, Response, Url};
use serde_json::Value as JsonValue;

use crate::clients::ClientError;
use crate::domain::{CursorQuery, DeleteOptions, Include, MetadataApi, TableListQuery};
use crate::infra::config::{Auth, OpenMetadataConfig};
use crate::infra::http::headers::{add_standard_headers, apply_auth};
use crate::infra::logging::record_remote_call;
use crate::infra::runtime::limits::make_http_client;

type Query = Vec<(&'static str, String)>;

/// REST client for the OpenMetadata `/api/v1` surface.
#[derive(Clone)]
pub struct OpenMetadataRemote {
    base: Url,
    http: Client,
    auth: Auth,
}

impl OpenMetadataRemote {
    pub fn from_config(cfg: &OpenMetadataConfig) -> Result<Self, ClientError> {
        let base = Url::parse(&cfg.host)
            .ok()
            .filter(|u| !u.cannot_be_a_base())
            .ok_or_else(|| ClientError::InvalidBase(cfg.host.clone()))?;
        if matches!(cfg.auth, Auth::Basic { .. }) {
            tracing::warn!(
                "basic auth is not implemented; metadata requests will be unauthenticated"
            );
        }
        let http = make_http_client(cfg)?;
        Ok(Self {
            base,
            http,
            auth: cfg.auth.clone(),
        })
    }

    /// `<base>/api/v1/<segments..>`, each segment percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(["api", "v1"]).extend(segments);
        }
        url
    }

    async fn send(
        &self,
        operation: &'static str,
        builder: RequestBuilder,
    ) -> Result<Response, ClientError> {
        let (builder, rid) = add_standard_headers(apply_auth(builder, &self.auth), None);
        tracing::debug!(operation, request_id = %rid, "openmetadata request");
        let start = Instant::now();
        let outcome = match builder.send().await {
            Ok(resp) if resp.status().is_success() => Ok(resp),
            Ok(resp) => {
                let status = resp.status().as_u16();
                let message = resp.text().await.unwrap_or_default();
                Err(ClientError::Status { status, message })
            }
            Err(e) => Err(ClientError::Transport(e)),
        };
        record_remote_call(operation, outcome.is_ok(), start.elapsed());
        if let Err(e) = &outcome {
            tracing::warn!(operation, request_id = %rid, error = %e, "openmetadata request failed");
        }
        outcome
    }

    async fn send_json(
        &self,
        operation: &'static str,
        builder: RequestBuilder,
    ) -> Result<JsonValue, ClientError> {
        let resp = self.send(operation, builder).await?;
        Ok(resp.json::<JsonValue>().await?)
    }

    async fn get(
        &self,
        operation: &'static str,
        segments: &[&str],
        query: &Query,
    ) -> Result<JsonValue, ClientError> {
        let builder = self.http.get(self.endpoint(segments)).query(query);
        self.send_json(operation, builder).await
    }
}

fn push_opt(query: &mut Query, key: &'static str, value: Option<&str>) {
    if let Some(v) = value.filter(|v| !v.is_empty()) {
        query.push((key, v.to_string()));
    }
}

fn fields_and_include(fields: Option<&str>, include: Include) -> Query {
    let mut query = vec![("include", include.to_string())];
    push_opt(&mut query, "fields", fields);
    query
}

fn cursor_params(query: &CursorQuery) -> Query {
    let mut params = vec![
        ("limit", query.limit.get().to_string()),
        ("include", query.include.to_string()),
    ];
    push_opt(&mut params, "fields", query.fields.as_deref());
    push_opt(&mut params, "before", query.before.as_deref());
    push_opt(&mut params, "after", query.after.as_deref());
    params
}

#[async_trait::async_trait]
impl MetadataApi for OpenMetadataRemote {
    async fn list_tables(&self, query: &TableListQuery) -> Result<JsonValue, ClientError> {
        let mut params = vec![
            ("limit", query.limit.get().to_string()),
            ("offset", query.offset.to_string()),
        ];
        push_opt(&mut params, "fields", query.fields.as_deref());
        push_opt(&mut params, "database", query.database.as_deref());
        if query.include_deleted {
            params.push(("include", Include::All.to_string()));
        }
        self.get("list_tables", &["tables"], &params).await
    }

    async fn get_table(
        &self,
        table_id: &str,
        fields: Option<&str>,
    ) -> Result<JsonValue, ClientError> {
        let mut params = Query::new();
        push_opt(&mut params, "fields", fields);
        self.get("get_table", &["tables", table_id], &params).await
    }

    async fn get_table_by_name(
        &self,
        fqn: &str,
        fields: Option<&str>,
    ) -> Result<JsonValue, ClientError> {
        let mut params = Query::new();
        push_opt(&mut params, "fields", fields);
        self.get("get_table_by_name", &["tables", "name", fqn], &params)
            .await
    }

    async fn create_table(&self, table_data: &JsonValue) -> Result<JsonValue, ClientError> {
        let builder = self.http.post(self.endpoint(&["tables"])).json(table_data);
        self.send_json("create_table", builder).await
    }

    async fn update_table(
        &self,
        table_id: &str,
        table_data: &JsonValue,
    ) -> Result<JsonValue, ClientError> {
        let builder = self
            .http
            .put(self.endpoint(&["tables", table_id]))
            .json(table_data);
        self.send_json("update_table", builder).await
    }

    async fn delete_table(&self, table_id: &str, opts: DeleteOptions) -> Result<(), ClientError> {
        let params = [
            ("hardDelete", opts.hard_delete.to_string()),
            ("recursive", opts.recursive.to_string()),
        ];
        let builder = self
            .http
            .delete(self.endpoint(&["tables", table_id]))
            .query(&params);
        self.send("delete_table", builder).await?;
        Ok(())
    }

    async fn list_glossaries(&self, query: &CursorQuery) -> Result<JsonValue, ClientError> {
        self.get("list_glossaries", &["glossaries"], &cursor_params(query))
            .await
    }

    async fn get_glossary_by_name(
        &self,
        fqn: &str,
        fields: Option<&str>,
        include: Include,
    ) -> Result<JsonValue, ClientError> {
        let params = fields_and_include(fields, include);
        self.get("get_glossary_by_name", &["glossaries", "name", fqn], &params)
            .await
    }

    async fn list_glossary_terms(
        &self,
        glossary_id: Option<&str>,
        query: &CursorQuery,
    ) -> Result<JsonValue, ClientError> {
        let mut params = cursor_params(query);
        push_opt(&mut params, "glossary", glossary_id);
        self.get("list_glossary_terms", &["glossaryTerms"], &params)
            .await
    }

    async fn get_glossary_term_by_name(
        &self,
        fqn: &str,
        fields: Option<&str>,
        include: Include,
    ) -> Result<JsonValue, ClientError> {
        let params = fields_and_include(fields, include);
        self.get(
            "get_glossary_term_by_name",
            &["glossaryTerms", "name", fqn],
            &params,
        )
        .await
    }
}
