//! Metadata-side data model and the client seam the dispatcher calls through.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::clients::ClientError;

pub const MIN_LIMIT: i64 = 1;
pub const MAX_LIMIT: i64 = 1_000_000;

/// Page size accepted by the catalog API. Construction always clamps into
/// `[MIN_LIMIT, MAX_LIMIT]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limit(u32);

impl Limit {
    pub fn clamped(raw: i64) -> Self {
        // MAX_LIMIT fits in u32
        Limit(raw.clamp(MIN_LIMIT, MAX_LIMIT) as u32)
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for Limit {
    fn default() -> Self {
        Limit(10)
    }
}

/// Soft-delete visibility filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Include {
    All,
    Deleted,
    #[default]
    NonDeleted,
}

impl Include {
    pub const VALUES: [&'static str; 3] = ["all", "deleted", "non-deleted"];

    pub fn as_str(self) -> &'static str {
        match self {
            Include::All => "all",
            Include::Deleted => "deleted",
            Include::NonDeleted => "non-deleted",
        }
    }
}

impl fmt::Display for Include {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Include {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Include::All),
            "deleted" => Ok(Include::Deleted),
            "non-deleted" => Ok(Include::NonDeleted),
            other => Err(format!("unsupported include filter: {other}")),
        }
    }
}

/// Offset pagination used by the table listing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TableListQuery {
    pub limit: Limit,
    pub offset: u64,
    pub fields: Option<String>,
    pub database: Option<String>,
    pub include_deleted: bool,
}

/// Cursor pagination used by glossary and glossary-term listings.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CursorQuery {
    pub limit: Limit,
    pub fields: Option<String>,
    pub before: Option<String>,
    pub after: Option<String>,
    pub include: Include,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeleteOptions {
    pub hard_delete: bool,
    pub recursive: bool,
}

/// Extract the opaque identifier from an entity record.
pub fn entity_id(entity: &JsonValue) -> Option<&str> {
    entity
        .get("id")
        .and_then(|v| v.as_str())
        .filter(|id| !id.is_empty())
}

/// Typed operations over the remote catalog. Entity payloads stay opaque JSON.
#[async_trait::async_trait]
pub trait MetadataApi: Send + Sync + 'static {
    async fn list_tables(&self, query: &TableListQuery) -> Result<JsonValue, ClientError>;
    async fn get_table(&self, table_id: &str, fields: Option<&str>)
        -> Result<JsonValue, ClientError>;
    async fn get_table_by_name(&self, fqn: &str, fields: Option<&str>)
        -> Result<JsonValue, ClientError>;
    async fn create_table(&self, table_data: &JsonValue) -> Result<JsonValue, ClientError>;
    async fn update_table(
        &self,
        table_id: &str,
        table_data: &JsonValue,
    ) -> Result<JsonValue, ClientError>;
    async fn delete_table(&self, table_id: &str, opts: DeleteOptions) -> Result<(), ClientError>;
    async fn list_glossaries(&self, query: &CursorQuery) -> Result<JsonValue, ClientError>;
    async fn get_glossary_by_name(
        &self,
        fqn: &str,
        fields: Option<&str>,
        include: Include,
    ) -> Result<JsonValue, ClientError>;
    async fn list_glossary_terms(
        &self,
        glossary_id: Option<&str>,
        query: &CursorQuery,
    ) -> Result<JsonValue, ClientError>;
    async fn get_glossary_term_by_name(
        &self,
        fqn: &str,
        fields: Option<&str>,
        include: Include,
    ) -> Result<JsonValue, ClientError>;
}
