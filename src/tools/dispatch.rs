//! Routes a named invocation to the metadata client.
//!
//! Every tool maps to exactly one client call, except `list_glossary_terms`
//! with a `glossary_fqn`: the FQN is first resolved to the glossary id, and
//! the listing is only issued once that lookup has produced an id.

use std::sync::Arc;
use std::time::Instant;

use rmcp::model::JsonObject;

use crate::core::content::InvocationResult;
use crate::core::error::DispatchError;
use crate::domain::{
    entity_id, CursorQuery, DeleteOptions, Include, MetadataApi, TableListQuery,
};
use crate::infra::logging::record_tool_call;
use crate::tools::args::Args;
use crate::tools::catalog::ToolKind;

#[derive(Clone)]
pub struct Dispatcher {
    client: Arc<dyn MetadataApi>,
}

impl Dispatcher {
    pub fn new(client: Arc<dyn MetadataApi>) -> Self {
        Self { client }
    }

    /// Run one invocation. Only an unrecognized name is returned as `Err`;
    /// every other failure becomes an `Error: ...` text result.
    pub async fn dispatch(
        &self,
        name: &str,
        arguments: &JsonObject,
    ) -> Result<InvocationResult, DispatchError> {
        let kind = name.parse::<ToolKind>().map_err(|e| {
            tracing::warn!(tool = %name, "unknown tool requested");
            e
        })?;

        let started = Instant::now();
        let outcome = self.invoke(kind, arguments).await;
        let elapsed = started.elapsed();

        match outcome {
            Ok(result) => {
                tracing::info!(
                    tool = kind.name(),
                    elapsed_ms = elapsed.as_millis() as u64,
                    "tool call ok"
                );
                record_tool_call(kind.name(), "ok", elapsed);
                Ok(result)
            }
            Err(err) => {
                tracing::warn!(
                    tool = kind.name(),
                    kind = err.kind(),
                    error = %err,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "tool call failed"
                );
                record_tool_call(kind.name(), err.kind(), elapsed);
                Ok(InvocationResult::error(&err))
            }
        }
    }

    async fn invoke(
        &self,
        kind: ToolKind,
        raw: &JsonObject,
    ) -> Result<InvocationResult, DispatchError> {
        let args = Args::new(kind.descriptor(), raw);
        args.check_required()?;

        let payload = match kind {
            ToolKind::ListTables => {
                let query = TableListQuery {
                    limit: args.limit()?,
                    offset: args.offset()?,
                    ..TableListQuery::default()
                };
                self.client.list_tables(&query).await?
            }
            ToolKind::GetTable => {
                let table_id = args.required_str("table_id")?;
                self.client
                    .get_table(table_id, args.optional_str("fields")?)
                    .await?
            }
            ToolKind::GetTableByName => {
                let fqn = args.required_str("fqn")?;
                self.client
                    .get_table_by_name(fqn, args.optional_str("fields")?)
                    .await?
            }
            ToolKind::CreateTable => {
                let data = args.required_object("table_data")?;
                self.client.create_table(data).await?
            }
            ToolKind::UpdateTable => {
                let table_id = args.required_str("table_id")?;
                let data = args.required_object("table_data")?;
                self.client.update_table(table_id, data).await?
            }
            ToolKind::DeleteTable => {
                let table_id = args.required_str("table_id")?;
                let opts = DeleteOptions {
                    hard_delete: args.bool("hard_delete")?,
                    recursive: args.bool("recursive")?,
                };
                self.client.delete_table(table_id, opts).await?;
                return Ok(InvocationResult::text(format!(
                    "Table {table_id} deleted successfully"
                )));
            }
            ToolKind::ListGlossaries => {
                let query = cursor_query(&args)?;
                self.client.list_glossaries(&query).await?
            }
            ToolKind::GetGlossaryByName => {
                let fqn = args.required_str("fqn")?;
                self.client
                    .get_glossary_by_name(fqn, args.optional_str("fields")?, args.include()?)
                    .await?
            }
            ToolKind::ListGlossaryTerms => {
                // validate the whole bag before the first remote call
                let query = cursor_query(&args)?;
                let glossary_id = match args.optional_str("glossary_fqn")? {
                    Some(fqn) => Some(self.resolve_glossary_id(fqn).await?),
                    None => None,
                };
                self.client
                    .list_glossary_terms(glossary_id.as_deref(), &query)
                    .await?
            }
            ToolKind::GetGlossaryTermByName => {
                let fqn = args.required_str("fqn")?;
                self.client
                    .get_glossary_term_by_name(fqn, args.optional_str("fields")?, args.include()?)
                    .await?
            }
        };

        Ok(InvocationResult::json(&payload))
    }

    async fn resolve_glossary_id(&self, fqn: &str) -> Result<String, DispatchError> {
        let glossary = self
            .client
            .get_glossary_by_name(fqn, Some("id"), Include::NonDeleted)
            .await
            .map_err(|e| DispatchError::ResolutionFailed {
                fqn: fqn.to_string(),
                reason: e.to_string(),
            })?;

        let id = entity_id(&glossary).ok_or_else(|| DispatchError::ResolutionFailed {
            fqn: fqn.to_string(),
            reason: "response carried no id".to_string(),
        })?;
        tracing::debug!(%fqn, glossary_id = %id, "resolved glossary");
        Ok(id.to_string())
    }
}

fn cursor_query(args: &Args<'_>) -> Result<CursorQuery, DispatchError> {
    Ok(CursorQuery {
        limit: args.limit()?,
        fields: args.optional_string("fields")?,
        before: args.optional_string("before")?,
        after: args.optional_string("after")?,
        include: args.include()?,
    })
}
