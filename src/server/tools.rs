use std::collections::HashMap;
use std::sync::Arc;

use rmcp::model::{AnnotateAble, CallToolResult, Content, Implementation, ListResourcesResult, PaginatedRequestParam, ProtocolVersion, RawResource, Resource, ServerCapabilities, ServerInfo};
use serde::Deserialize;
use serde_json::json;

use rmcp::{
    Error as McpError, RoleServer, ServerHandler, model::*, schemars,
    service::RequestContext, tool,
};

use crate::provider::DocProvider;

/// URI of the static usage-instructions resource.
const USAGE_URI: &str = "docs://usage";

const USAGE_TEXT: &str = "Mod Development Documentation Server\n\n\
Start with 'get_providers' to see the registered documentation providers \
and their available versions. Then call 'get_structure' with a provider and \
version to browse the documentation tree with per-file previews, and \
'get_full_content' with a provider, version and file path to read a whole \
document. File paths are relative to the version root and may omit the \
'.md' extension.";

type ProviderRegistry = HashMap<String, Box<dyn DocProvider>>;

/// MCP server over a registry of documentation providers.
///
/// The registry is built once at startup and never mutated afterwards;
/// every tool result is plain text, including errors.
#[derive(Clone)]
pub struct DocServer {
    providers: Arc<ProviderRegistry>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetStructureRequest {
    #[schemars(description = "the documentation provider (e.g. neoforge)")]
    pub provider: String,
    #[schemars(description = "the documentation version (e.g. version-1.20)")]
    pub version: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetFullContentRequest {
    #[schemars(description = "the documentation provider (e.g. neoforge)")]
    pub provider: String,
    #[schemars(description = "the documentation version (e.g. version-1.20)")]
    pub version: String,
    #[schemars(description = "the path to the file, relative to the version root")]
    pub file_path: String,
}

#[tool(tool_box)]
impl DocServer {
    pub fn new(providers: ProviderRegistry) -> Self {
        Self {
            providers: Arc::new(providers),
        }
    }

    fn _create_resource_text(&self, uri: &str, name: &str) -> Resource {
        RawResource::new(uri, name.to_string()).no_annotation()
    }

    fn sorted_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.providers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Overview of every registered provider and its versions.
    pub fn provider_overview(&self) -> String {
        let names = self.sorted_names();
        if names.is_empty() {
            return "No documentation providers registered.".to_string();
        }

        let mut result = Vec::new();
        for name in names {
            result.push(format!("## {name}"));

            let versions = self.providers[name].get_versions();
            if versions.starts_with("Error") || versions.starts_with("No versions") {
                result.push(format!("\n{versions}"));
            } else {
                result.push("\n**Available versions:**\n".to_string());
                for version in versions.lines() {
                    result.push(format!("- {version}"));
                }
            }

            result.push("\n".to_string());
        }

        result.join("\n")
    }

    /// Error text for a provider name that is not in the registry.
    pub fn unknown_provider_message(&self, requested: &str) -> String {
        format!(
            "Error: Provider '{requested}' not found. Available providers: {}",
            self.sorted_names().join(", ")
        )
    }

    #[tool(description = "Get a list of available documentation providers and their versions")]
    async fn get_providers(&self) -> Result<CallToolResult, McpError> {
        Ok(CallToolResult::success(vec![Content::text(
            self.provider_overview(),
        )]))
    }

    #[tool(description = "Get the file structure with previews for a specific version of documentation")]
    async fn get_structure(
        &self,
        #[tool(aggr)] GetStructureRequest { provider, version }: GetStructureRequest,
    ) -> Result<CallToolResult, McpError> {
        let text = match self.providers.get(&provider) {
            Some(p) => p.get_structure(&version),
            None => self.unknown_provider_message(&provider),
        };
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    #[tool(description = "Get the full content of a documentation file")]
    async fn get_full_content(
        &self,
        #[tool(aggr)] GetFullContentRequest { provider, version, file_path }: GetFullContentRequest,
    ) -> Result<CallToolResult, McpError> {
        let text = match self.providers.get(&provider) {
            Some(p) => p.get_full_content(&version, &file_path),
            None => self.unknown_provider_message(&provider),
        };
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }
}

#[tool(tool_box)]
impl ServerHandler for DocServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder()
                .enable_resources()
                .enable_tools()
                .build(),
            server_info: Implementation::from_build_env(),
            instructions: Some("This server provides tools to browse mod-development documentation. Use 'get_providers' to list providers and versions, 'get_structure' to inspect a version's documentation tree with previews, and 'get_full_content' to fetch a whole documentation file.".to_string()),
        }
    }

    async fn list_resources(
        &self,
        _request: PaginatedRequestParam,
        _: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        Ok(ListResourcesResult {
            resources: vec![self._create_resource_text(USAGE_URI, "usage")],
            next_cursor: None,
        })
    }

    async fn read_resource(
        &self,
        ReadResourceRequestParam { uri }: ReadResourceRequestParam,
        _: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        match uri.as_str() {
            USAGE_URI => Ok(ReadResourceResult {
                contents: vec![ResourceContents::text(USAGE_TEXT, uri)],
            }),
            _ => Err(McpError::resource_not_found(
                "resource_not_found",
                Some(json!({
                    "uri": uri
                })),
            )),
        }
    }
}
