use std::collections::HashMap;

use moddoc_mcp_rs::provider::DocProvider;
use moddoc_mcp_rs::server::DocServer;

/// Canned provider so registry behavior can be tested without a mirror.
struct StubProvider {
    versions: String,
}

impl DocProvider for StubProvider {
    fn get_versions(&self) -> String {
        self.versions.clone()
    }

    fn get_structure(&self, version: &str) -> String {
        format!("structure for {version}")
    }

    fn get_preview(&self, _version: &str, file_path: &str) -> String {
        format!("preview of {file_path}")
    }

    fn get_full_content(&self, _version: &str, file_path: &str) -> String {
        format!("content of {file_path}")
    }
}

fn registry(versions: &str) -> HashMap<String, Box<dyn DocProvider>> {
    let mut providers: HashMap<String, Box<dyn DocProvider>> = HashMap::new();
    providers.insert(
        "neoforge".to_string(),
        Box::new(StubProvider {
            versions: versions.to_string(),
        }),
    );
    providers
}

#[test]
fn test_overview_lists_provider_versions() {
    let server = DocServer::new(registry("version-1.20\nversion-1.21"));
    let overview = server.provider_overview();

    assert!(overview.contains("## neoforge"));
    assert!(overview.contains("**Available versions:**"));
    assert!(overview.contains("- version-1.20"));
    assert!(overview.contains("- version-1.21"));
}

#[test]
fn test_overview_passes_through_provider_errors() {
    let server = DocServer::new(registry("Error: failed to bring the documentation repository up to date"));
    let overview = server.provider_overview();

    assert!(overview.contains("## neoforge"));
    assert!(overview.contains("Error: failed to bring"));
    assert!(!overview.contains("**Available versions:**"));
}

#[test]
fn test_overview_passes_through_no_versions_message() {
    let server = DocServer::new(registry(
        "No versions found in the Neoforge documentation repository.",
    ));
    let overview = server.provider_overview();

    assert!(overview.contains("No versions found"));
    assert!(!overview.contains("- No versions"));
}

#[test]
fn test_overview_without_providers() {
    let server = DocServer::new(HashMap::new());
    assert_eq!(
        server.provider_overview(),
        "No documentation providers registered."
    );
}

#[test]
fn test_unknown_provider_message_lists_known_providers() {
    let server = DocServer::new(registry("version-1.20"));
    assert_eq!(
        server.unknown_provider_message("fabric"),
        "Error: Provider 'fabric' not found. Available providers: neoforge"
    );
}
