/// Neoforge documentation provider
pub mod neoforge;

pub use neoforge::NeoforgeProvider;

/// Capability set of a documentation provider.
///
/// Every operation returns plain text: the protocol layer above expects
/// string results, so failures come back as `"Error:"`-prefixed messages
/// rather than structured errors. Concrete providers are dispatched by
/// name through the server's registry.
pub trait DocProvider: Send + Sync {
    /// List the available documentation versions, newline-joined.
    fn get_versions(&self) -> String;

    /// Render the directory structure with per-file previews for a version.
    fn get_structure(&self, version: &str) -> String;

    /// Preview (first few paragraphs) of a single documentation file.
    fn get_preview(&self, version: &str, file_path: &str) -> String;

    /// Full raw content of a documentation file.
    fn get_full_content(&self, version: &str, file_path: &str) -> String;
}
