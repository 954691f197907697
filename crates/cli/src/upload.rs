//! Uploading fonts to a GraphQL endpoint as multipart requests.
//!
//! Follows the GraphQL multipart request convention: an `operations` field
//! with the mutation and a null file variable, a `map` field pointing the
//! `file` part at that variable, and the file part itself.

use anyhow::{bail, Context, Result};
use pptfont_core::ArtifactSink;
use reqwest::blocking::{multipart, Client};
use serde_json::json;
use std::path::Path;
use std::time::Duration;

/// Mutation storing one font under a name.
pub const PUT_FONT_MUTATION: &str =
    "mutation ($font: Upload!, $name: String!) { putFont(name: $name, font: $font) }";

/// Sends each font as a `putFont` mutation.
pub struct GraphqlUploader {
    client: Client,
    endpoint: String,
}

impl GraphqlUploader {
    /// Create an uploader for `endpoint` with a request timeout.
    pub fn new(endpoint: impl Into<String>, timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    /// The endpoint requests are sent to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// The `operations` field for uploading a font named `name`.
pub fn operations_field(name: &str) -> String {
    json!({
        "query": PUT_FONT_MUTATION,
        "variables": { "font": null, "name": name },
    })
    .to_string()
}

/// The `map` field binding the `file` part to `variables.font`.
pub fn map_field() -> String {
    json!({ "file": ["variables.font"] }).to_string()
}

impl ArtifactSink for GraphqlUploader {
    type Error = anyhow::Error;

    fn upload(&self, path: &Path, name: &str) -> Result<()> {
        let form = multipart::Form::new()
            .text("operations", operations_field(name))
            .text("map", map_field())
            .file("file", path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .with_context(|| format!("Request to {} failed", self.endpoint))?;

        let status = response.status();
        let body = response.text().context("Failed to read response")?;
        if !status.is_success() {
            bail!("HTTP {} from {}: {}", status, self.endpoint, body.trim());
        }

        if let Ok(value) = serde_json::from_str::<serde_json::Value>(&body) {
            if let Some(errors) = value.get("errors").filter(|e| !e.is_null()) {
                bail!("GraphQL errors: {}", errors);
            }
        }

        log::debug!("Upload response for '{}': {}", name, body.trim());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operations_field() {
        let ops: serde_json::Value = serde_json::from_str(&operations_field("Open Sans")).unwrap();
        assert_eq!(ops["query"], PUT_FONT_MUTATION);
        assert_eq!(ops["variables"]["name"], "Open Sans");
        assert!(ops["variables"]["font"].is_null());
    }

    #[test]
    fn test_operations_field_escapes_quotes() {
        let ops: serde_json::Value =
            serde_json::from_str(&operations_field(r#"Weird "Quoted" Font"#)).unwrap();
        assert_eq!(ops["variables"]["name"], r#"Weird "Quoted" Font"#);
    }

    #[test]
    fn test_map_field() {
        assert_eq!(map_field(), r#"{"file":["variables.font"]}"#);
    }

    #[test]
    fn test_uploader_keeps_endpoint() {
        let uploader = GraphqlUploader::new("http://localhost:4000/graphql", 5).unwrap();
        assert_eq!(uploader.endpoint(), "http://localhost:4000/graphql");
    }
}
