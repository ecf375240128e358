//! Generation-service backed tools: legal documents, branding and the
//! branding video.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::domain::parsing::{
    parse_model_json_or_else, scan_labelled_fields, JsonShape, ParseOutcome, RecoveryTier,
};
use crate::domain::tools::{decode_input, Tool, ToolContext, ToolDefinition, ToolResult};
use crate::ports::GenerationService;

#[derive(Debug, Deserialize)]
struct IdeaInput {
    idea: String,
}

fn idea_schema(description: &str) -> Value {
    json!({
        "type": "object",
        "required": ["idea"],
        "properties": {
            "idea": { "type": "string", "description": description }
        }
    })
}

/// Documents recovered from a legal generation response.
#[derive(Debug, Clone, PartialEq)]
pub enum LegalDocs {
    /// Documents parsed from JSON, reshaped for display.
    Parsed(Vec<Value>),
    /// Placeholder documents built from labelled fields in free text.
    Placeholders(Vec<Value>),
}

/// Parses the `docs` field of a legal generation response.
///
/// Accepts an array or a string holding one (possibly fenced or wrapped in
/// commentary). Returns `None` when nothing usable can be recovered.
pub fn parse_legal_docs(docs: &Value) -> Option<LegalDocs> {
    let raw = match docs {
        Value::Array(items) => return Some(LegalDocs::Parsed(items.iter().map(format_doc).collect())),
        Value::String(raw) => raw,
        _ => return None,
    };

    let outcome = parse_model_json_or_else(raw, JsonShape::Array, |text| {
        let placeholders: Vec<Value> = scan_labelled_fields(text)
            .into_iter()
            .enumerate()
            .map(|(index, title)| placeholder_doc(index, title))
            .collect();
        (!placeholders.is_empty()).then_some(Value::Array(placeholders))
    });

    match outcome {
        ParseOutcome::Recovered {
            value: Value::Array(items),
            tier: RecoveryTier::Fallback,
        } => Some(LegalDocs::Placeholders(items)),
        ParseOutcome::Strict(Value::Array(items))
        | ParseOutcome::Recovered {
            value: Value::Array(items),
            ..
        } => Some(LegalDocs::Parsed(items.iter().map(format_doc).collect())),
        ParseOutcome::Failed { reason } => {
            tracing::warn!(reason = %reason, "Legal documents response could not be parsed");
            None
        }
        _ => None,
    }
}

fn format_doc(doc: &Value) -> Value {
    let field = |key: &str| doc.get(key).cloned().unwrap_or(Value::Null);
    json!({
        "type": field("doc_type"),
        "title": field("title"),
        "summary": field("summary"),
        "content": field("content"),
        "placeholders": doc.get("placeholders").filter(|v| !v.is_null()).cloned().unwrap_or_else(|| json!([])),
        "defaults_used": doc.get("defaults_used").filter(|v| !v.is_null()).cloned().unwrap_or_else(|| Value::Object(Map::new())),
    })
}

fn placeholder_doc(index: usize, title: String) -> Value {
    json!({
        "doc_type": format!("Document {}", index + 1),
        "title": title,
        "summary": "Document generated successfully",
        "content": "Content available in the generated PDF",
        "placeholders": [],
        "defaults_used": {},
    })
}

/// Generates privacy policy, terms of service and NDA drafts.
pub struct GenerateLegalDocsTool {
    definition: ToolDefinition,
    service: Arc<dyn GenerationService>,
}

impl GenerateLegalDocsTool {
    pub fn new(service: Arc<dyn GenerationService>) -> Self {
        Self {
            definition: ToolDefinition::new(
                "generateLegalDocs",
                "Generate legal documents (privacy policy, terms of service, NDA) for a business idea",
                idea_schema("The business idea or description to generate legal documents for"),
            ),
            service,
        }
    }
}

#[async_trait]
impl Tool for GenerateLegalDocsTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, input: Value, _ctx: &ToolContext) -> ToolResult {
        let IdeaInput { idea } = match decode_input(input) {
            Ok(input) => input,
            Err(result) => return result,
        };

        let payload = match self.service.generate_legal_docs(&idea).await {
            Ok(payload) => payload,
            Err(e) => {
                tracing::error!(tool = "generateLegalDocs", error = %e, "Legal generation failed");
                return ToolResult::error(format!("Failed to generate legal documents: {}", e));
            }
        };

        match parse_legal_docs(&payload.docs) {
            Some(LegalDocs::Parsed(docs)) => ToolResult::done(format!(
                "Generated {} legal documents for: {}",
                docs.len(),
                idea
            ))
            .with("docs", docs)
            .with("pdfs", payload.pdfs),
            Some(LegalDocs::Placeholders(docs)) => ToolResult::done(format!(
                "Generated {} legal documents (with fallback parsing) for: {}",
                docs.len(),
                idea
            ))
            .with("docs", docs)
            .with("pdfs", payload.pdfs),
            None => ToolResult::error("Failed to parse legal documents response. Please try again."),
        }
    }
}

/// Generates a name, tagline and logo direction.
pub struct GenerateBrandingTool {
    definition: ToolDefinition,
    service: Arc<dyn GenerationService>,
}

impl GenerateBrandingTool {
    pub fn new(service: Arc<dyn GenerationService>) -> Self {
        Self {
            definition: ToolDefinition::new(
                "generateBranding",
                "Generate branding assets (name, tagline, logo) for a business idea",
                idea_schema("The business idea or concept to generate branding for"),
            ),
            service,
        }
    }
}

#[async_trait]
impl Tool for GenerateBrandingTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, input: Value, _ctx: &ToolContext) -> ToolResult {
        let IdeaInput { idea } = match decode_input(input) {
            Ok(input) => input,
            Err(result) => return result,
        };

        match self.service.generate_branding(&idea).await {
            Ok(branding) => ToolResult::done(format!("Successfully generated branding for \"{}\"", idea))
                .with("branding", branding),
            Err(e) => {
                tracing::error!(tool = "generateBranding", error = %e, "Branding generation failed");
                ToolResult::error(format!("Failed to generate branding: {}", e))
            }
        }
    }
}

/// Generates a short branding video.
pub struct GenerateBrandingVideoTool {
    definition: ToolDefinition,
    service: Arc<dyn GenerationService>,
}

impl GenerateBrandingVideoTool {
    pub fn new(service: Arc<dyn GenerationService>) -> Self {
        Self {
            definition: ToolDefinition::new(
                "generateBrandingVideo",
                "Generate a branding video for a business idea",
                idea_schema("The business idea or concept to generate a branding video for"),
            ),
            service,
        }
    }
}

#[async_trait]
impl Tool for GenerateBrandingVideoTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, input: Value, _ctx: &ToolContext) -> ToolResult {
        let IdeaInput { idea } = match decode_input(input) {
            Ok(input) => input,
            Err(result) => return result,
        };

        match self.service.generate_branding_video(&idea).await {
            Ok(payload) => {
                ToolResult::done(format!("Successfully generated branding video for \"{}\"", idea))
                    .with("video", payload.video)
                    .with("video_url", payload.video_url)
            }
            Err(e) => {
                tracing::error!(tool = "generateBrandingVideo", error = %e, "Video generation failed");
                ToolResult::error(format!("Failed to generate branding video: {}", e))
            }
        }
    }
}
