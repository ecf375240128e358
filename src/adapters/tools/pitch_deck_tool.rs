//! Pitch deck generation: research, slide writing, design notes and the
//! exported PDF.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use super::prompting::ask_model;
use crate::domain::foundation::DeckId;
use crate::domain::parsing::{parse_model_json, JsonShape};
use crate::domain::pitch_deck::{fallback_slides, normalize_slides, Slide};
use crate::domain::tools::{decode_input, Tool, ToolContext, ToolDefinition, ToolResult};
use crate::ports::{AIProvider, BlobStorage, DeckRenderer, RenderedDeck};

#[derive(Debug, Deserialize)]
struct PitchDeckInput {
    idea: String,
    #[serde(default)]
    problem: Option<String>,
    #[serde(default)]
    target_market: Option<String>,
    #[serde(default)]
    competitors: Vec<String>,
    #[serde(default)]
    revenue_model: Option<String>,
    #[serde(default)]
    funding_amount: Option<f64>,
    #[serde(default)]
    team_size: Option<u32>,
    #[serde(default)]
    stage: Option<String>,
}

impl PitchDeckInput {
    /// `Label: value` lines for every optional detail that was given.
    fn context_lines(&self) -> String {
        let mut lines = Vec::new();
        if let Some(problem) = &self.problem {
            lines.push(format!("Problem: {}", problem));
        }
        if let Some(market) = &self.target_market {
            lines.push(format!("Target Market: {}", market));
        }
        if !self.competitors.is_empty() {
            lines.push(format!("Competitors: {}", self.competitors.join(", ")));
        }
        if let Some(model) = &self.revenue_model {
            lines.push(format!("Revenue Model: {}", model));
        }
        if let Some(amount) = self.funding_amount {
            lines.push(format!("Funding Sought: ${}K", amount));
        }
        if let Some(size) = self.team_size {
            lines.push(format!("Team Size: {}", size));
        }
        if let Some(stage) = &self.stage {
            lines.push(format!("Stage: {}", stage));
        }
        lines.join("\n")
    }
}

fn market_research_prompt(input: &PitchDeckInput) -> String {
    format!(
        "Conduct comprehensive market research for this business idea: \"{}\"\n\n{}\n\n\
         Provide:\n\
         1. Market size (TAM, SAM, SOM)\n\
         2. Key competitors and their strengths/weaknesses\n\
         3. Market trends and opportunities\n\
         4. Customer pain points and needs\n\
         5. Competitive landscape analysis\n\n\
         Format as structured JSON.",
        input.idea,
        input.context_lines()
    )
}

fn influencer_research_prompt(input: &PitchDeckInput) -> String {
    let mut context = Vec::new();
    if let Some(market) = &input.target_market {
        context.push(format!("Target Market: {}", market));
    }
    if let Some(problem) = &input.problem {
        context.push(format!("Problem: {}", problem));
    }

    format!(
        "Find the most relevant influencers for this STARTING BUSINESS: \"{}\"\n\n{}\n\n\
         This is a new business, so only suggest accessible micro (1K-10K followers) and mid-tier \
         (10K-100K followers) creators with engaged niche audiences who work with small brands. \
         Avoid celebrities and anyone with 1M+ followers.\n\n\
         For each influencer give: name and handle, platform, follower count range, engagement rate, \
         content focus, social media links, why they are relevant and accessible, and an estimated \
         partnership cost range if known.\n\n\
         Format as structured JSON with social links.",
        input.idea,
        context.join("\n")
    )
}

fn slides_prompt(idea: &str, market_research: &str, influencer_research: &str) -> String {
    format!(
        "Generate a comprehensive 10-slide pitch deck for this business idea: \"{idea}\"\n\n\
         Market Research Data:\n{market_research}\n\n\
         Influencer Research Data:\n{influencer_research}\n\n\
         Create slides for: Title, Problem, Solution, Market Opportunity, Business Model, Traction, \
         Competition, Team, Influencer Strategy, Ask.\n\n\
         Each slide needs a compelling headline and 3-4 bullet points with specific data, metrics and \
         insights drawn from the research.\n\n\
         Format as a JSON array with this exact structure:\n\
         [\n  {{\n    \"title\": \"Slide Title\",\n    \"icon\": \"📊\",\n    \"content\": [\"Bullet 1\", \"Bullet 2\", \"Bullet 3\"]\n  }}\n]"
    )
}

fn design_prompt(idea: &str) -> String {
    format!(
        "Create design specifications for a pitch deck about: \"{}\"\n\n\
         Choose:\n\
         1. Color scheme (primary, secondary, accent colors)\n\
         2. Typography (headings, body text)\n\
         3. Layout style (modern, professional, creative)\n\
         4. Icon suggestions for each slide\n\
         5. Chart/graph recommendations\n\
         6. Visual hierarchy guidelines\n\n\
         Format as structured JSON with specific color codes and design recommendations.",
        idea
    )
}

/// Slides parsed from model output, or the fallback deck.
pub fn slides_from_model(deck_text: &str, idea: &str) -> Vec<Slide> {
    parse_model_json(deck_text, JsonShape::Array)
        .value()
        .and_then(normalize_slides)
        .unwrap_or_else(|| {
            tracing::warn!("Slide generation output unusable, using fallback deck");
            fallback_slides(idea)
        })
}

/// Builds a pitch deck and publishes it as a PDF.
pub struct GeneratePitchDeckTool {
    definition: ToolDefinition,
    provider: Arc<dyn AIProvider>,
    renderer: Arc<dyn DeckRenderer>,
    storage: Arc<dyn BlobStorage>,
    deck_prefix: String,
}

impl GeneratePitchDeckTool {
    pub fn new(
        provider: Arc<dyn AIProvider>,
        renderer: Arc<dyn DeckRenderer>,
        storage: Arc<dyn BlobStorage>,
        deck_prefix: impl Into<String>,
    ) -> Self {
        let schema = json!({
            "type": "object",
            "required": ["idea"],
            "properties": {
                "idea": { "type": "string", "description": "The business idea or concept (e.g., 'AI that manages Shopify stores')" },
                "problem": { "type": "string", "description": "The problem being solved" },
                "target_market": { "type": "string", "description": "Target market or customer segment" },
                "competitors": { "type": "array", "items": { "type": "string" }, "description": "Known competitors" },
                "revenue_model": { "type": "string", "description": "Revenue model (subscription, one-time, marketplace, etc.)" },
                "funding_amount": { "type": "number", "description": "Funding amount being sought (in thousands)" },
                "team_size": { "type": "integer", "minimum": 0, "description": "Current team size" },
                "stage": {
                    "type": "string",
                    "enum": ["idea", "mvp", "early_traction", "growth", "scale"],
                    "description": "Current business stage"
                }
            }
        });

        Self {
            definition: ToolDefinition::new(
                "generatePitchDeck",
                "Generate a comprehensive pitch deck with market research, financial models, and professional design",
                schema,
            ),
            provider,
            renderer,
            storage,
            deck_prefix: deck_prefix.into().trim_matches('/').to_string(),
        }
    }

    /// Renders and uploads the deck. Failures are logged and yield `None`.
    async fn publish(&self, deck_id: &DeckId, slides: &[Slide]) -> Option<String> {
        let rendered = match self.renderer.render_pdf(deck_id, slides).await {
            Ok(rendered) => rendered,
            Err(e) => {
                tracing::error!(deck_id = %deck_id, error = %e, "Pitch deck PDF export failed");
                return None;
            }
        };

        let key = format!("{}/{}", self.deck_prefix, rendered.filename);
        match self
            .storage
            .upload(&key, &rendered.content, RenderedDeck::CONTENT_TYPE)
            .await
        {
            Ok(blob) => Some(blob.public_url),
            Err(e) => {
                tracing::error!(deck_id = %deck_id, key = %key, error = %e, "Pitch deck upload failed");
                None
            }
        }
    }
}

#[async_trait]
impl Tool for GeneratePitchDeckTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, input: Value, ctx: &ToolContext) -> ToolResult {
        let input: PitchDeckInput = match decode_input(input) {
            Ok(input) => input,
            Err(result) => return result,
        };
        let provider = self.provider.as_ref();

        let research = async {
            let market = ask_model(provider, market_research_prompt(&input), ctx).await?;
            let influencers = ask_model(provider, influencer_research_prompt(&input), ctx).await?;
            let deck = ask_model(provider, slides_prompt(&input.idea, &market, &influencers), ctx).await?;
            let design = ask_model(provider, design_prompt(&input.idea), ctx).await?;
            Ok::<_, crate::ports::AIError>((market, influencers, deck, design))
        };

        let (market_research, influencer_research, deck_content, design_specs) = match research.await {
            Ok(parts) => parts,
            Err(e) => {
                tracing::error!(tool = "generatePitchDeck", error = %e, "Pitch deck generation failed");
                return ToolResult::error(format!("Failed to generate pitch deck: {}", e));
            }
        };

        let slides = slides_from_model(&deck_content, &input.idea);
        let deck_id = DeckId::generate();
        let pdf_url = self.publish(&deck_id, &slides).await;

        let download = pdf_url
            .as_deref()
            .map(|url| format!(" [Download PDF]({})", url))
            .unwrap_or_default();

        tracing::info!(deck_id = %deck_id, slides = slides.len(), has_pdf = pdf_url.is_some(), "Pitch deck generated");

        ToolResult::done(format!(
            "Generated comprehensive pitch deck for \"{}\" with market research and influencer strategy.{}",
            input.idea, download
        ))
        .with("deck_id", &deck_id)
        .with("idea", &input.idea)
        .with("market_research", market_research)
        .with("influencer_research", influencer_research)
        .with("deck_content", deck_content)
        .with("design_specs", design_specs)
        .with("slides", &slides)
        .with("pdf_url", pdf_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::{MockAIProvider, MockError};
    use crate::adapters::storage::LocalBlobStorage;
    use crate::domain::foundation::ToolCallId;
    use crate::ports::ExportError;
    use std::sync::Mutex;

    /// Renderer producing a fake PDF and recording the slides it saw.
    #[derive(Default)]
    struct FakeRenderer {
        fail: bool,
        seen: Mutex<Vec<Vec<Slide>>>,
    }

    #[async_trait]
    impl DeckRenderer for FakeRenderer {
        async fn render_pdf(&self, deck_id: &DeckId, slides: &[Slide]) -> Result<RenderedDeck, ExportError> {
            self.seen.lock().unwrap().push(slides.to_vec());
            if self.fail {
                return Err(ExportError::pdf_failed("engine missing"));
            }
            Ok(RenderedDeck::from_pdf(b"%PDF-1.7 fake".to_vec(), deck_id))
        }
    }

    fn ctx() -> ToolContext {
        ToolContext::new(ToolCallId::new("call_deck"), None)
    }

    fn scripted_provider(deck: &str) -> Arc<MockAIProvider> {
        Arc::new(
            MockAIProvider::new()
                .with_response("market notes")
                .with_response("influencer notes")
                .with_response(deck)
                .with_response("design notes"),
        )
    }

    #[test]
    fn slides_from_model_normalizes_output() {
        let slides = slides_from_model(
            "```json\n[{\"title\":\"Brew\",\"content\":\"One liner\"},{\"content\":[\"a\"]}]\n```",
            "Brew",
        );

        assert_eq!(slides.len(), 2);
        assert_eq!(slides[0].content, vec!["One liner"]);
        assert_eq!(slides[1].title, "Slide 2");
    }

    #[test]
    fn slides_from_model_falls_back_on_garbage() {
        let slides = slides_from_model("I could not do that.", "Brew");

        assert_eq!(slides.len(), 5);
        assert_eq!(slides[0].title, "Brew");
    }

    #[tokio::test]
    async fn generates_deck_and_publishes_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Arc::new(LocalBlobStorage::new(dir.path(), "product_images", "http://localhost/files"));
        let renderer = Arc::new(FakeRenderer::default());
        let provider = scripted_provider(r#"[{"title":"Brew","icon":"☕","content":["Coffee"]}]"#);
        let tool = GeneratePitchDeckTool::new(provider.clone(), renderer.clone(), storage, "pitch-decks/");

        let result = tool
            .execute(json!({ "idea": "Brew", "competitors": ["Blue Bottle"], "stage": "mvp" }), &ctx())
            .await;

        assert!(result.is_success());
        assert_eq!(provider.call_count(), 4);
        let deck_id = result.get("deck_id").unwrap().as_str().unwrap().to_string();
        assert!(deck_id.starts_with("deck_"));
        let pdf_url = result.get("pdf_url").unwrap().as_str().unwrap();
        assert_eq!(
            pdf_url,
            format!("http://localhost/files/product_images/pitch-decks/pitch-deck-{}.pdf", deck_id)
        );
        assert!(result.message().ends_with(&format!(" [Download PDF]({})", pdf_url)));
        assert_eq!(result.get("design_specs"), Some(&json!("design notes")));
        assert_eq!(renderer.seen.lock().unwrap()[0][0].title, "Brew");

        let calls = provider.get_calls();
        let market_prompt = &calls[0].messages[0].content;
        assert!(market_prompt.contains("Competitors: Blue Bottle"));
        assert!(market_prompt.contains("Stage: mvp"));
    }

    #[tokio::test]
    async fn pdf_failure_leaves_url_null() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Arc::new(LocalBlobStorage::new(dir.path(), "b", "http://localhost/files"));
        let renderer = Arc::new(FakeRenderer {
            fail: true,
            ..Default::default()
        });
        let tool = GeneratePitchDeckTool::new(scripted_provider("nope"), renderer, storage, "pitch-decks");

        let result = tool.execute(json!({ "idea": "Brew" }), &ctx()).await;

        assert!(result.is_success());
        assert_eq!(result.get("pdf_url"), Some(&Value::Null));
        assert!(!result.message().contains("Download PDF"));
        assert_eq!(result.get("slides").unwrap().as_array().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn model_failure_fails_the_tool() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Arc::new(LocalBlobStorage::new(dir.path(), "b", "http://localhost/files"));
        let provider = Arc::new(
            MockAIProvider::new()
                .with_response("market notes")
                .with_error(MockError::Unavailable {
                    message: "overloaded".to_string(),
                }),
        );
        let tool = GeneratePitchDeckTool::new(provider.clone(), Arc::new(FakeRenderer::default()), storage, "decks");

        let result = tool.execute(json!({ "idea": "Brew" }), &ctx()).await;

        assert!(!result.is_success());
        assert!(result.message().starts_with("Failed to generate pitch deck: "));
        assert_eq!(provider.call_count(), 2);
    }
}
