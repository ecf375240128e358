//! Model-backed research tools: market analysis, influencer discovery and
//! web search.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::prompting::ask_model;
use crate::domain::parsing::{parse_model_json, JsonShape};
use crate::domain::tools::{decode_input, Tool, ToolContext, ToolDefinition, ToolResult};
use crate::ports::AIProvider;

/// Aspect of a market to research.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchFocus {
    MarketSize,
    Competitors,
    Trends,
    Pricing,
    Growth,
    #[default]
    All,
}

impl SearchFocus {
    fn covers(self, other: SearchFocus) -> bool {
        self == SearchFocus::All || self == other
    }
}

#[derive(Debug, Deserialize)]
struct MarketSearchInput {
    industry: String,
    #[serde(default)]
    competitors: Vec<String>,
    #[serde(default)]
    search_focus: SearchFocus,
    #[serde(default = "default_region")]
    region: String,
}

fn default_region() -> String {
    "global".to_string()
}

/// Search queries describing the requested research, for the given year.
pub fn research_queries(
    industry: &str,
    competitors: &[String],
    focus: SearchFocus,
    region: &str,
    year: i32,
) -> Vec<String> {
    let mut queries = Vec::new();

    if focus.covers(SearchFocus::MarketSize) {
        queries.push(format!("{} market size {} {}", industry, year, region));
    }
    if focus.covers(SearchFocus::Competitors) {
        if competitors.is_empty() {
            queries.push(format!("top {} companies competitors {} {}", industry, year, region));
        } else {
            queries.push(format!(
                "{} {} competitors analysis {}",
                competitors.join(" "),
                industry,
                year
            ));
        }
    }
    if focus.covers(SearchFocus::Trends) {
        queries.push(format!("{} market trends {} {}", industry, year, region));
    }
    if focus.covers(SearchFocus::Pricing) {
        queries.push(format!("{} pricing strategies market analysis {}", industry, year));
    }
    if focus.covers(SearchFocus::Growth) {
        queries.push(format!(
            "{} market growth forecast {}-{} {}",
            industry,
            year,
            year + 1,
            region
        ));
    }

    queries
}

fn market_prompt(industry: &str, region: &str, competitors: &[String]) -> String {
    let focus = if competitors.is_empty() {
        String::new()
    } else {
        format!(" (focus on: {})", competitors.join(", "))
    };

    format!(
        "Provide a comprehensive market analysis for the {industry} industry in {region}. Research and include:\n\n\
         1. Market size and growth projections\n\
         2. Key competitors and their market positions{focus}\n\
         3. Current trends and opportunities\n\
         4. Pricing insights and strategies\n\
         5. Strategic recommendations\n\n\
         Focus on actionable insights for business strategy. Include specific data points, statistics, and recent developments."
    )
}

/// Market sizing, competitor and trend analysis for an industry.
pub struct MarketSearchTool {
    definition: ToolDefinition,
    provider: Arc<dyn AIProvider>,
}

impl MarketSearchTool {
    pub fn new(provider: Arc<dyn AIProvider>) -> Self {
        let schema = json!({
            "type": "object",
            "required": ["industry"],
            "properties": {
                "industry": { "type": "string", "description": "The industry or market sector to analyze" },
                "competitors": { "type": "array", "items": { "type": "string" }, "description": "Specific competitors to analyze" },
                "search_focus": {
                    "type": "string",
                    "enum": ["market_size", "competitors", "trends", "pricing", "growth", "all"],
                    "description": "What aspect of the market to focus on"
                },
                "region": { "type": "string", "description": "Geographic region for market analysis (default: global)" }
            }
        });

        Self {
            definition: ToolDefinition::new(
                "marketSearch",
                "Search for market data, competitor analysis, and industry statistics",
                schema,
            ),
            provider,
        }
    }
}

#[async_trait]
impl Tool for MarketSearchTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, input: Value, ctx: &ToolContext) -> ToolResult {
        let input: MarketSearchInput = match decode_input(input) {
            Ok(input) => input,
            Err(result) => return result,
        };

        let queries = research_queries(
            &input.industry,
            &input.competitors,
            input.search_focus,
            &input.region,
            Utc::now().year(),
        );

        let prompt = market_prompt(&input.industry, &input.region, &input.competitors);
        let analysis = match ask_model(self.provider.as_ref(), prompt, ctx).await {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => format!(
                "Market analysis for {} industry in {} completed.",
                input.industry, input.region
            ),
            Err(e) => {
                tracing::warn!(tool = "marketSearch", error = %e, "Market analysis failed, using placeholder");
                format!(
                    "Market analysis for {} industry in {}. Analysis in progress...",
                    input.industry, input.region
                )
            }
        };

        ToolResult::done(format!(
            "Completed market analysis for {} industry in {}",
            input.industry, input.region
        ))
        .with("industry", &input.industry)
        .with("region", &input.region)
        .with("search_focus", input.search_focus)
        .with("competitors_analyzed", &input.competitors)
        .with("market_analysis", analysis)
        .with("research_queries", queries)
    }
}

#[derive(Debug, Deserialize)]
struct InfluencerSearchInput {
    idea: String,
    #[serde(default)]
    target_market: Option<String>,
}

/// Prompt asking for micro and mid-tier influencers.
pub(crate) fn influencer_prompt(idea: &str, target_market: Option<&str>) -> String {
    let targeting = target_market
        .map(|market| format!(" targeting {}", market))
        .unwrap_or_default();
    format!(
        "Find accessible influencers for: \"{}\"{}. Focus on micro/mid-tier (1K-100K). \
         Return concise JSON list with: name, handle, platform, followers_range, engagement, focus, links, why_relevant.",
        idea, targeting
    )
}

/// Influencer list from model text, or the raw text when no list parses.
pub(crate) fn parse_influencers(text: &str) -> Value {
    parse_model_json(text, JsonShape::Array)
        .into_value()
        .unwrap_or_else(|| Value::String(text.to_string()))
}

/// Finds accessible influencers for a brand idea.
pub struct InfluencerSearchTool {
    definition: ToolDefinition,
    provider: Arc<dyn AIProvider>,
}

impl InfluencerSearchTool {
    pub fn new(provider: Arc<dyn AIProvider>) -> Self {
        let schema = json!({
            "type": "object",
            "required": ["idea"],
            "properties": {
                "idea": { "type": "string", "description": "Brand or business idea to find influencers for" },
                "target_market": { "type": "string", "description": "Target audience" }
            }
        });

        Self {
            definition: ToolDefinition::new(
                "influencerSearch",
                "Find accessible influencers (micro/mid-tier) for the brand/idea",
                schema,
            ),
            provider,
        }
    }
}

#[async_trait]
impl Tool for InfluencerSearchTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, input: Value, ctx: &ToolContext) -> ToolResult {
        let input: InfluencerSearchInput = match decode_input(input) {
            Ok(input) => input,
            Err(result) => return result,
        };

        let prompt = influencer_prompt(&input.idea, input.target_market.as_deref());
        match ask_model(self.provider.as_ref(), prompt, ctx).await {
            Ok(text) => ToolResult::done("Influencer recommendations generated.")
                .with("influencers", parse_influencers(&text)),
            Err(e) => {
                tracing::error!(tool = "influencerSearch", error = %e, "Influencer search failed");
                ToolResult::error("Failed to generate influencer recommendations")
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct WebSearchInput {
    query: String,
    #[serde(default = "default_max_results")]
    max_results: u32,
}

fn default_max_results() -> u32 {
    5
}

/// Summarizes current information about a query.
pub struct WebSearchTool {
    definition: ToolDefinition,
    provider: Arc<dyn AIProvider>,
}

impl WebSearchTool {
    pub fn new(provider: Arc<dyn AIProvider>) -> Self {
        let schema = json!({
            "type": "object",
            "required": ["query"],
            "properties": {
                "query": { "type": "string", "description": "The search query to find information on the web" },
                "max_results": { "type": "integer", "minimum": 1, "description": "Maximum number of search results to return (default: 5)" }
            }
        });

        Self {
            definition: ToolDefinition::new(
                "webSearch",
                "Search the web for real-time information",
                schema,
            ),
            provider,
        }
    }
}

#[async_trait]
impl Tool for WebSearchTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, input: Value, ctx: &ToolContext) -> ToolResult {
        let input: WebSearchInput = match decode_input(input) {
            Ok(input) => input,
            Err(result) => return result,
        };

        let prompt = format!(
            "Please search for current information about: \"{}\". Provide a comprehensive summary with \
             the {} most relevant and recent findings available. Include key findings, statistics, and \
             important details. If you find specific sources or recent developments, mention them.",
            input.query, input.max_results
        );

        match ask_model(self.provider.as_ref(), prompt, ctx).await {
            Ok(results) => ToolResult::done(format!("Found web search results for: {}", input.query))
                .with("query", &input.query)
                .with("results", results),
            Err(e) => {
                tracing::error!(tool = "webSearch", error = %e, "Web search failed");
                ToolResult::error(format!("Failed to perform web search: {}", e))
            }
        }
    }
}
