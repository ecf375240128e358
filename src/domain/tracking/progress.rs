//! Display catalogue for tool progress cards.

/// A named phase of a long-running tool, reached after `threshold_ms`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressStep {
    pub name: &'static str,
    pub threshold_ms: u64,
}

const fn step(name: &'static str, threshold_ms: u64) -> ProgressStep {
    ProgressStep { name, threshold_ms }
}

const MARKET_SEARCH_STEPS: [ProgressStep; 5] = [
    step("Gathering market data", 5_000),
    step("Analyzing competitors", 15_000),
    step("Researching trends", 25_000),
    step("Compiling insights", 35_000),
    step("Finalizing report", 45_000),
];

const WEB_SEARCH_STEPS: [ProgressStep; 3] = [
    step("Searching the web", 3_000),
    step("Analyzing results", 8_000),
    step("Compiling information", 15_000),
];

const PITCH_DECK_STEPS: [ProgressStep; 5] = [
    step("Researching market", 8_000),
    step("Finding influencers", 16_000),
    step("Generating slide content", 24_000),
    step("Creating design specs", 32_000),
    step("Finalizing presentation", 40_000),
];

/// Current phase of a running tool.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressSnapshot {
    pub step: ProgressStep,
    pub index: usize,
    pub total: usize,
    pub percent: f64,
}

/// Progress phases of a tool, if it reports any.
pub fn progress_steps(tool_name: &str) -> Option<&'static [ProgressStep]> {
    match tool_name {
        "marketSearch" => Some(&MARKET_SEARCH_STEPS),
        "webSearch" => Some(&WEB_SEARCH_STEPS),
        "generatePitchDeck" => Some(&PITCH_DECK_STEPS),
        _ => None,
    }
}

/// Phase reached after `elapsed_ms`: the first whose threshold is still
/// ahead, or the last one once every threshold has passed.
pub fn progress_for(tool_name: &str, elapsed_ms: u64) -> Option<ProgressSnapshot> {
    let steps = progress_steps(tool_name)?;
    let index = steps
        .iter()
        .position(|s| elapsed_ms < s.threshold_ms)
        .unwrap_or(steps.len() - 1);

    Some(ProgressSnapshot {
        step: steps[index],
        index,
        total: steps.len(),
        percent: (index + 1) as f64 / steps.len() as f64 * 100.0,
    })
}

/// Title shown on a tool's progress card.
pub fn display_name(tool_name: &str) -> &str {
    match tool_name {
        "generateLegalDocs" => "Generating comprehensive legal documents",
        "addProduct" => "Adding product to your store",
        "deleteProduct" => "Deleting product from your store",
        "deleteAllProducts" => "Deleting all products from your store",
        "webSearch" => "Searching the web",
        "marketSearch" => "Analyzing market data",
        "generatePitchDeck" => "Generating pitch deck",
        "generateBranding" => "Creating branding assets",
        "generateBrandingVideo" => "Generating branding video",
        "storeLink" => "Store link ready",
        "mailSetup" => "Setting up assistant inbox",
        "phoneassistant" => "Setting up phone assistant",
        "influencerSearch" => "Finding influencers",
        other => other,
    }
}

/// Subtitle shown on a tool's progress card.
pub fn description(tool_name: &str) -> &'static str {
    match tool_name {
        "generateLegalDocs" => "Creating privacy policy, terms of use, and NDA documents",
        "addProduct" => "Adding new product to your Shopify store",
        "deleteProduct" => "Removing product from your Shopify store",
        "deleteAllProducts" => "Removing all products from your Shopify store",
        "webSearch" => "Gathering real-time information from the web",
        "marketSearch" => "Researching competitors, trends, and market statistics",
        "generatePitchDeck" => {
            "Creating comprehensive investor presentation with market research and financial models"
        }
        "generateBranding" => "Creating business name, tagline, and logo design",
        "generateBrandingVideo" => "Generating promotional video content for your brand",
        "storeLink" => "Surface the link to your created store",
        "mailSetup" => "Setting up the customer assistant inbox",
        "phoneassistant" => "Setting up your customer phone assistant",
        "influencerSearch" => "Recommending accessible influencers (micro/mid-tier)",
        _ => "Processing your request...",
    }
}
