//! Pitch deck slides.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Icon used when a slide does not name one.
pub const DEFAULT_SLIDE_ICON: &str = "📊";

/// One slide: a headline, an optional icon and bullet points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slide {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default)]
    pub content: Vec<String>,
}

impl Slide {
    pub fn new(title: impl Into<String>, icon: impl Into<String>, content: Vec<String>) -> Self {
        Self {
            title: title.into(),
            icon: Some(icon.into()),
            content,
        }
    }

    /// Icon to render, falling back to the default.
    pub fn icon_or_default(&self) -> &str {
        self.icon.as_deref().unwrap_or(DEFAULT_SLIDE_ICON)
    }
}

/// Coerces loosely shaped model output into slides.
///
/// Missing titles become `Slide N`, missing icons the default icon, and a
/// non-list `content` becomes a single bullet. Returns `None` unless the
/// input is a non-empty array.
pub fn normalize_slides(raw: &Value) -> Option<Vec<Slide>> {
    let items = raw.as_array().filter(|items| !items.is_empty())?;

    let slides = items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let title = non_empty_str(item.get("title"))
                .map(str::to_string)
                .unwrap_or_else(|| format!("Slide {}", index + 1));
            let icon = non_empty_str(item.get("icon")).unwrap_or(DEFAULT_SLIDE_ICON);
            let content = match item.get("content") {
                Some(Value::Array(bullets)) => bullets.iter().map(bullet_text).collect(),
                Some(Value::Null) | None => vec!["Content not available".to_string()],
                Some(other) => vec![bullet_text(other)],
            };
            Slide::new(title, icon, content)
        })
        .collect();

    Some(slides)
}

/// Minimal deck used when slide generation cannot be parsed.
pub fn fallback_slides(idea: &str) -> Vec<Slide> {
    vec![
        Slide::new(idea, "📊", vec!["Pitch deck generated with AI insights.".to_string()]),
        Slide::new("Problem", "🎯", vec!["Market need identified through research.".to_string()]),
        Slide::new("Solution", "💡", vec!["Innovative approach to address the problem.".to_string()]),
        Slide::new(
            "Market Opportunity",
            "📈",
            vec!["Significant market potential identified.".to_string()],
        ),
        Slide::new("Business Model", "💰", vec!["Sustainable revenue streams planned.".to_string()]),
    ]
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.trim().is_empty())
}

fn bullet_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
