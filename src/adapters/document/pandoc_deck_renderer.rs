//! Pandoc-based deck renderer adapter.
//!
//! Builds a self-contained HTML deck (one A4 landscape page per slide) and
//! converts it to PDF with Pandoc and an HTML-capable PDF engine.
//!
//! # Architecture
//!
//! Implements the `DeckRenderer` port. HTML generation is pure and always
//! available; PDF conversion requires an external Pandoc installation.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::domain::foundation::DeckId;
use crate::domain::pitch_deck::Slide;
use crate::ports::{DeckRenderer, ExportError, RenderedDeck};

/// Deck renderer using Pandoc for PDF conversion.
///
/// # Example
///
/// ```rust,ignore
/// let renderer = PandocDeckRenderer::new().with_pdf_engine("wkhtmltopdf");
/// let deck = renderer.render_pdf(&deck_id, &slides).await?;
/// ```
#[derive(Debug, Clone)]
pub struct PandocDeckRenderer {
    /// Path to pandoc executable. If None, will search PATH.
    pandoc_path: Option<String>,

    /// PDF engine passed to `--pdf-engine`.
    pdf_engine: String,

    /// Timeout for PDF conversion in seconds.
    pdf_timeout_secs: u64,
}

impl Default for PandocDeckRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl PandocDeckRenderer {
    /// Create a renderer with default settings.
    pub fn new() -> Self {
        Self {
            pandoc_path: None,
            pdf_engine: "wkhtmltopdf".to_string(),
            pdf_timeout_secs: 60,
        }
    }

    /// Set a custom path to the pandoc executable.
    pub fn with_pandoc_path(mut self, path: impl Into<String>) -> Self {
        self.pandoc_path = Some(path.into());
        self
    }

    /// Set the PDF engine.
    pub fn with_pdf_engine(mut self, engine: impl Into<String>) -> Self {
        self.pdf_engine = engine.into();
        self
    }

    /// Set the timeout for PDF conversion.
    pub fn with_pdf_timeout(mut self, timeout_secs: u64) -> Self {
        self.pdf_timeout_secs = timeout_secs;
        self
    }

    fn pandoc_command(&self) -> &str {
        self.pandoc_path.as_deref().unwrap_or("pandoc")
    }

    /// Check if Pandoc is installed and accessible.
    async fn check_pandoc(&self) -> bool {
        let output = Command::new(self.pandoc_command())
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .output()
            .await;

        output.map(|o| o.status.success()).unwrap_or(false)
    }

    fn pandoc_args(&self) -> Vec<String> {
        let mut args = vec![
            "-f".to_string(),
            "html".to_string(),
            "-t".to_string(),
            "pdf".to_string(),
            format!("--pdf-engine={}", self.pdf_engine),
            "--metadata".to_string(),
            "title=Pitch Deck".to_string(),
            "-o".to_string(),
            "-".to_string(),
        ];
        if self.pdf_engine.ends_with("wkhtmltopdf") {
            for opt in ["--page-size", "A4", "--orientation", "Landscape"] {
                args.push(format!("--pdf-engine-opt={}", opt));
            }
        }
        args
    }

    async fn html_to_pdf(&self, html: &str) -> Result<Vec<u8>, ExportError> {
        if !self.check_pandoc().await {
            return Err(ExportError::service_unavailable(
                "Pandoc is not installed. PDF export requires Pandoc. \
                 Install from https://pandoc.org/installing.html",
            ));
        }

        let mut child = Command::new(self.pandoc_command())
            .args(self.pandoc_args())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| ExportError::pdf_failed(format!("Failed to start Pandoc: {}", e)))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(html.as_bytes())
                .await
                .map_err(|e| ExportError::pdf_failed(format!("Failed to write to Pandoc: {}", e)))?;
        }

        let output = tokio::time::timeout(
            Duration::from_secs(self.pdf_timeout_secs),
            child.wait_with_output(),
        )
        .await
        .map_err(|_| ExportError::Timeout(self.pdf_timeout_secs))?
        .map_err(|e| ExportError::pdf_failed(format!("Pandoc execution failed: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ExportError::pdf_failed(format!(
                "Pandoc returned error: {}",
                stderr.trim()
            )));
        }

        Ok(output.stdout)
    }
}

#[async_trait]
impl DeckRenderer for PandocDeckRenderer {
    async fn render_pdf(&self, deck_id: &DeckId, slides: &[Slide]) -> Result<RenderedDeck, ExportError> {
        let html = deck_html(slides);
        let pdf = self.html_to_pdf(&html).await?;

        tracing::info!(
            deck_id = %deck_id,
            slides = slides.len(),
            size_bytes = pdf.len(),
            "Rendered pitch deck"
        );

        Ok(RenderedDeck::from_pdf(pdf, deck_id))
    }
}

/// Builds the deck document.
///
/// The first slide gets the title styling and every slide carries an
/// `n / total` footer. An empty deck renders a single cover page.
pub fn deck_html(slides: &[Slide]) -> String {
    let body = if slides.is_empty() {
        concat!(
            r#"<section class="slide title-slide">"#,
            r#"<div class="slide-icon">📊</div>"#,
            r#"<h1 class="slide-title">Pitch Deck</h1>"#,
            r#"<div class="slide-content"><div class="slide-point">No slides were provided.</div></div>"#,
            "</section>"
        )
        .to_string()
    } else {
        let total = slides.len();
        slides
            .iter()
            .enumerate()
            .map(|(index, slide)| slide_html(slide, index, total))
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<title>Pitch Deck</title>
<style>{}</style>
</head>
<body>
{}
</body>
</html>"#,
        DECK_CSS, body
    )
}

fn slide_html(slide: &Slide, index: usize, total: usize) -> String {
    let class = if index == 0 { "slide title-slide" } else { "slide" };
    let points: String = slide
        .content
        .iter()
        .map(|point| format!(r#"<div class="slide-point">{}</div>"#, html_escape(point)))
        .collect();

    format!(
        r#"<section class="{class}"><div class="slide-icon">{icon}</div><h1 class="slide-title">{title}</h1><div class="slide-content">{points}</div><div class="slide-number">{n} / {total}</div></section>"#,
        class = class,
        icon = html_escape(slide.icon_or_default()),
        title = html_escape(&slide.title),
        points = points,
        n = index + 1,
        total = total,
    )
}

/// Escape HTML special characters.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

const DECK_CSS: &str = r#"
@page { size: A4 landscape; margin: 0; }
* { margin: 0; padding: 0; box-sizing: border-box; }
body { font-family: 'Inter', -apple-system, BlinkMacSystemFont, sans-serif; background: #f8fafc; }
.slide { position: relative; width: 297mm; height: 210mm; padding: 60px 80px; page-break-after: always; background: white; text-align: center; }
.slide:last-child { page-break-after: avoid; }
.slide-icon { font-size: 4rem; margin-bottom: 2rem; }
.slide-title { font-size: 3rem; font-weight: bold; color: #1e293b; margin-bottom: 3rem; }
.slide-content { max-width: 1000px; margin: 0 auto; text-align: left; }
.slide-point { margin-bottom: 1.5rem; font-size: 1.5rem; line-height: 1.6; color: #475569; }
.slide-point::before { content: '\2022'; color: #3b82f6; font-weight: bold; margin-right: 1rem; }
.slide-number { position: absolute; bottom: 2rem; right: 2rem; font-size: 1rem; color: #64748b; }
.title-slide { background: #1e40af; color: white; }
.title-slide .slide-title { color: white; font-size: 4rem; }
.title-slide .slide-point { color: #e2e8f0; font-size: 1.8rem; }
.title-slide .slide-point::before { color: #fbbf24; }
"#;
