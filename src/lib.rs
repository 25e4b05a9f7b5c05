mod buffer;
mod config;
mod error;
mod event;
mod list;
mod markdown;
mod metrics;
mod preview;
mod render;

pub use buffer::{Annotation, RichTextBuffer, Style};
pub use config::{Config, FontConfig, ListConfig, PreviewConfig};
pub use error::{Error, Result};
pub use event::{decode_entities, scan_html, HtmlScanner, Tag, TagEvent};
pub use list::{ListContext, ListLayoutBuilder, BASE_INDENT};
pub use markdown::markdown_events;
pub use metrics::{FixedMeasurer, FontMeasurer, MarkerMeasure, MarkerMetrics};
pub use preview::{preview, PreviewOptions};
pub use render::{render, RenderOptions};

/// Marker widths for `config`: measured with its font if one is set,
/// otherwise the configured fixed widths.
pub fn marker_metrics(config: &Config) -> Result<MarkerMetrics> {
    let fallback = configured_widths(config);
    match &config.font.path {
        Some(path) => {
            let measurer = FontMeasurer::from_file(path, config.font.size)?;
            Ok(fallback.measured_with(&measurer))
        }
        None => Ok(fallback),
    }
}

fn configured_widths(config: &Config) -> MarkerMetrics {
    MarkerMetrics::new(
        config.list.ordered_marker_width,
        config.list.unordered_marker_width,
    )
}

/// Render an HTML fragment using default config.
pub fn render_html(html: &str) -> RichTextBuffer {
    let config = Config::compiled_default();
    render(
        scan_html(html),
        configured_widths(&config),
        &RenderOptions::from(&config),
    )
}

/// Render an HTML fragment with custom config.
pub fn render_html_with_config(html: &str, config: &Config) -> Result<RichTextBuffer> {
    let metrics = marker_metrics(config)?;
    Ok(render(scan_html(html), metrics, &RenderOptions::from(config)))
}

/// Render markdown using default config.
pub fn render_markdown(markdown: &str) -> RichTextBuffer {
    let config = Config::compiled_default();
    render(
        markdown_events(markdown),
        configured_widths(&config),
        &RenderOptions::from(&config),
    )
}

/// Render markdown with custom config.
pub fn render_markdown_with_config(markdown: &str, config: &Config) -> Result<RichTextBuffer> {
    let metrics = marker_metrics(config)?;
    Ok(render(markdown_events(markdown), metrics, &RenderOptions::from(config)))
}
