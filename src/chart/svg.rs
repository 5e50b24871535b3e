// Shared SVG building blocks for the chart renderers

/// One rendered chart panel: inner SVG markup plus its dimensions, ready to
/// be wrapped into a standalone document or composed into an overview figure
#[derive(Clone, Debug)]
pub struct Panel {
    pub width: u32,
    pub height: u32,
    pub body: String,
}

impl Panel {
    /// Wrap the panel into a standalone SVG document
    pub fn into_document(self) -> String {
        let mut svg = String::with_capacity(self.body.len() + 256);
        svg.push_str(&format!(
            r#"<svg width="{}" height="{}" viewBox="0 0 {} {}" xmlns="http://www.w3.org/2000/svg">"#,
            self.width, self.height, self.width, self.height
        ));
        svg.push('\n');
        svg.push_str(&self.body);
        svg.push_str("\n</svg>");
        svg
    }
}

/// Escape text content for embedding in SVG
pub(crate) fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

pub(crate) fn rect(x: f32, y: f32, width: f32, height: f32, fill: &str, stroke: &str) -> String {
    format!(
        r#"  <rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="{}" stroke="{}" />"#,
        x, y, width, height, fill, stroke
    )
}

pub(crate) fn line(x1: f32, y1: f32, x2: f32, y2: f32, stroke: &str, width: f32) -> String {
    format!(
        r#"  <line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{}" stroke-width="{:.2}" />"#,
        x1, y1, x2, y2, stroke, width
    )
}

pub(crate) fn dashed_line(x1: f32, y1: f32, x2: f32, y2: f32, stroke: &str, width: f32) -> String {
    format!(
        r#"  <line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{}" stroke-width="{:.2}" stroke-dasharray="4 3" />"#,
        x1, y1, x2, y2, stroke, width
    )
}

pub(crate) fn text(
    x: f32,
    y: f32,
    content: &str,
    fill: &str,
    size: f32,
    anchor: &str,
) -> String {
    format!(
        r#"  <text x="{:.2}" y="{:.2}" fill="{}" font-size="{:.1}" font-family="sans-serif" text-anchor="{}">{}</text>"#,
        x,
        y,
        fill,
        size,
        anchor,
        escape_text(content)
    )
}
