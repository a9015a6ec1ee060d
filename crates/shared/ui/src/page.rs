const VIEWPORT: &str = r#"<meta name="viewport" content="width=device-width, initial-scale=1.0">"#;
const TAILWIND_CDN: &str = r#"<script src="https://cdn.tailwindcss.com"></script>"#;

/// Full HTML document around server-rendered markup.
#[derive(Debug, Clone)]
pub struct PageShell {
    title: String,
    head: Vec<String>,
}

impl PageShell {
    /// A document with the viewport meta tag and Tailwind already in `<head>`.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self { title: title.into(), head: vec![VIEWPORT.to_owned(), TAILWIND_CDN.to_owned()] }
    }

    /// Appends raw markup to `<head>`.
    #[must_use]
    pub fn with_head(mut self, markup: impl Into<String>) -> Self {
        self.head.push(markup.into());
        self
    }

    #[must_use]
    pub fn render(&self, body: &str) -> String {
        let head = self.head.join("");
        format!(
            "<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\"><title>{}</title>{head}</head><body>{body}</body></html>",
            escape(&self.title)
        )
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shell_carries_title_viewport_and_tailwind() {
        let html = PageShell::new("Garage").render("<p>hi</p>");
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Garage</title>"));
        assert!(html.contains(VIEWPORT));
        assert!(html.contains("cdn.tailwindcss.com"));
        assert!(html.contains("<body><p>hi</p></body>"));
    }

    #[test]
    fn extra_head_markup_and_escaped_title() {
        let html = PageShell::new("A & B").with_head("<link rel=\"icon\" href=\"/autoims.png\">").render("");
        assert!(html.contains("<title>A &amp; B</title>"));
        assert!(html.contains("rel=\"icon\""));
    }
}
