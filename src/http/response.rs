//! Response rendering.
//!
//! # Responsibilities
//! - Render the HTML page: usage examples, then the matched countries
//! - Shape JSON bodies for the API and health endpoints
//!
//! # Design Decisions
//! - Countries are listed as `[{Name} {Name} ...]`
//! - Registry-provided text is HTML-escaped before it reaches the page

use serde::Serialize;

use crate::registry::Country;

const USAGE: &str = r#"Examples:<ul>
    <li><a href="/?letters=uk">?letters=uk</a></li>
    <li><a href="/?letters=ab">?letters=ab</a></li>
    <li><a href="/?letters=z">?letters=z</a></li>
    <li><a href="/?letters=spi">?letters=spi</a></li>
    <li><a href="/">All countries</a></li>
</ul>

Looks up the countries of the country register whose names contain
every one of the given letters.

<br/><br/>
"#;

/// Render the full HTML page for a set of sorted matches.
pub fn render_page(matches: &[Country]) -> String {
    let mut page = String::with_capacity(USAGE.len() + 64 + matches.len() * 24);
    page.push_str(USAGE);
    page.push_str("<h2>Matched countries:</h2> <p>");
    page.push_str(&escape_html(&format_countries(matches)));
    page.push_str("</p>");
    page
}

/// Format countries as a bracketed, space-separated list.
pub fn format_countries(countries: &[Country]) -> String {
    let items: Vec<String> = countries.iter().map(ToString::to_string).collect();
    format!("[{}]", items.join(" "))
}

/// Escape the characters that are significant in HTML text.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Body of `GET /api/countries`.
#[derive(Debug, Serialize)]
pub struct MatchesResponse {
    pub letters: String,
    pub count: usize,
    pub countries: Vec<Country>,
}

/// Body of `GET /healthz`.
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub version: &'static str,
    pub countries: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_countries() {
        assert_eq!(format_countries(&[]), "[]");
        assert_eq!(
            format_countries(&[Country::new("Germany"), Country::new("Spain")]),
            "[{Germany} {Spain}]"
        );
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("Côte D'Ivoire"), "Côte D&#39;Ivoire");
        assert_eq!(escape_html("<b>&</b>"), "&lt;b&gt;&amp;&lt;/b&gt;");
    }

    #[test]
    fn test_render_page() {
        let page = render_page(&[Country::new("United Kingdom")]);
        assert!(page.starts_with("Examples:<ul>"));
        assert!(page.contains(r#"<a href="/?letters=spi">"#));
        assert!(page.ends_with("<h2>Matched countries:</h2> <p>[{United Kingdom}]</p>"));
        assert!(!page.contains("github.com"));
    }
}
