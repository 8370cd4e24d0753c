pub mod login;
pub mod rounds;
pub mod scorecard;

use crate::error::{Result, ScraperError};
use reqwest::Url;
use scraper::{ElementRef, Selector};

pub(crate) fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css)
        .map_err(|e| ScraperError::ParsingError(format!("invalid selector `{}`: {:?}", css, e)))
}

/// Trimmed text of the first element matching `selector`, `None` when absent or blank.
pub(crate) fn first_text(scope: ElementRef<'_>, selector: &Selector) -> Option<String> {
    scope
        .select(selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|text| !text.is_empty())
}

/// Resolves a (possibly relative) href against the page it was found on.
pub(crate) fn resolve_url(base: &str, href: &str) -> Option<String> {
    let base = Url::parse(base).ok()?;
    let url = base.join(href.trim()).ok()?;
    matches!(url.scheme(), "http" | "https").then(|| url.to_string())
}
