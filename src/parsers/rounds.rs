use crate::error::{ListingParseError, Result};
use crate::models::RoundSummary;
use crate::parsers::{first_text, resolve_url, selector};
use reqwest::Url;
use scraper::Html;

/// One parsed page of the rounds overview.
#[derive(Debug, Default)]
pub struct RoundsPage {
    pub rounds: Vec<RoundSummary>,
    /// Rows that could not be used at all. Missing fields do not end up here.
    pub errors: Vec<ListingParseError>,
    pub next_page: Option<String>,
}

/// Parses the rounds overview served from `page_url`.
///
/// Each `tr[data-href]` row becomes one summary; a field whose element is
/// missing is left as `None` instead of dropping the row.
pub fn parse_rounds_page(html: &str, page_url: &str) -> Result<RoundsPage> {
    let document = Html::parse_document(html);

    let row_sel = selector("tr[data-href]")?;
    let date_sel = selector(".date")?;
    let course_sel = selector(".course-name")?;
    let score_sel = selector(".score strong")?;
    let fairway_sel = selector(".fairway .value")?;
    let gir_sel = selector(".gir .value")?;
    let putts_sel = selector(".putts")?;
    let next_sel = selector("a[rel~=\"next\"][href], link[rel~=\"next\"][href]")?;

    let mut page = RoundsPage::default();

    for (row_index, row) in document.select(&row_sel).enumerate() {
        let href = row.value().attr("data-href").unwrap_or_default().trim();
        if href.is_empty() {
            page.errors.push(ListingParseError::MissingHref { row: row_index });
            continue;
        }

        let Some((url, round_id)) = resolve_url(page_url, href).and_then(|url| {
            let id = round_id_from_url(&url)?;
            Some((url, id))
        }) else {
            page.errors.push(ListingParseError::InvalidHref {
                row: row_index,
                href: href.to_string(),
            });
            continue;
        };

        page.rounds.push(RoundSummary {
            round_id,
            date: first_text(row, &date_sel),
            course_name: first_text(row, &course_sel),
            score: first_text(row, &score_sel),
            fairway_pct: first_text(row, &fairway_sel),
            gir_pct: first_text(row, &gir_sel),
            putts: first_text(row, &putts_sel),
            url,
        });
    }

    page.next_page = document
        .select(&next_sel)
        .filter_map(|el| el.value().attr("href"))
        .filter(|href| !href.trim().is_empty() && !href.trim().starts_with('#'))
        .find_map(|href| resolve_url(page_url, href));

    Ok(page)
}

/// The last non-empty path segment, e.g. `/profiles/abc/rounds/123` -> `123`.
pub fn round_id_from_url(url: &str) -> Option<String> {
    let url = Url::parse(url).ok()?;
    url.path_segments()?
        .filter(|segment| !segment.is_empty())
        .last()
        .map(str::to_string)
}
