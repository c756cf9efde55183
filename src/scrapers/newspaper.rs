//! Publisher front-page listing extractor.
//!
//! Reads the "newspaper" listing of one publisher (one document per
//! edition) and turns it into a [`PressExtractionResult`]: page label →
//! articles, in document order.
//!
//! Publisher markup varies, so every lookup is a cascade of strategies tried
//! in order until one yields something:
//!
//! | Step | Cascade |
//! |------|---------|
//! | Container | [`ListingSite::container_selectors`] |
//! | Page label | page notation element → block heading → skip block |
//! | Article title | dedicated title element → bold/emphasis → anchor text |
//!
//! Article links are resolved against the site's article host and kept only
//! if they point at an article path there, which drops navigation and ad links.

use crate::config::{BROWSER_USER_AGENT, ListingSite};
use crate::error::{Error, Result};
use crate::models::{Article, PressExtractionResult};
use crate::utils::{collapse_whitespace, truncate_for_log};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue};
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};
use url::Url;

static PAGE_BLOCK: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(".newspaper_brick_item, .newspaper_page, .page_block").unwrap()
});
static PAGE_NOTATION: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".page_notation, .newspaper_page_num, .page_num").unwrap());
static EMPHASIS: Lazy<Selector> = Lazy::new(|| Selector::parse("em").unwrap());
static HEADING: Lazy<Selector> =
    Lazy::new(|| Selector::parse("h2, h3, h4, .page_title").unwrap());
static LIST_ITEM: Lazy<Selector> = Lazy::new(|| Selector::parse("li").unwrap());
static ANCHOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").unwrap());
static TITLE: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(".tit, .title, .newspaper_article_tit, .article_title").unwrap()
});
static BOLD: Lazy<Selector> = Lazy::new(|| Selector::parse("strong, b").unwrap());

/// Ways to read a page label off a page block, in preference order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LabelSource {
    /// Dedicated page-number element, e.g. `<span class="page_notation"><em>A1</em>면</span>`.
    Notation,
    /// The block's heading.
    Heading,
}

const LABEL_SOURCES: [LabelSource; 2] = [LabelSource::Notation, LabelSource::Heading];

impl LabelSource {
    fn resolve(self, block: ElementRef<'_>) -> Option<String> {
        let text = match self {
            LabelSource::Notation => notation_text(block.select(&PAGE_NOTATION).next()?),
            LabelSource::Heading => full_text(block.select(&HEADING).next()?),
        };
        (!text.is_empty()).then_some(text)
    }
}

/// Ways to read an article title off a list item, in preference order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TitleSource {
    Dedicated,
    Bold,
    Anchor,
}

const TITLE_SOURCES: [TitleSource; 3] =
    [TitleSource::Dedicated, TitleSource::Bold, TitleSource::Anchor];

impl TitleSource {
    fn resolve(self, item: ElementRef<'_>, anchor: ElementRef<'_>) -> Option<String> {
        let text = match self {
            TitleSource::Dedicated => full_text(item.select(&TITLE).next()?),
            TitleSource::Bold => full_text(item.select(&BOLD).next()?),
            TitleSource::Anchor => full_text(anchor),
        };
        (!text.is_empty()).then_some(text)
    }
}

fn full_text(el: ElementRef<'_>) -> String {
    collapse_whitespace(&el.text().collect::<String>())
}

/// Label text of a page-notation element.
///
/// When the element carries text of its own, all of its text is used. When
/// it only wraps children (screen-reader spans, an `<em>` with the number),
/// the `<em>` text plus whatever follows it is used.
fn notation_text(notation: ElementRef<'_>) -> String {
    let direct: String = notation
        .children()
        .filter_map(|n| n.value().as_text().map(|t| &**t))
        .collect();
    if !direct.trim().is_empty() {
        return full_text(notation);
    }

    let Some(em) = notation.select(&EMPHASIS).next() else {
        return full_text(notation);
    };
    let mut label = em.text().collect::<String>();
    for sibling in em.next_siblings() {
        if let Some(text) = sibling.value().as_text() {
            label.push_str(text);
        } else if let Some(el) = ElementRef::wrap(sibling) {
            label.extend(el.text());
        }
    }
    collapse_whitespace(&label)
}

/// Absolute article URL for `href`, or `None` if it is not an article on the site.
fn resolve_article_link(href: &str, base: &Url, site: &ListingSite) -> Option<String> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return None;
    }
    let url = base.join(href).ok()?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str() != base.host_str() {
        return None;
    }
    site.article_paths
        .iter()
        .any(|p| url.path().starts_with(p.as_str()))
        .then(|| url.to_string())
}

fn parse_article(item: ElementRef<'_>, anchor: ElementRef<'_>, base: &Url, site: &ListingSite) -> Option<Article> {
    let link = resolve_article_link(anchor.value().attr("href")?, base, site)?;
    let title = TITLE_SOURCES
        .iter()
        .find_map(|source| source.resolve(item, anchor))?;
    Some(Article::new(title, link))
}

/// Parse a listing document into page label → articles.
///
/// Blocks without a label and items without a usable link or title are
/// dropped silently. Nested matches (a container inside a container, a list
/// item inside a list item) are read once.
///
/// # Arguments
///
/// * `press_id` - Publisher id, used in errors and logs.
/// * `html` - The listing document.
/// * `site` - Container selectors, article host and article paths.
///
/// # Returns
///
/// The publisher's pages in document order, or [`Error::ContainerNotFound`]
/// when no container selector matches and [`Error::NoArticlesFound`] when
/// nothing survives.
#[instrument(level = "debug", skip(html, site), fields(bytes = html.len()))]
pub fn parse_listing(press_id: &str, html: &str, site: &ListingSite) -> Result<PressExtractionResult> {
    let base = Url::parse(&site.article_host).map_err(|e| {
        Error::InvalidRequest(format!("bad article host '{}': {e}", site.article_host))
    })?;
    let document = Html::parse_document(html);

    let mut containers: Vec<ElementRef<'_>> = Vec::new();
    for raw in &site.container_selectors {
        let selector = match Selector::parse(raw) {
            Ok(s) => s,
            Err(e) => {
                warn!(selector = %raw, error = %e, "Skipping invalid container selector");
                continue;
            }
        };
        containers = document.select(&selector).collect();
        if !containers.is_empty() {
            debug!(selector = %raw, count = containers.len(), "Matched listing container");
            break;
        }
    }
    if containers.is_empty() {
        return Err(Error::ContainerNotFound {
            press_id: press_id.to_string(),
            selectors_tried: site.container_selectors.len(),
        });
    }

    let matched: HashSet<_> = containers.iter().map(|c| c.id()).collect();
    containers.retain(|c| !c.ancestors().any(|a| matched.contains(&a.id())));

    let mut result = PressExtractionResult::new();
    let mut blocks = 0usize;
    let mut seen_blocks = HashSet::new();
    let mut seen_anchors = HashSet::new();
    for container in &containers {
        for block in container.select(&PAGE_BLOCK) {
            if !seen_blocks.insert(block.id()) {
                continue;
            }
            blocks += 1;
            let Some(label) = LABEL_SOURCES.iter().find_map(|s| s.resolve(block)) else {
                debug!(block = blocks, "Skipping page block without a label");
                continue;
            };

            let articles: Vec<Article> = block
                .select(&LIST_ITEM)
                .filter_map(|item| {
                    let anchor = item.select(&ANCHOR).next()?;
                    seen_anchors
                        .insert(anchor.id())
                        .then(|| parse_article(item, anchor, &base, site))
                        .flatten()
                })
                .collect();
            if articles.is_empty() {
                debug!(%label, "Page block yielded no articles");
                continue;
            }
            debug!(%label, count = articles.len(), "Parsed page block");
            result.merge_page(&label, articles);
        }
    }

    if result.is_empty() {
        return Err(Error::NoArticlesFound {
            press_id: press_id.to_string(),
            containers: containers.len(),
            blocks,
        });
    }
    Ok(result)
}

/// Fetches and parses front-page listings for one site.
#[derive(Debug, Clone)]
pub struct NewspaperExtractor {
    client: reqwest::Client,
    site: ListingSite,
}

impl NewspaperExtractor {
    pub fn new(site: ListingSite) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("ko-KR,ko;q=0.9,en;q=0.5"));

        let client = reqwest::Client::builder()
            .user_agent(BROWSER_USER_AGENT)
            .default_headers(headers)
            .timeout(site.timeout)
            .build()
            .map_err(Error::HttpClient)?;
        Ok(Self { client, site })
    }

    pub fn site(&self) -> &ListingSite {
        &self.site
    }

    /// Extract one publisher's listing.
    ///
    /// # Arguments
    ///
    /// * `press_id` - Publisher id, e.g. `"023"`.
    /// * `date` - Edition date; `None` means the latest edition.
    ///
    /// # Returns
    ///
    /// The parsed listing, or [`Error::FetchFailed`] / a [`parse_listing`]
    /// error. One attempt, no retries.
    #[instrument(level = "info", skip(self, press_id), fields(press_id = %press_id))]
    pub async fn extract(&self, press_id: &str, date: Option<NaiveDate>) -> Result<PressExtractionResult> {
        let press_id = press_id.trim();
        if press_id.is_empty() {
            return Err(Error::InvalidRequest("press id is empty".to_string()));
        }

        let url = self.site.listing_url_for(press_id, date);
        let t0 = Instant::now();
        let html = self.fetch_listing(&url).await?;
        let result = parse_listing(press_id, &html, &self.site)?;

        info!(
            %url,
            pages = result.len(),
            articles = result.article_count(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Extracted front-page listing"
        );
        Ok(result)
    }

    async fn fetch_listing(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::fetch(url, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%url, status = status.as_u16(), body = %truncate_for_log(&body, 200), "Listing fetch returned non-success status");
            return Err(Error::FetchFailed {
                url: url.to_string(),
                status: Some(status.as_u16()),
                message: status.canonical_reason().unwrap_or("unexpected status").to_string(),
            });
        }

        response.text().await.map_err(|e| Error::fetch(url, e))
    }
}
