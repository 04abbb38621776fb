use std::sync::{LazyLock, Mutex, PoisonError};

use scraper::{ElementRef, Html, Selector};

static LINK_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("link selector is valid"));

/// The `index`-th element matching `selector` on the page.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Region {
    pub index: usize,
    pub selector: String,
}

/// Element inside a region that receives the trigger control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor {
    pub region: Region,
    pub selector: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertedControl {
    pub control_id: String,
    pub region: usize,
    pub anchor_selector: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid selector {selector:?}: {message}")]
pub struct SelectorError {
    pub selector: String,
    pub message: String,
}

/// Page access needed to wire trigger controls and read attachment links.
pub trait RegionProvider: Send + Sync {
    fn regions(&self, selector: &str) -> Result<Vec<Region>, SelectorError>;

    fn find_anchor(&self, region: &Region, selector: &str)
        -> Result<Option<Anchor>, SelectorError>;

    /// Insert a trigger control as the first child of `anchor`.
    fn insert_trigger(&self, anchor: &Anchor, control_id: &str, label: &str);

    /// Raw `href` values of every link below `region`, in document order.
    fn candidate_links(&self, region: &Region) -> Vec<String>;

    /// Text content of the `index`-th element matching `selector`, page-wide.
    fn text_at(&self, selector: &str, index: usize) -> Result<Option<String>, SelectorError>;
}

pub fn parse_selector(selector: &str) -> Result<Selector, SelectorError> {
    Selector::parse(selector).map_err(|err| SelectorError {
        selector: selector.to_string(),
        message: err.to_string(),
    })
}

/// Region provider over a static HTML document.
///
/// The document is parsed on each call; `scraper::Html` is not `Send`, and
/// keeping only the source text lets jobs for several regions run at once.
#[derive(Debug, Default)]
pub struct HtmlRegionProvider {
    source: String,
    inserted: Mutex<Vec<InsertedControl>>,
}

impl HtmlRegionProvider {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            inserted: Mutex::new(Vec::new()),
        }
    }

    /// Controls inserted so far, in insertion order.
    pub fn inserted_controls(&self) -> Vec<InsertedControl> {
        self.inserted
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn with_region<R>(&self, region: &Region, f: impl FnOnce(ElementRef<'_>) -> R) -> Option<R> {
        let selector = parse_selector(&region.selector).ok()?;
        let document = Html::parse_document(&self.source);
        let element = document.select(&selector).nth(region.index)?;
        Some(f(element))
    }
}

impl RegionProvider for HtmlRegionProvider {
    fn regions(&self, selector: &str) -> Result<Vec<Region>, SelectorError> {
        let parsed = parse_selector(selector)?;
        let document = Html::parse_document(&self.source);
        let count = document.select(&parsed).count();
        Ok((0..count)
            .map(|index| Region {
                index,
                selector: selector.to_string(),
            })
            .collect())
    }

    fn find_anchor(
        &self,
        region: &Region,
        selector: &str,
    ) -> Result<Option<Anchor>, SelectorError> {
        let parsed = parse_selector(selector)?;
        let found = self
            .with_region(region, |element| element.select(&parsed).next().is_some())
            .unwrap_or(false);
        Ok(found.then(|| Anchor {
            region: region.clone(),
            selector: selector.to_string(),
        }))
    }

    fn insert_trigger(&self, anchor: &Anchor, control_id: &str, label: &str) {
        self.inserted
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(InsertedControl {
                control_id: control_id.to_string(),
                region: anchor.region.index,
                anchor_selector: anchor.selector.clone(),
                label: label.to_string(),
            });
    }

    fn candidate_links(&self, region: &Region) -> Vec<String> {
        self.with_region(region, |element| {
            element
                .select(&LINK_SELECTOR)
                .filter_map(|link| link.value().attr("href"))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
    }

    fn text_at(&self, selector: &str, index: usize) -> Result<Option<String>, SelectorError> {
        let parsed = parse_selector(selector)?;
        let document = Html::parse_document(&self.source);
        let text = document
            .select(&parsed)
            .nth(index)
            .map(|element| element.text().collect::<String>());
        Ok(text)
    }
}
