//! Lookbook / catalogue extraction.
//!
//! Two sources produce the same output: a dedicated lookbook CSV, or the full
//! product export filtered to lookbook records. The product export also carries
//! fitment and category data, which is folded into filtering metadata.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::DataError;
use crate::hotspot::HotspotIndex;
use crate::output;
use crate::sku::split_pipe_list;

/// Prefix for lookbook image file names.
pub const DEFAULT_IMAGE_BASE_URL: &str = "https://www.introcar.com/media/lookbookslider/";

/// `stockType` value that marks a product record as a lookbook.
pub const LOOKBOOK_STOCK_TYPE: &str = "Lookbook";

// ── Output records ──────────────────────────────────────────────────────────

/// One lookbook/catalogue page as written to `lookbooks.json`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Lookbook {
    pub id: String,
    pub title: String,
    pub image_url: Option<String>,
    pub cms_url: String,
    /// Only present for lookbooks built from the product export
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalogue_link: Option<String>,
    /// Parent part SKUs shown on the page, in source order, without repeats
    pub hotspots: Vec<String>,
    /// Number of unique parent SKUs in `hotspots`
    pub hotspot_count: usize,
    #[serde(flatten)]
    pub metadata: Option<LookbookMetadata>,
}

/// Filtering metadata derived from a product record.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LookbookMetadata {
    pub makes: Vec<String>,
    pub models: Vec<String>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    /// Raw fitment entries as they appear in the product record
    pub fitment: Vec<serde_json::Value>,
}

// ── Input records ───────────────────────────────────────────────────────────

/// A row of the lookbook CSV. Missing columns read as empty strings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LookbookRow {
    pub sku: String,
    #[serde(rename = "slider title")]
    pub title: String,
    pub hotspot: String,
    #[serde(rename = "cms page url")]
    pub cms_url: String,
    pub image: String,
}

/// A product record from the product JSON export.
///
/// Every field is optional. Text fields accept strings and numbers (numbers
/// are kept as their JSON text); any other type reads as `None`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Product {
    #[serde(deserialize_with = "lenient_text")]
    pub sku: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub stock_type: Option<String>,
    /// Used as the lookbook title
    #[serde(deserialize_with = "lenient_text")]
    pub description: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub image: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub cms_page_url: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub catalogue_link: Option<String>,
    /// Pipe-delimited parent SKUs
    #[serde(deserialize_with = "lenient_text")]
    pub hotspot: Option<String>,
    /// Fitment entries, passed through to the output unchanged
    #[serde(deserialize_with = "lenient_list")]
    pub fitment: Option<Vec<serde_json::Value>>,
    /// `"Main/Sub|Other/Path"`
    #[serde(deserialize_with = "lenient_text")]
    pub categories: Option<String>,
}

impl Product {
    pub fn is_lookbook(&self) -> bool {
        self.stock_type.as_deref() == Some(LOOKBOOK_STOCK_TYPE)
    }
}

/// Read a JSON string or number as text; anything else is `None`.
pub fn value_as_text(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value_as_text(&value))
}

fn lenient_list<'de, D>(deserializer: D) -> Result<Option<Vec<serde_json::Value>>, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Array(items) => Ok(Some(items)),
        _ => Ok(None),
    }
}

// ── Image mapping ───────────────────────────────────────────────────────────

/// SKU -> full image URL, loaded from the lookbook CSV.
#[derive(Debug, Clone, Default)]
pub struct ImageMap {
    urls: HashMap<String, String>,
}

impl ImageMap {
    /// Load from a lookbook CSV. Rows need both `sku` and `image`.
    pub fn load(path: &Path, base_url: &str) -> Result<Self, DataError> {
        let rows = read_lookbook_csv(path)?;
        Ok(Self::from_rows(&rows, base_url))
    }

    /// Like [`ImageMap::load`], but a missing or unreadable file yields an
    /// empty map and a warning.
    pub fn load_or_empty(path: &Path, base_url: &str) -> Self {
        match Self::load(path, base_url) {
            Ok(map) => map,
            Err(e) => {
                log::warn!("Could not load CSV image mapping: {e}");
                Self::default()
            }
        }
    }

    pub fn from_rows(rows: &[LookbookRow], base_url: &str) -> Self {
        let urls = rows
            .iter()
            .filter(|r| !r.sku.is_empty() && !r.image.is_empty())
            .map(|r| (r.sku.clone(), format!("{base_url}{}", r.image)))
            .collect();
        Self { urls }
    }

    pub fn get(&self, sku: &str) -> Option<&str> {
        self.urls.get(sku).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}

// ── Parsing helpers ─────────────────────────────────────────────────────────

/// Parse a pipe-delimited hotspot field. Repeated SKUs are listed once, so
/// `hotspotCount` counts unique parent SKUs.
pub fn parse_hotspots(raw: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    split_pipe_list(raw)
        .into_iter()
        .filter(|h| seen.insert(h.clone()))
        .collect()
}

/// Unique makes and models from fitment entries, each sorted.
///
/// Entries that are not objects, and `make`/`model` values that are empty or
/// not text, are ignored.
pub fn extract_makes_models(fitment: &[serde_json::Value]) -> (Vec<String>, Vec<String>) {
    let mut makes = BTreeSet::new();
    let mut models = BTreeSet::new();
    let field = |entry: &serde_json::Value, key: &str| {
        entry
            .get(key)
            .and_then(value_as_text)
            .filter(|v| !v.is_empty())
    };
    for entry in fitment {
        if let Some(make) = field(entry, "make") {
            makes.insert(make);
        }
        if let Some(model) = field(entry, "model") {
            models.insert(model);
        }
    }
    (makes.into_iter().collect(), models.into_iter().collect())
}

/// Main category and subcategory from a categories string.
///
/// Only the first `|`-separated path is used; it is split on its first `/`.
pub fn extract_categories(categories: &str) -> (Option<String>, Option<String>) {
    let first = categories.split('|').next().unwrap_or_default();
    let (main, sub) = match first.split_once('/') {
        Some((main, sub)) => (main, Some(sub)),
        None => (first, None),
    };
    let non_empty = |s: &str| {
        let s = s.trim();
        (!s.is_empty()).then(|| s.to_string())
    };
    (non_empty(main), sub.and_then(non_empty))
}

// ── CSV variant ─────────────────────────────────────────────────────────────

/// Read all rows of a lookbook CSV.
pub fn read_lookbook_csv(path: &Path) -> Result<Vec<LookbookRow>, DataError> {
    let contents = std::fs::read_to_string(path).map_err(|e| DataError::io(path, e))?;
    parse_lookbook_csv(&contents).map_err(|e| DataError::csv(path, e))
}

/// Parse lookbook CSV content. Malformed rows are skipped with a warning.
pub fn parse_lookbook_csv(content: &str) -> Result<Vec<LookbookRow>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());
    // Fail early on an unreadable header row rather than per record.
    reader.headers()?;

    let mut rows = Vec::new();
    for result in reader.deserialize::<LookbookRow>() {
        match result {
            Ok(row) => rows.push(row),
            Err(e) => log::warn!("Skipping malformed lookbook row: {e}"),
        }
    }
    Ok(rows)
}

/// Build lookbooks from CSV rows. Rows without a SKU or title are skipped.
pub fn lookbooks_from_rows(rows: &[LookbookRow], base_url: &str) -> Vec<Lookbook> {
    rows.iter()
        .filter(|r| !r.sku.is_empty() && !r.title.is_empty())
        .map(|r| {
            let hotspots = parse_hotspots(&r.hotspot);
            Lookbook {
                id: r.sku.clone(),
                title: r.title.clone(),
                image_url: (!r.image.is_empty()).then(|| format!("{base_url}{}", r.image)),
                cms_url: r.cms_url.clone(),
                catalogue_link: None,
                hotspot_count: hotspots.len(),
                hotspots,
                metadata: None,
            }
        })
        .collect()
}

// ── Product variant ─────────────────────────────────────────────────────────

/// Read the product JSON export.
///
/// The file must be a JSON array; entries that cannot be read as a product
/// are skipped with a warning.
pub fn read_products(path: &Path) -> Result<Vec<Product>, DataError> {
    let contents = std::fs::read_to_string(path).map_err(|e| DataError::io(path, e))?;
    let values: Vec<serde_json::Value> =
        serde_json::from_str(&contents).map_err(|e| DataError::json(path, e))?;

    let mut products = Vec::with_capacity(values.len());
    for (i, value) in values.into_iter().enumerate() {
        match serde_json::from_value::<Product>(value) {
            Ok(p) => products.push(p),
            Err(e) => log::warn!("Skipping product #{i}: {e}"),
        }
    }
    Ok(products)
}

/// Build a lookbook from a product record.
///
/// The image URL comes from `image_map` when it has the SKU, else from the
/// product's own `image` field.
pub fn lookbook_from_product(product: &Product, image_map: &ImageMap) -> Lookbook {
    let sku = product.sku.clone().unwrap_or_default();
    let hotspots = parse_hotspots(product.hotspot.as_deref().unwrap_or_default());
    let fitment = product.fitment.clone().unwrap_or_default();
    let (makes, models) = extract_makes_models(&fitment);
    let (category, subcategory) =
        extract_categories(product.categories.as_deref().unwrap_or_default());

    let image_url = image_map
        .get(&sku)
        .map(str::to_string)
        .or_else(|| product.image.clone().filter(|i| !i.is_empty()));

    Lookbook {
        title: product.description.clone().unwrap_or_else(|| sku.clone()),
        id: sku,
        image_url,
        cms_url: product.cms_page_url.clone().unwrap_or_default(),
        catalogue_link: Some(product.catalogue_link.clone().unwrap_or_default()),
        hotspot_count: hotspots.len(),
        hotspots,
        metadata: Some(LookbookMetadata {
            makes,
            models,
            category,
            subcategory,
            fitment,
        }),
    }
}

/// Build lookbooks from every product flagged as a lookbook.
pub fn lookbooks_from_products(products: &[Product], image_map: &ImageMap) -> Vec<Lookbook> {
    products
        .iter()
        .filter(|p| p.is_lookbook())
        .map(|p| lookbook_from_product(p, image_map))
        .collect()
}

// ── Output set ──────────────────────────────────────────────────────────────

/// Lookbooks sorted by title, plus the reverse hotspot index.
#[derive(Debug, Clone, Default)]
pub struct LookbookSet {
    pub lookbooks: Vec<Lookbook>,
    pub hotspots: HotspotIndex,
}

impl LookbookSet {
    /// Index hotspots in source order, then sort lookbooks by title.
    pub fn new(mut lookbooks: Vec<Lookbook>) -> Self {
        let hotspots = HotspotIndex::from_lookbooks(&lookbooks);
        lookbooks.sort_by(|a, b| a.title.cmp(&b.title));
        Self {
            lookbooks,
            hotspots,
        }
    }

    /// Write the lookbooks (indented) and the hotspot index (compact).
    pub fn write(&self, lookbooks_path: &Path, hotspot_path: &Path) -> Result<(), DataError> {
        output::write_json_pretty(lookbooks_path, &self.lookbooks)?;
        output::write_json_compact(hotspot_path, &self.hotspots)
    }

    pub fn len(&self) -> usize {
        self.lookbooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lookbooks.is_empty()
    }

    pub fn with_images(&self) -> usize {
        self.lookbooks.iter().filter(|l| l.image_url.is_some()).count()
    }

    pub fn with_fitment(&self) -> usize {
        self.lookbooks
            .iter()
            .filter(|l| l.metadata.as_ref().is_some_and(|m| !m.fitment.is_empty()))
            .count()
    }

    pub fn with_category(&self) -> usize {
        self.lookbooks
            .iter()
            .filter(|l| l.metadata.as_ref().is_some_and(|m| m.category.is_some()))
            .count()
    }

    /// All makes across lookbooks, sorted.
    pub fn unique_makes(&self) -> Vec<&str> {
        let makes: BTreeSet<&str> = self
            .lookbooks
            .iter()
            .filter_map(|l| l.metadata.as_ref())
            .flat_map(|m| m.makes.iter().map(String::as_str))
            .collect();
        makes.into_iter().collect()
    }

    /// All main categories across lookbooks, sorted.
    pub fn unique_categories(&self) -> Vec<&str> {
        let categories: BTreeSet<&str> = self
            .lookbooks
            .iter()
            .filter_map(|l| l.metadata.as_ref()?.category.as_deref())
            .collect();
        categories.into_iter().collect()
    }
}

/// Inputs and outputs for building lookbooks from the lookbook CSV.
#[derive(Debug, Clone)]
pub struct LookbookCsvJob {
    pub input: PathBuf,
    pub lookbooks_output: PathBuf,
    pub hotspot_output: PathBuf,
    pub image_base_url: String,
}

impl LookbookCsvJob {
    pub fn run(&self) -> Result<LookbookSet, DataError> {
        let rows = read_lookbook_csv(&self.input)?;
        let set = LookbookSet::new(lookbooks_from_rows(&rows, &self.image_base_url));
        set.write(&self.lookbooks_output, &self.hotspot_output)?;
        Ok(set)
    }
}

/// Inputs and outputs for building lookbooks from the product export.
#[derive(Debug, Clone)]
pub struct LookbookProductsJob {
    pub products: PathBuf,
    /// Optional lookbook CSV used only for image URLs
    pub image_map_csv: Option<PathBuf>,
    pub lookbooks_output: PathBuf,
    pub hotspot_output: PathBuf,
    pub image_base_url: String,
}

/// Counts gathered while running a [`LookbookProductsJob`].
#[derive(Debug, Clone)]
pub struct ProductsOutcome {
    pub products_loaded: usize,
    pub image_mappings: usize,
    pub set: LookbookSet,
}

impl LookbookProductsJob {
    pub fn run(&self) -> Result<ProductsOutcome, DataError> {
        let products = read_products(&self.products)?;
        let image_map = match &self.image_map_csv {
            Some(path) => ImageMap::load_or_empty(path, &self.image_base_url),
            None => ImageMap::default(),
        };

        let set = LookbookSet::new(lookbooks_from_products(&products, &image_map));
        set.write(&self.lookbooks_output, &self.hotspot_output)?;
        Ok(ProductsOutcome {
            products_loaded: products.len(),
            image_mappings: image_map.len(),
            set,
        })
    }
}

#[cfg(test)]
#[path = "tests/lookbook_tests.rs"]
mod tests;
