// StoneBasyx publishes one HTML page per product, listing every in-stock
// lot as a fixed run of label lines. Pages are fetched with plain GETs and
// line-scanned by `scanner`.

use serde::{Deserialize, Serialize};

use super::canonical::{Slab, Vendor};
use super::common::read_body;
use super::{FetchFuture, VendorAdapter};
use crate::error::SlabError;
use crate::logging::{log_debug, log_warn};

pub mod scanner;

pub use scanner::{scan_page, BlockField, ScanError, ScanMarkers};

const PRODUCT_DETAILS_URL: &str = "https://www.stonebasyx.com/live-inventory/product-details/";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoneBasyxPage {
    /// Label used in logs and parse errors
    pub name: String,
    pub url: String,
}

impl StoneBasyxPage {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

pub fn default_pages() -> Vec<StoneBasyxPage> {
    [("Classic", 536), ("Honed", 690), ("Leather", 712)]
        .into_iter()
        .map(|(name, id)| {
            StoneBasyxPage::new(name, format!("{}?selproductid={}", PRODUCT_DETAILS_URL, id))
        })
        .collect()
}

pub struct StoneBasyxAdapter {
    pages: Vec<StoneBasyxPage>,
    markers: ScanMarkers,
}

impl StoneBasyxAdapter {
    pub fn new(pages: Vec<StoneBasyxPage>, markers: ScanMarkers) -> Self {
        Self { pages, markers }
    }

    async fn fetch_pages(&self, client: &reqwest::Client) -> Result<Vec<Slab>, SlabError> {
        let log_id = Vendor::StoneBasyx.log_id();
        let mut slabs = Vec::new();

        for page in &self.pages {
            let body = match read_body(client.get(&page.url), &page.name).await {
                Ok(body) => body,
                Err(e) => {
                    log_warn(log_id, &format!("Skipping page: {}", e)).unwrap_or_default();
                    continue;
                }
            };

            let found = scan_page(&body, &page.url, &self.markers)
                .map_err(|e| SlabError::parse(&page.name, e))?;
            log_debug(log_id, &format!("{}: {} slabs", page.name, found.len())).unwrap_or_default();
            slabs.extend(found);
        }

        Ok(slabs)
    }
}

impl VendorAdapter for StoneBasyxAdapter {
    fn name(&self) -> &str {
        "StoneBasyx"
    }

    fn vendor(&self) -> Vendor {
        Vendor::StoneBasyx
    }

    fn fetch<'a>(&'a self, client: &'a reqwest::Client) -> FetchFuture<'a> {
        Box::pin(self.fetch_pages(client))
    }
}

#[cfg(test)]
mod tests;
