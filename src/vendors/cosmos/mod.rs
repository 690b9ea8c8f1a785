// Cosmos serves its live inventory to the product pages from an XHR
// endpoint. Each page is a form POST; the answer is a JSON document with
// one row per lot.

use serde::{Deserialize, Serialize};

use super::canonical::converter::convert_batch;
use super::canonical::{Finish, Slab, Vendor};
use super::common::{read_body, XHR_HEADER, XHR_HEADER_VALUE};
use super::{FetchFuture, VendorAdapter};
use crate::error::SlabError;
use crate::logging::{log_debug, log_warn};

pub mod converter;

pub use converter::{CosmosBody, CosmosRow};

const PRODUCT_DETAIL_URL: &str = "https://www.cosmosgranite.com/getProductDetail";
const PHOTO_BASE_URL: &str =
    "https://cosmosgranite.nyc3.digitaloceanspaces.com/img/live_inventory/charlotte_charleston/";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CosmosPage {
    pub name: String,
    pub fetch_url: String,
    /// Form fields POSTed to `fetch_url`, in order
    pub form: Vec<(String, String)>,
    /// Product page a person would open; becomes each slab's URL
    pub link_url: String,
    pub photo_base_url: String,
    /// The endpoint does not report a finish, so the page carries it
    pub finish: Finish,
}

fn form(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

pub fn default_pages() -> Vec<CosmosPage> {
    vec![
        CosmosPage {
            name: "Titanium".to_string(),
            fetch_url: PRODUCT_DETAIL_URL.to_string(),
            form: form(&[
                ("name", "Titanium"),
                ("location", "charlotte"),
                ("id", "20488"),
                (
                    "pro_link",
                    "https://www.cosmosgranite.com/charlotte/granite/charlotte-293-titanium",
                ),
            ]),
            link_url: "https://www.cosmosgranite.com/charlotte/granite/charlotte-293-titanium"
                .to_string(),
            photo_base_url: PHOTO_BASE_URL.to_string(),
            finish: Finish::Polished,
        },
        CosmosPage {
            name: "Titanium Leathered".to_string(),
            fetch_url: PRODUCT_DETAIL_URL.to_string(),
            form: form(&[
                ("urls", "http://api.vividgranite.com/services.asmx"),
                ("name", "TITANIUM LEATHER"),
                ("lot", ""),
                ("bundle", ""),
                ("location", "charlotte"),
                ("id", "30427"),
                (
                    "pro_link",
                    "https://www.cosmosgranite.com/charlotte/granite/charlotte-1311-titanium-leather",
                ),
            ]),
            link_url: "https://www.cosmosgranite.com/charlotte/granite/charlotte-1311-titanium-leather"
                .to_string(),
            photo_base_url: PHOTO_BASE_URL.to_string(),
            finish: Finish::Leather,
        },
    ]
}

/// Decode one response body into slabs for `page`.
///
/// The whole document must decode; a malformed number in any row fails the
/// page. A missing or null `api_data` is an empty listing.
pub fn parse_body(body: &str, page: &CosmosPage) -> Result<Vec<Slab>, SlabError> {
    let decoded: CosmosBody =
        serde_json::from_str(body).map_err(|e| SlabError::parse(&page.name, e))?;
    let rows = decoded.api_data.unwrap_or_default();
    convert_batch(&rows, page).map_err(|e| SlabError::parse(&page.name, format!("{:#}", e)))
}

pub struct CosmosAdapter {
    pages: Vec<CosmosPage>,
}

impl CosmosAdapter {
    pub fn new(pages: Vec<CosmosPage>) -> Self {
        Self { pages }
    }

    async fn fetch_pages(&self, client: &reqwest::Client) -> Result<Vec<Slab>, SlabError> {
        let log_id = Vendor::Cosmos.log_id();
        let mut slabs = Vec::new();

        for page in &self.pages {
            let request = client
                .post(&page.fetch_url)
                .header(XHR_HEADER, XHR_HEADER_VALUE)
                .form(&page.form);

            let body = match read_body(request, &page.name).await {
                Ok(body) => body,
                Err(e) => {
                    log_warn(log_id, &format!("Skipping page: {}", e)).unwrap_or_default();
                    continue;
                }
            };

            let found = parse_body(&body, page)?;
            log_debug(log_id, &format!("{}: {} slabs", page.name, found.len())).unwrap_or_default();
            slabs.extend(found);
        }

        Ok(slabs)
    }
}

impl VendorAdapter for CosmosAdapter {
    fn name(&self) -> &str {
        "Cosmos"
    }

    fn vendor(&self) -> Vendor {
        Vendor::Cosmos
    }

    fn fetch<'a>(&'a self, client: &'a reqwest::Client) -> FetchFuture<'a> {
        Box::pin(self.fetch_pages(client))
    }
}
