use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tracing::error;

use crate::config::SlabFinderConfig;
use crate::error::SlabError;
use crate::logging::{log_error, log_info};

pub mod canonical; // Canonical slab record and row converter trait
pub mod common;
pub mod cosmos; // JSON product endpoint
pub mod stonebasyx; // Line-scanned HTML product pages

pub use canonical::{Finish, Slab, Vendor};

/// Future returned by [`VendorAdapter::fetch`]
pub type FetchFuture<'a> = Pin<Box<dyn Future<Output = Result<Vec<Slab>, SlabError>> + Send + 'a>>;

/// One vendor's inventory source
///
/// `fetch` returns every slab currently listed across the adapter's pages.
/// Pages that cannot be fetched are skipped; a page whose payload does not
/// parse fails the whole adapter with `SlabError::Parse`.
pub trait VendorAdapter: Send + Sync {
    /// Short label used in logs
    fn name(&self) -> &str;

    fn vendor(&self) -> Vendor;

    fn fetch<'a>(&'a self, client: &'a reqwest::Client) -> FetchFuture<'a>;
}

/// Build the adapters for every supported vendor, honoring page overrides
pub fn default_adapters(config: &SlabFinderConfig) -> Vec<Arc<dyn VendorAdapter>> {
    let stonebasyx_pages = config
        .stonebasyx_pages
        .clone()
        .unwrap_or_else(stonebasyx::default_pages);
    let cosmos_pages = config
        .cosmos_pages
        .clone()
        .unwrap_or_else(cosmos::default_pages);

    vec![
        Arc::new(stonebasyx::StoneBasyxAdapter::new(
            stonebasyx_pages,
            stonebasyx::ScanMarkers::default(),
        )),
        Arc::new(cosmos::CosmosAdapter::new(cosmos_pages)),
    ]
}

/// Run every adapter concurrently and concatenate their slabs.
///
/// Results are collected in adapter order, so for the same responses the
/// batch order is always the same. An adapter that errors or panics is
/// logged and contributes nothing.
pub async fn fetch_all(adapters: &[Arc<dyn VendorAdapter>], client: &reqwest::Client) -> Vec<Slab> {
    let handles: Vec<_> = adapters
        .iter()
        .map(|adapter| {
            let adapter = Arc::clone(adapter);
            let client = client.clone();
            tokio::spawn(async move { adapter.fetch(&client).await })
        })
        .collect();

    let mut batch = Vec::new();
    for (adapter, handle) in adapters.iter().zip(handles) {
        let log_id = adapter.vendor().log_id();
        match handle.await {
            Ok(Ok(slabs)) => {
                log_info(log_id, &format!("{}: {} slabs", adapter.name(), slabs.len()))
                    .unwrap_or_default();
                batch.extend(slabs);
            }
            Ok(Err(e)) => {
                log_error(log_id, &format!("{} failed: {}", adapter.name(), e)).unwrap_or_default();
            }
            Err(e) => {
                error!(adapter = adapter.name(), "Adapter task aborted: {}", e);
            }
        }
    }
    batch
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StaticAdapter {
        name: &'static str,
        lots: Vec<&'static str>,
        fail: bool,
        delay_ms: u64,
    }

    impl VendorAdapter for StaticAdapter {
        fn name(&self) -> &str {
            self.name
        }

        fn vendor(&self) -> Vendor {
            Vendor::Cosmos
        }

        fn fetch<'a>(&'a self, _client: &'a reqwest::Client) -> FetchFuture<'a> {
            Box::pin(async move {
                tokio::time::sleep(std::time::Duration::from_millis(self.delay_ms)).await;
                if self.fail {
                    return Err(SlabError::parse(self.name, "Lot line invalid"));
                }
                Ok(self
                    .lots
                    .iter()
                    .map(|lot| Slab {
                        lot: lot.to_string(),
                        ..Slab::new(Vendor::Cosmos)
                    })
                    .collect())
            })
        }
    }

    struct PanickingAdapter;

    impl VendorAdapter for PanickingAdapter {
        fn name(&self) -> &str {
            "panics"
        }

        fn vendor(&self) -> Vendor {
            Vendor::StoneBasyx
        }

        fn fetch<'a>(&'a self, _client: &'a reqwest::Client) -> FetchFuture<'a> {
            Box::pin(async move {
                let slabs: Vec<Slab> = panic!("adapter bug");
                #[allow(unreachable_code)]
                Ok(slabs)
            })
        }
    }

    #[tokio::test]
    async fn test_fetch_all_keeps_adapter_order() {
        // The first adapter finishes last; order must not depend on timing
        let adapters: Vec<Arc<dyn VendorAdapter>> = vec![
            Arc::new(StaticAdapter {
                name: "slow",
                lots: vec!["a1", "a2"],
                fail: false,
                delay_ms: 50,
            }),
            Arc::new(StaticAdapter {
                name: "fast",
                lots: vec!["b1"],
                fail: false,
                delay_ms: 0,
            }),
        ];

        let batch = fetch_all(&adapters, &reqwest::Client::new()).await;
        let lots: Vec<_> = batch.iter().map(|s| s.lot.as_str()).collect();
        assert_eq!(lots, vec!["a1", "a2", "b1"]);
    }

    #[tokio::test]
    async fn test_fetch_all_skips_failed_adapters() {
        let adapters: Vec<Arc<dyn VendorAdapter>> = vec![
            Arc::new(StaticAdapter {
                name: "broken",
                lots: vec!["x"],
                fail: true,
                delay_ms: 0,
            }),
            Arc::new(PanickingAdapter),
            Arc::new(StaticAdapter {
                name: "healthy",
                lots: vec!["ok"],
                fail: false,
                delay_ms: 0,
            }),
        ];

        let batch = fetch_all(&adapters, &reqwest::Client::new()).await;
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].lot, "ok");
    }

    #[test]
    fn test_default_adapters_cover_both_vendors() {
        let adapters = default_adapters(&SlabFinderConfig::default());
        let vendors: Vec<_> = adapters.iter().map(|a| a.vendor()).collect();
        assert_eq!(vendors, vec![Vendor::StoneBasyx, Vendor::Cosmos]);
    }
}
