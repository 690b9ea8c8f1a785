use anyhow::{Context, Result};
use serde::{de, Deserialize, Deserializer};

use super::CosmosPage;
use crate::vendors::canonical::converter::ToSlab;
use crate::vendors::canonical::{Slab, Vendor};
use crate::vendors::common::join_path;

/// Body of a `getProductDetail` response
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CosmosBody {
    #[serde(deserialize_with = "null_as_empty")]
    pub username: String,
    pub status: i64,
    pub api_data: Option<Vec<CosmosRow>>,
}

/// One lot as listed by the product endpoint
///
/// Numeric fields arrive as JSON strings on some pages and as numbers on
/// others; both are accepted. A `null` string field reads as empty.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct CosmosRow {
    #[serde(deserialize_with = "flexible_f64")]
    pub avg_slab_length: f64,
    #[serde(deserialize_with = "flexible_f64")]
    pub avg_slab_width: f64,
    #[serde(rename = "ProductID", deserialize_with = "null_as_empty")]
    pub product_id: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub product_name: String,
    #[serde(deserialize_with = "flexible_u32")]
    pub available_slabs: u32,
    #[serde(deserialize_with = "flexible_f64")]
    pub available_quantity: f64,
    // Misspelled upstream
    #[serde(deserialize_with = "null_as_empty")]
    pub avaialble_location_name: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub product_status: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub lot_number: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub lot_bundle_picture: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub bundle_number: String,
    #[serde(rename = "PSD_Unique1", deserialize_with = "null_as_empty")]
    pub psd_unique1: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Numeric {
    Text(String),
    Number(serde_json::Number),
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn flexible_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    match Option::<Numeric>::deserialize(deserializer)? {
        None => Ok(0.0),
        Some(Numeric::Text(s)) => s
            .trim()
            .parse()
            .map_err(|_| de::Error::custom(format!("invalid number {:?}", s))),
        Some(Numeric::Number(n)) => n
            .as_f64()
            .ok_or_else(|| de::Error::custom(format!("invalid number {}", n))),
    }
}

fn flexible_u32<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    match Option::<Numeric>::deserialize(deserializer)? {
        None => Ok(0),
        Some(Numeric::Text(s)) => s
            .trim()
            .parse()
            .map_err(|_| de::Error::custom(format!("invalid slab count {:?}", s))),
        Some(Numeric::Number(n)) => n
            .as_u64()
            .and_then(|v| u32::try_from(v).ok())
            .ok_or_else(|| de::Error::custom(format!("invalid slab count {}", n))),
    }
}

impl ToSlab for CosmosRow {
    type Context = CosmosPage;

    fn to_slab(&self, page: &CosmosPage) -> Result<Option<Slab>> {
        // Listings without a photo are placeholders for incoming stock
        if self.lot_bundle_picture.is_empty() {
            return Ok(None);
        }

        let photo = join_path(&page.photo_base_url, &self.lot_bundle_picture).with_context(|| {
            format!(
                "building photo URL from {:?} and {:?}",
                page.photo_base_url, self.lot_bundle_picture
            )
        })?;

        Ok(Some(Slab {
            finish: page.finish,
            lot: self.lot_number.clone(),
            bundle: self.bundle_number.clone(),
            width: self.avg_slab_width,
            length: self.avg_slab_length,
            count: self.available_slabs,
            url: page.link_url.clone(),
            photo,
            ..Slab::new(self.vendor())
        }))
    }

    fn vendor(&self) -> Vendor {
        Vendor::Cosmos
    }
}
