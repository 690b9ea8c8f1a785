use super::{Slab, Vendor};
use anyhow::Result;

/// Trait for converting a vendor's decoded inventory row into a canonical `Slab`
///
/// Rows carry only what the vendor sent; page-level facts such as the finish
/// or the link to the product page come in through `Context`.
pub trait ToSlab {
    /// Page-level configuration the row is interpreted against
    type Context;

    /// Convert the row to a canonical slab
    ///
    /// Returns `Ok(None)` for rows that should be skipped, e.g. listings
    /// without a photo.
    fn to_slab(&self, ctx: &Self::Context) -> Result<Option<Slab>>;

    /// Vendor that produced this row
    fn vendor(&self) -> Vendor;
}

/// Convert every row, dropping skipped rows and failing on the first error
pub fn convert_batch<T: ToSlab>(rows: &[T], ctx: &T::Context) -> Result<Vec<Slab>> {
    rows.iter()
        .filter_map(|row| match row.to_slab(ctx) {
            Ok(Some(slab)) => Some(Ok(slab)),
            Ok(None) => None,
            Err(e) => Some(Err(e)),
        })
        .collect()
}
