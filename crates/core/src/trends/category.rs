//! Category-level YTD rollup.

use std::collections::HashMap;

use tracing::{debug, warn};
use ytd_shared::types::{UNCATEGORIZED_LABEL, UnmappedCategoryPolicy};

use crate::metrics::{GroupBy, MetricsError, MetricsOptions, MetricsReport, MetricsService};
use crate::sales::SalesRecord;

/// Product name → category lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryMap(HashMap<String, String>);

impl CategoryMap {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Maps `product` to `category`, replacing any earlier entry.
    pub fn insert(&mut self, product: impl Into<String>, category: impl Into<String>) {
        self.0.insert(product.into(), category.into());
    }

    /// Category of a product, if mapped.
    #[must_use]
    pub fn get(&self, product: &str) -> Option<&str> {
        self.0.get(product).map(String::as_str)
    }

    /// Number of mapped products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if no product is mapped.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<P, C> FromIterator<(P, C)> for CategoryMap
where
    P: Into<String>,
    C: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (P, C)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(p, c)| (p.into(), c.into()))
                .collect(),
        )
    }
}

/// Records relabeled with their category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemappedRecords {
    /// Records whose `product_name` now holds the category.
    pub records: Vec<SalesRecord>,
    /// Records dropped because their product had no category.
    pub dropped: usize,
}

/// Rolls product sales up to categories.
pub struct CategoryRollup;

impl CategoryRollup {
    /// Replaces each record's product name with its category.
    ///
    /// Unmapped products are dropped or bucketed under
    /// [`UNCATEGORIZED_LABEL`] depending on `policy`.
    #[must_use]
    pub fn remap(
        records: &[SalesRecord],
        categories: &CategoryMap,
        policy: UnmappedCategoryPolicy,
    ) -> RemappedRecords {
        let mut remapped = Vec::with_capacity(records.len());
        let mut dropped = 0;

        for record in records {
            let category = match (categories.get(&record.product_name), policy) {
                (Some(category), _) => category,
                (None, UnmappedCategoryPolicy::Bucket) => UNCATEGORIZED_LABEL,
                (None, UnmappedCategoryPolicy::Drop) => {
                    dropped += 1;
                    continue;
                }
            };
            remapped.push(SalesRecord {
                product_name: category.to_string(),
                ..record.clone()
            });
        }

        RemappedRecords {
            records: remapped,
            dropped,
        }
    }

    /// Calculates YTD, PYTD and P1YTD metrics per category.
    ///
    /// The default as-of date is taken from all records, before unmapped
    /// products are dropped.
    ///
    /// # Errors
    ///
    /// Returns `MetricsError::NoRecords` when no as-of date is given and
    /// `records` is empty, and `MetricsError::Overflow` when a category total
    /// does not fit.
    pub fn category_metrics(
        records: &[SalesRecord],
        categories: &CategoryMap,
        options: &MetricsOptions,
        policy: UnmappedCategoryPolicy,
    ) -> Result<MetricsReport, MetricsError> {
        let as_of = options.resolve_as_of(records)?;
        let remapped = Self::remap(records, categories, policy);

        if remapped.dropped > 0 {
            warn!(
                dropped = remapped.dropped,
                "Dropped sales records with no category mapping"
            );
        }
        debug!(
            mapped_products = categories.len(),
            records = remapped.records.len(),
            policy = %policy,
            "Remapped records to categories"
        );

        MetricsService::calculate_as_of(
            &remapped.records,
            as_of,
            options.shift_policy,
            GroupBy::Category,
        )
    }
}
