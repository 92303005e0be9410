use std::sync::Arc;

use serde::Serialize;

use crate::aggregation::{Aggregation, AggregationKey, Dimension, ResultFilter, aggregate};
use crate::cache::{AggregationCache, CacheStats};
use crate::charts::{self, Figure};
use crate::config::Config;
use crate::dataset::{Dataset, DatasetError};

/// One entry of a dropdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterOption<T> {
    pub label: String,
    pub value: T,
}

/// The values offered by the three dashboard dropdowns, and their initial selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    pub years: Vec<FilterOption<i32>>,
    pub dimensions: Vec<FilterOption<Dimension>>,
    pub results: Vec<FilterOption<ResultFilter>>,
    pub default: AggregationKey,
}

impl FilterOptions {
    pub fn new(years: &[i32]) -> Self {
        let default_year = years.first().copied().unwrap_or_default();
        Self {
            years: years
                .iter()
                .map(|year| FilterOption {
                    label: year.to_string(),
                    value: *year,
                })
                .collect(),
            dimensions: Dimension::ALL
                .iter()
                .map(|dimension| FilterOption {
                    label: dimension.to_string(),
                    value: *dimension,
                })
                .collect(),
            results: ResultFilter::ALL
                .iter()
                .map(|result| FilterOption {
                    label: result.label().to_owned(),
                    value: *result,
                })
                .collect(),
            default: AggregationKey::new(default_year, Dimension::State, ResultFilter::Winners),
        }
    }
}

/// Serves the dashboard charts from the candidate dataset.
///
/// The dataset is shared read-only, the cache is the only mutable state and is internally
/// synchronized. Cloning yields a handle to the same dataset and cache.
#[derive(Debug, Clone)]
pub struct DashboardService {
    dataset: Arc<Dataset>,
    cache: AggregationCache,
    options: Arc<FilterOptions>,
}

impl DashboardService {
    /// Loads the configured dataset and creates the service around it.
    pub fn create(config: &Config) -> Result<Self, DatasetError> {
        let dataset = Dataset::open(&config.dataset)?;
        Ok(Self::new(Arc::new(dataset), config))
    }

    pub fn new(dataset: Arc<Dataset>, config: &Config) -> Self {
        Self {
            dataset,
            cache: AggregationCache::new(config.caches.aggregation),
            options: Arc::new(FilterOptions::new(&config.years)),
        }
    }

    /// Returns the rankings for `key`, computing them only if they are not cached.
    pub async fn aggregate(&self, key: AggregationKey) -> Arc<Aggregation> {
        let dataset = &self.dataset;
        self.cache
            .get_or_compute(key, |key| aggregate(dataset, key))
            .await
    }

    /// Produces the criminal cases, assets and age figures for a new dropdown selection.
    pub async fn on_filters_changed(&self, key: AggregationKey) -> [Figure; 3] {
        let aggregation = self.aggregate(key).await;
        charts::figures(&aggregation)
    }

    pub fn filter_options(&self) -> &FilterOptions {
        &self.options
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}
