use netainfo_service::aggregation::{AggregationKey, Dimension, ResultFilter};
use netainfo_service::config::Config;
use netainfo_service::dataset::Dataset;
use netainfo_service::service::DashboardService;
use netainfo_test as test;
use tempfile::NamedTempFile;

pub use test::fixture;

/// Loads the sample dataset of the three Lok Sabha elections.
pub fn sample_dataset() -> Dataset {
    test::setup();
    Dataset::open(&fixture("ls_sample.csv")).unwrap()
}

/// Setup tests and create a service over the sample dataset.
///
/// The `update_config` closure can modify any default configuration before the service is created.
pub fn setup_service(update_config: impl FnOnce(&mut Config)) -> DashboardService {
    test::setup();

    let mut config = Config {
        dataset: fixture("ls_sample.csv"),
        ..Default::default()
    };
    update_config(&mut config);

    DashboardService::create(&config).unwrap()
}

/// Creates a service over a dataset file holding only the given rows.
///
/// The returned file must be held for as long as the service is used.
pub fn setup_service_with_rows(rows: &str) -> (NamedTempFile, DashboardService) {
    test::setup();

    let file = test::dataset_file(rows);
    let config = Config {
        dataset: file.path().to_owned(),
        ..Default::default()
    };
    let service = DashboardService::create(&config).unwrap();

    (file, service)
}

/// Every combination of the dashboard dropdowns.
pub fn all_keys() -> Vec<AggregationKey> {
    let mut keys = Vec::new();
    for year in [2004, 2009, 2014] {
        for dimension in Dimension::ALL {
            for result in ResultFilter::ALL {
                keys.push(AggregationKey::new(year, dimension, result));
            }
        }
    }
    keys
}
