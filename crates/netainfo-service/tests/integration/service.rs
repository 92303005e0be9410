use std::time::Duration;

use netainfo_service::aggregation::{AggregationKey, Dimension, Metric, ResultFilter};

use crate::{all_keys, setup_service, setup_service_with_rows};

#[tokio::test]
async fn test_figures_present_the_rankings() {
    let service = setup_service(|_| {});
    let key = AggregationKey::new(2014, Dimension::Party, ResultFilter::All);

    let aggregation = service.aggregate(key).await;
    let figures = service.on_filters_changed(key).await;

    for (figure, metric) in figures.iter().zip(Metric::ALL) {
        let ranking = aggregation.ranking(metric);
        let trace = &figure.data[0];

        let labels: Vec<_> = ranking.labels().collect();
        assert_eq!(trace.x, labels);
        let values: Vec<_> = ranking.groups.iter().map(|g| metric.present(g.mean)).collect();
        assert_eq!(trace.y, values);
        assert!(figure.layout.title.starts_with("<b>Party wise top 5"));
    }

    let stats = service.cache_stats();
    assert_eq!((stats.hits, stats.misses), (1, 1));
}

#[tokio::test]
async fn test_figures_from_dataset_file() {
    let (_file, service) = setup_service_with_rows(
        "\
2014,Kerala,INC,Yes,2,25000000,50
2014,Kerala,CPI(M),No,4,5000000,60
2014,,IND,No,12,900000000,70
2014,Goa,BJP,Yes,1,,45
",
    );
    let key = AggregationKey::new(2014, Dimension::State, ResultFilter::All);

    let [criminal_cases, assets, age] = service.on_filters_changed(key).await;

    // the candidate without a state is not charted
    assert_eq!(criminal_cases.data[0].x, ["Kerala", "Goa"]);
    assert_eq!(criminal_cases.data[0].y, [3.0, 1.0]);
    // in crores, Goa has no declared assets
    assert_eq!(assets.data[0].x, ["Kerala"]);
    assert_eq!(assets.data[0].y, [1.5]);
    assert_eq!(age.data[0].y, [55.0, 45.0]);
}

#[tokio::test]
async fn test_cache_expires() {
    let service = setup_service(|config| {
        config.caches.aggregation.ttl = Duration::from_millis(100);
    });
    let key = AggregationKey::new(2004, Dimension::State, ResultFilter::Winners);

    let first = service.on_filters_changed(key).await;
    service.on_filters_changed(key).await;
    assert_eq!(service.cache_stats().misses, 1);

    tokio::time::sleep(Duration::from_millis(250)).await;

    let second = service.on_filters_changed(key).await;
    assert_eq!(service.cache_stats().misses, 2);
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_cache_capacity() {
    let service = setup_service(|config| {
        config.caches.aggregation.capacity = 4;
    });

    for key in all_keys() {
        service.on_filters_changed(key).await;
        assert!(service.cache_stats().entries <= 4);
    }
    assert_eq!(service.cache_stats().misses, all_keys().len() as u64);
}

#[test]
fn test_missing_dataset() {
    netainfo_test::setup();
    let config = netainfo_service::config::Config {
        dataset: "/does/not/exist.csv".into(),
        ..Default::default()
    };
    assert!(netainfo_service::service::DashboardService::create(&config).is_err());
}
