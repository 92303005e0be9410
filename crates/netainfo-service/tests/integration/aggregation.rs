use std::collections::BTreeMap;

use netainfo_service::aggregation::{
    AggregationKey, Dimension, Metric, ResultFilter, TOP_N, aggregate,
};
use netainfo_service::dataset::{Dataset, Outcome};

use crate::{all_keys, sample_dataset};

#[test]
fn test_rankings_are_bounded_and_sorted() {
    let dataset = sample_dataset();

    for key in all_keys() {
        let aggregation = aggregate(&dataset, &key);
        assert_eq!(aggregation.key, key);

        for (ranking, metric) in aggregation.rankings.iter().zip(Metric::ALL) {
            assert_eq!(ranking.metric, metric);
            assert!(ranking.groups.len() <= TOP_N, "{key}: too many groups");
            assert!(!ranking.is_empty(), "{key}: sample data covers every key");
            assert!(
                ranking.groups.windows(2).all(|w| w[0].mean >= w[1].mean),
                "{key}: {metric:?} ranking is not sorted"
            );
        }
    }
}

#[test]
fn test_aggregation_is_idempotent() {
    let dataset = sample_dataset();

    for key in all_keys() {
        let first = aggregate(&dataset, &key);
        let second = aggregate(&dataset, &key);
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}

#[test]
fn test_winners_come_from_winning_records() {
    let dataset = sample_dataset();
    let key = AggregationKey::new(2009, Dimension::State, ResultFilter::Winners);
    let aggregation = aggregate(&dataset, &key);

    // criminal cases are present in every row of the sample
    let mut expected: BTreeMap<&str, (f64, u32)> = BTreeMap::new();
    for record in dataset.records() {
        if record.year == 2009 && record.outcome == Outcome::Won {
            let entry = expected.entry(record.state.as_str()).or_default();
            entry.0 += record.criminal_cases.unwrap();
            entry.1 += 1;
        }
    }

    let ranking = aggregation.ranking(Metric::CriminalCases);
    for group in &ranking.groups {
        let (sum, count) = expected[group.label.as_str()];
        assert_eq!(group.mean, sum / count as f64, "{}", group.label);
    }
}

#[test]
fn test_winners_is_subset_of_all() {
    let dataset = sample_dataset();

    for dimension in Dimension::ALL {
        let all_groups: Vec<_> = dataset
            .records()
            .iter()
            .filter(|r| r.year == 2014)
            .map(|r| dimension.label_of(r))
            .collect();

        for result in [ResultFilter::Winners, ResultFilter::Losers] {
            let key = AggregationKey::new(2014, dimension, result);
            let aggregation = aggregate(&dataset, &key);
            for ranking in &aggregation.rankings {
                for label in ranking.labels() {
                    assert!(all_groups.contains(&label), "{key}: unexpected {label}");
                    let has_match = dataset
                        .records()
                        .iter()
                        .any(|r| key.matches(r) && dimension.label_of(r) == label);
                    assert!(has_match, "{key}: {label} has no matching record");
                }
            }
        }
    }
}

/// Mean criminal cases of Kerala's 2014 candidates, optionally only those with `outcome`.
fn kerala_mean(dataset: &Dataset, outcome: Option<Outcome>) -> f64 {
    let values: Vec<f64> = dataset
        .records()
        .iter()
        .filter(|r| r.year == 2014 && r.state == "Kerala")
        .filter(|r| outcome.is_none_or(|outcome| r.outcome == outcome))
        .filter_map(|r| r.criminal_cases)
        .collect();
    values.iter().sum::<f64>() / values.len() as f64
}

#[test]
fn test_winners_mean_is_taken_from_all_population() {
    let dataset = sample_dataset();
    let kerala_in = |result: ResultFilter| {
        let key = AggregationKey::new(2014, Dimension::State, result);
        aggregate(&dataset, &key)
            .ranking(Metric::CriminalCases)
            .groups
            .iter()
            .find(|group| group.label == "Kerala")
            .map(|group| group.mean)
            .unwrap()
    };

    // Kerala's winners are a strict subset of its candidates with a different mean
    let winners = kerala_in(ResultFilter::Winners);
    let all = kerala_in(ResultFilter::All);
    assert_eq!(winners, kerala_mean(&dataset, Some(Outcome::Won)));
    assert_eq!(all, kerala_mean(&dataset, None));
    assert_ne!(winners, all);
    assert_eq!(
        kerala_in(ResultFilter::Losers),
        kerala_mean(&dataset, Some(Outcome::Lost))
    );
}

#[test]
fn test_dataset_years_outside_dropdown() {
    let dataset = sample_dataset();
    let key = AggregationKey::new(2019, Dimension::State, ResultFilter::All);

    let aggregation = aggregate(&dataset, &key);
    assert!(aggregation.rankings.iter().all(|r| r.is_empty()));
}
