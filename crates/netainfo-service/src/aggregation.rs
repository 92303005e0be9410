//! Filtered group-by aggregation over the candidate dataset.
//!
//! An [`AggregationKey`] selects the candidates of one election year, optionally restricted to
//! winners or losers, and partitions them by state or party. For each [`Metric`], the groups are
//! ranked by their mean value and the top [`TOP_N`] are kept.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::dataset::{CandidateRecord, Dataset, Outcome};

/// The number of groups kept per ranking.
pub const TOP_N: usize = 5;

/// A filter value that is not part of the dashboard vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidArgument {
    #[error("invalid election year `{0}`")]
    Year(String),
    #[error("unknown grouping dimension `{0}`, expected `State` or `Party`")]
    Dimension(String),
    #[error("unknown result filter `{0}`, expected `Winners`, `Losers` or `All`")]
    ResultFilter(String),
}

/// The categorical field candidates are grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Dimension {
    State,
    Party,
}

impl Dimension {
    pub const ALL: [Dimension; 2] = [Dimension::State, Dimension::Party];

    pub fn as_str(self) -> &'static str {
        match self {
            Dimension::State => "State",
            Dimension::Party => "Party",
        }
    }

    /// Returns the group label of `record` along this dimension.
    pub fn label_of(self, record: &CandidateRecord) -> &str {
        match self {
            Dimension::State => &record.state,
            Dimension::Party => &record.party,
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dimension {
    type Err = InvalidArgument;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "State" => Ok(Dimension::State),
            "Party" => Ok(Dimension::Party),
            _ => Err(InvalidArgument::Dimension(s.to_owned())),
        }
    }
}

/// Restricts the aggregation to winning or losing candidates.
///
/// On the wire, winners and losers are spelled like the `Winner` column (`Yes` / `No`), but the
/// dropdown labels are accepted as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ResultFilter {
    #[serde(rename = "Yes", alias = "Winners")]
    Winners,
    #[serde(rename = "No", alias = "Losers")]
    Losers,
    All,
}

impl ResultFilter {
    pub const ALL: [ResultFilter; 3] = [
        ResultFilter::Winners,
        ResultFilter::Losers,
        ResultFilter::All,
    ];

    /// The value of the filter as sent by the dropdown.
    pub fn as_str(self) -> &'static str {
        match self {
            ResultFilter::Winners => "Yes",
            ResultFilter::Losers => "No",
            ResultFilter::All => "All",
        }
    }

    /// The human readable dropdown label.
    pub fn label(self) -> &'static str {
        match self {
            ResultFilter::Winners => "Winners",
            ResultFilter::Losers => "Losers",
            ResultFilter::All => "All",
        }
    }

    pub fn matches(self, outcome: Outcome) -> bool {
        match self {
            ResultFilter::Winners => outcome == Outcome::Won,
            ResultFilter::Losers => outcome == Outcome::Lost,
            ResultFilter::All => true,
        }
    }
}

impl fmt::Display for ResultFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ResultFilter {
    type Err = InvalidArgument;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Yes" | "Winners" => Ok(ResultFilter::Winners),
            "No" | "Losers" => Ok(ResultFilter::Losers),
            "All" => Ok(ResultFilter::All),
            _ => Err(InvalidArgument::ResultFilter(s.to_owned())),
        }
    }
}

/// The full set of dashboard filters, used both as aggregation input and as cache key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AggregationKey {
    pub year: i32,
    pub dimension: Dimension,
    pub result: ResultFilter,
}

impl AggregationKey {
    pub fn new(year: i32, dimension: Dimension, result: ResultFilter) -> Self {
        Self {
            year,
            dimension,
            result,
        }
    }

    /// Builds a key from the raw dropdown values.
    pub fn parse(year: &str, dimension: &str, result: &str) -> Result<Self, InvalidArgument> {
        let year = year
            .trim()
            .parse()
            .map_err(|_| InvalidArgument::Year(year.to_owned()))?;
        Ok(Self {
            year,
            dimension: dimension.parse()?,
            result: result.parse()?,
        })
    }

    /// Whether `record` is part of the population selected by this key.
    pub fn matches(&self, record: &CandidateRecord) -> bool {
        record.year == self.year && self.result.matches(record.outcome)
    }
}

impl fmt::Display for AggregationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.year, self.dimension, self.result)
    }
}

/// A numeric candidate attribute that is averaged per group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    CriminalCases,
    Assets,
    Age,
}

impl Metric {
    /// All metrics, in the order the charts are displayed.
    pub const ALL: [Metric; 3] = [Metric::CriminalCases, Metric::Assets, Metric::Age];

    pub fn value_of(self, record: &CandidateRecord) -> Option<f64> {
        let value = match self {
            Metric::CriminalCases => record.criminal_cases,
            Metric::Assets => record.assets,
            Metric::Age => record.age,
        };
        value.filter(|v| !v.is_nan())
    }
}

/// The mean of one metric within one group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedGroup {
    pub label: String,
    pub mean: f64,
}

/// Groups ranked by the mean of one metric, highest first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ranking {
    pub metric: Metric,
    pub groups: Vec<RankedGroup>,
}

impl Ranking {
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|group| group.label.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// The three rankings computed for one [`AggregationKey`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Aggregation {
    pub key: AggregationKey,
    /// One ranking per metric, in the order of [`Metric::ALL`].
    pub rankings: [Ranking; 3],
}

impl Aggregation {
    pub fn ranking(&self, metric: Metric) -> &Ranking {
        match metric {
            Metric::CriminalCases => &self.rankings[0],
            Metric::Assets => &self.rankings[1],
            Metric::Age => &self.rankings[2],
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Mean {
    sum: f64,
    count: u32,
}

impl Mean {
    fn add(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    fn get(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

/// Computes the rankings for `key` over `dataset`.
///
/// Records missing a metric value are skipped for that metric only, records with an empty group
/// label are skipped entirely. Groups with equal means are ordered by ascending label. A key
/// without any matching records yields empty rankings.
pub fn aggregate(dataset: &Dataset, key: &AggregationKey) -> Aggregation {
    let start = Instant::now();

    // BTreeMap iteration gives the label order used to break ties
    let mut groups: BTreeMap<&str, [Mean; 3]> = BTreeMap::new();
    for record in dataset.records().iter().filter(|r| key.matches(r)) {
        // records without a state or party do not form a group of their own
        let label = key.dimension.label_of(record);
        if label.is_empty() {
            continue;
        }
        let means = groups.entry(label).or_default();
        for (mean, metric) in means.iter_mut().zip(Metric::ALL) {
            if let Some(value) = metric.value_of(record) {
                mean.add(value);
            }
        }
    }

    let rankings = [0, 1, 2].map(|index| rank(Metric::ALL[index], index, &groups));

    tracing::trace!(%key, groups = groups.len(), "computed aggregation");
    metric!(timer("aggregation.duration") = start.elapsed());

    Aggregation {
        key: *key,
        rankings,
    }
}

fn rank(metric: Metric, index: usize, groups: &BTreeMap<&str, [Mean; 3]>) -> Ranking {
    let mut ranked: Vec<_> = groups
        .iter()
        .filter_map(|(label, means)| {
            means[index].get().map(|mean| RankedGroup {
                label: (*label).to_owned(),
                mean,
            })
        })
        .collect();

    // stable, so equal means keep ascending label order
    ranked.sort_by(|a, b| b.mean.total_cmp(&a.mean));
    ranked.truncate(TOP_N);

    Ranking {
        metric,
        groups: ranked,
    }
}
