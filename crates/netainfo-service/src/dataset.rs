//! Loading of the candidate records table.
//!
//! The dataset is a CSV file with one row per candidate and election year, as produced by the
//! cleaning step over the myneta.info affidavits. Only the columns listed on [`CandidateRecord`]
//! are read, any other column is ignored.

use std::collections::BTreeSet;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

use serde::Deserialize;

/// Whether a candidate won their constituency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum Outcome {
    #[serde(rename = "Yes")]
    Won,
    #[serde(rename = "No")]
    Lost,
}

/// A single candidate in a single election.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CandidateRecord {
    #[serde(rename = "Year")]
    pub year: i32,
    #[serde(rename = "State")]
    pub state: String,
    #[serde(rename = "Party")]
    pub party: String,
    #[serde(rename = "Winner")]
    pub outcome: Outcome,
    /// Number of declared criminal cases.
    #[serde(rename = "Criminal_Case", deserialize_with = "csv::invalid_option")]
    pub criminal_cases: Option<f64>,
    /// Declared assets in rupees.
    #[serde(rename = "Assets_num", deserialize_with = "csv::invalid_option")]
    pub assets: Option<f64>,
    /// Age in years.
    #[serde(rename = "Age", deserialize_with = "csv::invalid_option")]
    pub age: Option<f64>,
}

/// An error loading the candidate dataset.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("failed to open dataset `{}`", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed candidate record")]
    Csv(#[from] csv::Error),
    #[error("dataset contains no candidate records")]
    Empty,
}

/// The immutable table of all candidate records.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<CandidateRecord>,
}

impl Dataset {
    /// Reads the dataset from the CSV file at `path`.
    pub fn open(path: &Path) -> Result<Self, DatasetError> {
        let start = Instant::now();
        let file = File::open(path).map_err(|source| DatasetError::Open {
            path: path.to_owned(),
            source,
        })?;
        let dataset = Self::from_reader(file)?;

        tracing::info!(
            path = %path.display(),
            records = dataset.len(),
            "Loaded candidate dataset in {:?}",
            start.elapsed()
        );
        metric!(gauge("dataset.records") = dataset.len() as u64);

        Ok(dataset)
    }

    /// Reads the dataset from CSV data with a header row.
    pub fn from_reader<R: io::Read>(reader: R) -> Result<Self, DatasetError> {
        let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let records = reader
            .deserialize()
            .collect::<Result<Vec<CandidateRecord>, _>>()?;

        if records.is_empty() {
            return Err(DatasetError::Empty);
        }

        Ok(Self { records })
    }

    pub fn records(&self) -> &[CandidateRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The distinct election years present in the dataset, in ascending order.
    pub fn years(&self) -> BTreeSet<i32> {
        self.records.iter().map(|record| record.year).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extra_columns_and_missing_values() {
        let csv = "\
Candidate,Year,State,Party,Winner,Criminal_Case,Assets_num,Age,Constituency
A. Kumar,2014,Bihar,RJD,Yes,2,15000000,54,Patna
B. Devi,2014,Bihar,JD(U),No,0,,47,Patna
";
        let dataset = Dataset::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(dataset.len(), 2);

        let first = &dataset.records()[0];
        assert_eq!(first.year, 2014);
        assert_eq!(first.state, "Bihar");
        assert_eq!(first.party, "RJD");
        assert_eq!(first.outcome, Outcome::Won);
        assert_eq!(first.criminal_cases, Some(2.0));
        assert_eq!(first.assets, Some(15_000_000.0));
        assert_eq!(first.age, Some(54.0));

        let second = &dataset.records()[1];
        assert_eq!(second.outcome, Outcome::Lost);
        assert_eq!(second.assets, None);
    }

    #[test]
    fn test_malformed_winner() {
        let csv = "\
Year,State,Party,Winner,Criminal_Case,Assets_num,Age
2014,Bihar,RJD,Maybe,2,15000000,54
";
        let err = Dataset::from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, DatasetError::Csv(_)));
    }

    #[test]
    fn test_empty() {
        let csv = "Year,State,Party,Winner,Criminal_Case,Assets_num,Age\n";
        let err = Dataset::from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, DatasetError::Empty));
    }

    #[test]
    fn test_missing_file() {
        let err = Dataset::open(Path::new("/does/not/exist.csv")).unwrap_err();
        assert!(matches!(err, DatasetError::Open { .. }));
    }

    #[test]
    fn test_years() {
        let dataset = Dataset::open(&netainfo_test::fixture("ls_sample.csv")).unwrap();
        let years: Vec<_> = dataset.years().into_iter().collect();
        assert_eq!(years, vec![2004, 2009, 2014]);
    }
}
