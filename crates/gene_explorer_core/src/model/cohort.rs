use serde::{Deserialize, Serialize};

/// A named group of study subjects with a gene-expression assay.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cohort {
    #[serde(rename = "cohort")]
    pub name: String,
    /// Feature annotation set describing which genes the cohort's assay measured
    #[serde(rename = "featureSetId")]
    pub feature_set_id: i64,
}

impl Cohort {
    pub fn new(name: impl Into<String>, feature_set_id: i64) -> Self {
        Self {
            name: name.into(),
            feature_set_id,
        }
    }
}
