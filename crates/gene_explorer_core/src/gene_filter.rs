//! Gene filter derived from the selected cohorts.
//!
//! Only genes measured in every selected cohort can be plotted, so the filter
//! is the intersection of the gene symbols annotated under each cohort's
//! feature annotation set. Hosts with a SQL query endpoint evaluate it with
//! [`GeneFilter::to_sql`]; in-memory hosts use [`GeneFilter::evaluate`].

use rustc_hash::{FxHashMap, FxHashSet};

use crate::model::Cohort;

const SQL_SELECT: &str = "SELECT DISTINCT GeneSymbol as gene_symbol FROM featureannotation";
const SQL_WHERE: &str = " WHERE featureannotationsetid = ";
const SQL_INTERSECT: &str = " INTERSECT ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneFilter {
    feature_set_ids: Vec<i64>,
}

impl GeneFilter {
    /// Filter for the given cohorts, or `None` when no cohort is selected.
    pub fn for_cohorts(cohorts: &[Cohort]) -> Option<Self> {
        let mut feature_set_ids: Vec<i64> = Vec::with_capacity(cohorts.len());
        for cohort in cohorts {
            if !feature_set_ids.contains(&cohort.feature_set_id) {
                feature_set_ids.push(cohort.feature_set_id);
            }
        }
        if feature_set_ids.is_empty() {
            None
        } else {
            Some(Self { feature_set_ids })
        }
    }

    pub fn feature_set_ids(&self) -> &[i64] {
        &self.feature_set_ids
    }

    /// One `SELECT` per annotation set, joined with `INTERSECT`.
    pub fn to_sql(&self) -> String {
        self.feature_set_ids
            .iter()
            .map(|id| format!("{SQL_SELECT}{SQL_WHERE}{id}"))
            .collect::<Vec<_>>()
            .join(SQL_INTERSECT)
    }

    /// Evaluate against in-memory annotations (`set id → gene symbols`).
    ///
    /// Unknown set ids contribute an empty set. Result is sorted.
    pub fn evaluate(&self, annotations: &FxHashMap<i64, FxHashSet<String>>) -> Vec<String> {
        let empty = FxHashSet::default();
        let sets = self
            .feature_set_ids
            .iter()
            .map(|id| annotations.get(id).unwrap_or(&empty));
        let mut genes: Vec<String> = intersect_all(sets).into_iter().collect();
        genes.sort();
        genes
    }
}

/// Intersection of all sets; empty when there are none.
pub fn intersect_all<'a, I>(sets: I) -> FxHashSet<String>
where
    I: IntoIterator<Item = &'a FxHashSet<String>>,
{
    let mut iter = sets.into_iter();
    let Some(first) = iter.next() else {
        return FxHashSet::default();
    };
    let mut acc = first.clone();
    for set in iter {
        acc.retain(|gene| set.contains(gene));
        if acc.is_empty() {
            break;
        }
    }
    acc
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(genes: &[&str]) -> FxHashSet<String> {
        genes.iter().map(|g| g.to_string()).collect()
    }

    #[test]
    fn test_no_cohorts_no_filter() {
        assert_eq!(GeneFilter::for_cohorts(&[]), None);
    }

    #[test]
    fn test_single_cohort_sql() {
        let filter = GeneFilter::for_cohorts(&[Cohort::new("A", 12)]).unwrap();
        assert_eq!(
            filter.to_sql(),
            "SELECT DISTINCT GeneSymbol as gene_symbol FROM featureannotation WHERE featureannotationsetid = 12"
        );
    }

    #[test]
    fn test_multiple_cohorts_sql_intersects() {
        let filter =
            GeneFilter::for_cohorts(&[Cohort::new("A", 1), Cohort::new("B", 2)]).unwrap();
        let sql = filter.to_sql();
        assert_eq!(sql.matches(" INTERSECT ").count(), 1);
        assert!(sql.ends_with("featureannotationsetid = 2"));
    }

    #[test]
    fn test_shared_annotation_set_deduplicated() {
        let filter =
            GeneFilter::for_cohorts(&[Cohort::new("A", 5), Cohort::new("B", 5)]).unwrap();
        assert_eq!(filter.feature_set_ids(), &[5]);
        assert!(!filter.to_sql().contains("INTERSECT"));
    }

    #[test]
    fn test_intersect_all() {
        let a = set(&["IFI27", "STAT1", "MX1"]);
        let b = set(&["STAT1", "MX1", "CD19"]);
        let c = set(&["MX1"]);
        assert_eq!(intersect_all([&a, &b]), set(&["STAT1", "MX1"]));
        assert_eq!(intersect_all([&a, &b, &c]), set(&["MX1"]));
        assert!(intersect_all(std::iter::empty()).is_empty());
    }

    #[test]
    fn test_evaluate_unknown_set_is_empty() {
        let mut annotations = FxHashMap::default();
        annotations.insert(1, set(&["IFI27"]));
        let filter =
            GeneFilter::for_cohorts(&[Cohort::new("A", 1), Cohort::new("B", 99)]).unwrap();
        assert!(filter.evaluate(&annotations).is_empty());
    }
}
