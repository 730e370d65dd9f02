use crate::dto::ScoredRecord;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::hash::Hash;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reduction {
    Count,
    MeanScore,
}

impl Reduction {
    pub fn apply(&self, members: &[&ScoredRecord]) -> f64 {
        match self {
            Reduction::Count => members.len() as f64,
            Reduction::MeanScore if members.is_empty() => 0.0,
            Reduction::MeanScore => {
                members.iter().map(|record| record.score()).sum::<f64>() / members.len() as f64
            }
        }
    }
}

///
/// Groups the records passing `filter` by `key`. Groups are returned in the
/// order their key is first encountered, and members keep input order.
///
pub fn group_by<'a, K, F, G>(
    records: &'a [ScoredRecord],
    filter: F,
    key: G,
) -> Vec<(K, Vec<&'a ScoredRecord>)>
where
    K: Eq + Hash + Clone,
    F: Fn(&ScoredRecord) -> bool,
    G: Fn(&'a ScoredRecord) -> K,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(K, Vec<&'a ScoredRecord>)> = Vec::new();
    for record in records.iter().filter(|record| filter(*record)) {
        let group_key = key(record);
        match index.get(&group_key) {
            Some(&slot) => groups[slot].1.push(record),
            None => {
                index.insert(group_key.clone(), groups.len());
                groups.push((group_key, vec![record]));
            }
        }
    }
    groups
}

pub fn reduce<K: Clone>(groups: &[(K, Vec<&ScoredRecord>)], reduction: Reduction) -> Vec<(K, f64)> {
    groups
        .iter()
        .map(|(key, members)| (key.clone(), reduction.apply(members)))
        .collect()
}

/// Largest value; ties go to the earliest entry.
pub fn arg_max<K>(values: &[(K, f64)]) -> Option<&(K, f64)> {
    pick(values, Ordering::Greater)
}

/// Smallest value; ties go to the earliest entry.
pub fn arg_min<K>(values: &[(K, f64)]) -> Option<&(K, f64)> {
    pick(values, Ordering::Less)
}

fn pick<K>(values: &[(K, f64)], wanted: Ordering) -> Option<&(K, f64)> {
    values.iter().fold(None, |best, entry| match best {
        Some(current) if entry.1.total_cmp(&current.1) != wanted => Some(current),
        _ => Some(entry),
    })
}

/// Stable descending sort, so equal values keep first-encounter order.
pub fn sort_descending<K>(values: &mut [(K, f64)]) {
    values.sort_by(|a, b| b.1.total_cmp(&a.1));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::ReviewRecord;

    fn record(product: &str, score: f64) -> ScoredRecord {
        ScoredRecord::new(
            ReviewRecord {
                product: Some(product.to_string()),
                text: String::new(),
                rating: 3,
                timestamp: None,
            },
            score,
        )
    }

    #[test]
    fn groups_follow_first_encounter() {
        let records = vec![record("b", 0.1), record("a", 0.2), record("b", 0.3)];
        let groups = group_by(&records, |_| true, |r| r.product().unwrap_or_default());
        let keys: Vec<&str> = groups.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec!["b", "a"]);
        assert_eq!(groups[0].1.len(), 2);
    }

    #[test]
    fn filter_excludes_records() {
        let records = vec![record("a", -0.5), record("b", 0.5)];
        let groups = group_by(&records, |r| r.score() > 0.0, |r| r.product().unwrap_or_default());
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].0, "b");
    }

    #[test]
    fn reductions() {
        let records = vec![record("a", 0.2), record("a", 0.4), record("b", -0.1)];
        let groups = group_by(&records, |_| true, |r| r.product().unwrap_or_default());
        let means = reduce(&groups, Reduction::MeanScore);
        assert!((means[0].1 - 0.3).abs() < 1e-12);
        let counts = reduce(&groups, Reduction::Count);
        assert_eq!(counts, vec![("a", 2.0), ("b", 1.0)]);
    }

    #[test]
    fn ties_resolve_to_first_entry() {
        let values = vec![("x", 1.0), ("y", 3.0), ("z", 3.0), ("w", 1.0)];
        assert_eq!(arg_max(&values), Some(&("y", 3.0)));
        assert_eq!(arg_min(&values), Some(&("x", 1.0)));
        assert_eq!(arg_max::<&str>(&[]), None);

        let mut sorted = values.clone();
        sort_descending(&mut sorted);
        assert_eq!(sorted, vec![("y", 3.0), ("z", 3.0), ("x", 1.0), ("w", 1.0)]);
    }
}
