// src/split/plan.rs
//! Partition planner: regroup classified rows by the taxonomy's key order.

use crate::config::{PartitionSpec, Taxonomy};

use super::classify::Row;

/// Rows chosen for one partition, in the partition's key order.
#[derive(Debug)]
pub struct Planned<'r, 'a> {
    pub spec: &'r PartitionSpec,
    pub rows: Vec<&'r Row<'a>>,
}

impl Planned<'_, '_> {
    pub fn name(&self) -> &str {
        &self.spec.name
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug)]
pub struct Plan<'r, 'a> {
    /// One entry per partition, in taxonomy order.
    pub partitions: Vec<Planned<'r, 'a>>,
    /// Keys found in the document that no partition claims (first-seen order, no repeats).
    pub unclaimed: Vec<String>,
}

impl<'r, 'a> Plan<'r, 'a> {
    pub fn get(&self, name: &str) -> Option<&Planned<'r, 'a>> {
        self.partitions.iter().find(|p| p.name() == name)
    }
}

pub fn plan<'r, 'a>(rows: &'r [Row<'a>], taxonomy: &'r Taxonomy) -> Plan<'r, 'a> {
    let partitions = taxonomy
        .partitions()
        .iter()
        .map(|spec| {
            let picked = spec
                .keys
                .iter()
                .flat_map(|key| rows.iter().filter(move |r| &r.key == key))
                .collect();
            Planned { spec, rows: picked }
        })
        .collect();

    let mut unclaimed: Vec<String> = Vec::new();
    for row in rows {
        if !taxonomy.claims(&row.key) && !unclaimed.contains(&row.key) {
            unclaimed.push(row.key.clone());
        }
    }

    Plan { partitions, unclaimed }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(key: &str, line: usize) -> Row<'static> {
        Row { key: s!(key), lines: vec!["<tr>\n"], line }
    }

    #[test]
    fn keeps_multiplicity_and_source_order_per_key() {
        let rows = vec![row("a", 1), row("b", 2), row("a", 3)];
        let tax = Taxonomy::default().with(PartitionSpec::new("p", "P", &["b", "a"]));
        let plan = plan(&rows, &tax);
        let lines: Vec<usize> = plan.partitions[0].rows.iter().map(|r| r.line).collect();
        assert_eq!(lines, vec![2, 1, 3]);
        assert!(plan.unclaimed.is_empty());
    }

    #[test]
    fn unclaimed_keys_are_reported_once() {
        let rows = vec![row("x", 1), row("a", 2), row("x", 3), row("y", 4)];
        let tax = Taxonomy::default().with(PartitionSpec::new("p", "P", &["a"]));
        let plan = plan(&rows, &tax);
        assert_eq!(plan.unclaimed, vec![s!("x"), s!("y")]);
    }

    #[test]
    fn shared_key_lands_in_both() {
        let rows = vec![row("a", 1)];
        let tax = Taxonomy::default()
            .with(PartitionSpec::new("p", "P", &["a"]))
            .with(PartitionSpec::new("q", "Q", &["a", "z"]));
        let plan = plan(&rows, &tax);
        assert_eq!(plan.get("p").unwrap().rows.len(), 1);
        assert_eq!(plan.get("q").unwrap().rows.len(), 1);
        assert!(plan.get("r").is_none());
    }

    #[test]
    fn unmatched_partition_is_empty_not_missing() {
        let rows = vec![row("a", 1)];
        let tax = Taxonomy::default().with(PartitionSpec::new("p", "P", &["zz"]));
        let plan = plan(&rows, &tax);
        assert_eq!(plan.partitions.len(), 1);
        assert!(plan.partitions[0].is_empty());
    }
}
