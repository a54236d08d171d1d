// src/config/taxonomy.rs
//! Partition taxonomies: which category keys go into which output document, and in what order.

/// One output partition: a file-name token, the label written into the title,
/// and the ordered category keys it claims.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PartitionSpec {
    pub name: String,
    pub label: String,
    pub keys: Vec<String>,
}

impl PartitionSpec {
    pub fn new(name: &str, label: &str, keys: &[&str]) -> Self {
        Self {
            name: s!(name),
            label: s!(label),
            keys: keys.iter().map(|k| s!(*k)).collect(),
        }
    }

    pub fn claims(&self, key: &str) -> bool {
        self.keys.iter().any(|k| k == key)
    }
}

/// Ordered list of partitions. Disjointness is not checked:
/// a key listed by two partitions lands in both outputs.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Taxonomy {
    partitions: Vec<PartitionSpec>,
}

impl Taxonomy {
    pub fn new(partitions: Vec<PartitionSpec>) -> Self {
        Self { partitions }
    }

    pub fn with(mut self, spec: PartitionSpec) -> Self {
        self.partitions.push(spec);
        self
    }

    pub fn partitions(&self) -> &[PartitionSpec] {
        &self.partitions
    }

    pub fn len(&self) -> usize {
        self.partitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.partitions.is_empty()
    }

    pub fn claims(&self, key: &str) -> bool {
        self.partitions.iter().any(|p| p.claims(key))
    }

    /// Responsibility actors: 4 required, 3 optional.
    pub fn resp_actors() -> Self {
        Self::new(vec![
            PartitionSpec::new(
                "required",
                "Required Actors",
                &["ai_dev_gen", "ai_deployer", "ai_gov_actor", "ai_user"],
            ),
            PartitionSpec::new(
                "optional",
                "Optional Actors",
                &["ai_dev_spec", "ai_infra", "ai_stake"],
            ),
        ])
    }

    /// 14 sectors in groups of 4, 4, 4 and 2.
    pub fn sector_groups() -> Self {
        let groups: [&[&str]; 4] = [
            &["Agriculture", "Trade", "Information", "Finance"],
            &["Real_Estate", "Professional", "Scientific", "Management"],
            &["Education", "Health_Care", "Arts", "Accommodation"],
            &["Public_Admin", "National_Security"],
        ];
        let partitions = groups
            .iter()
            .enumerate()
            .map(|(i, keys)| {
                let n = i + 1;
                PartitionSpec::new(&format!("group{n}"), &format!("Sectors Group {n}"), keys)
            })
            .collect();
        Self::new(partitions)
    }
}
