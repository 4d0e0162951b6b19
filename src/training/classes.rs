//! Mapping between survey answers and contiguous class indices

use serde::{Deserialize, Serialize};

/// Sorted distinct label values; position is the class index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassIndex {
    labels: Vec<i64>,
}

impl ClassIndex {
    pub fn fit(labels: &[i64]) -> Self {
        let mut labels = labels.to_vec();
        labels.sort_unstable();
        labels.dedup();
        Self { labels }
    }

    pub fn encode(&self, label: i64) -> Option<usize> {
        self.labels.binary_search(&label).ok()
    }

    pub fn decode(&self, class: usize) -> Option<i64> {
        self.labels.get(class).copied()
    }

    pub fn labels(&self) -> &[i64] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}
