use super::{Field, FieldOption};
use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// Id of the dataset that backs the enterprise status field. It always exists.
pub const ENTERPRISE_STATUS_DATASET: &str = "enterprise_status";

/// One entry of a dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetItem {
    pub id: String,
    pub value: String,
    #[serde(default)]
    pub label: String,
}

impl DatasetItem {
    pub fn new(id: &str, value: &str, label: &str) -> Self {
        Self {
            id: id.to_string(),
            value: value.to_string(),
            label: label.to_string(),
        }
    }
}

/// A named, reusable list of options referenced by choice fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub items: Vec<DatasetItem>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub permanent: bool,
}

impl Dataset {
    /// The permanent status dataset injected into every process.
    pub fn enterprise_status() -> Self {
        Self {
            id: ENTERPRISE_STATUS_DATASET.to_string(),
            name: "Enterprise Status".to_string(),
            items: vec![
                DatasetItem::new("status_active", "active", "Active"),
                DatasetItem::new("status_pending", "pending", "Pending"),
                DatasetItem::new("status_complete", "complete", "Complete"),
                DatasetItem::new("status_cancelled", "cancelled", "Cancelled"),
            ],
            permanent: true,
        }
    }
}

/// Resolves dataset ids to datasets.
///
/// Only used to enrich what is shown for a choice value; evaluation itself
/// compares raw values and never needs a dataset.
pub trait DatasetResolver: Send + Sync {
    fn get_dataset(&self, dataset_id: &str) -> Option<&Dataset>;
}

/// An in-memory set of datasets for one process.
#[derive(Debug, Clone, Default)]
pub struct DatasetCatalog {
    datasets: Vec<Dataset>,
    index: AHashMap<String, usize>,
}

impl DatasetCatalog {
    /// Builds a catalog, prepending the permanent status dataset when it is missing.
    pub fn new(datasets: Vec<Dataset>) -> Self {
        let mut all = datasets;
        if !all.iter().any(|ds| ds.id == ENTERPRISE_STATUS_DATASET) {
            all.insert(0, Dataset::enterprise_status());
        }
        let mut index = AHashMap::with_capacity(all.len());
        for (position, dataset) in all.iter().enumerate() {
            index.entry(dataset.id.clone()).or_insert(position);
        }
        Self {
            datasets: all,
            index,
        }
    }

    pub fn datasets(&self) -> &[Dataset] {
        &self.datasets
    }
}

impl DatasetResolver for DatasetCatalog {
    fn get_dataset(&self, dataset_id: &str) -> Option<&Dataset> {
        self.index.get(dataset_id).map(|&i| &self.datasets[i])
    }
}

/// Expands the options of a choice field.
///
/// A dataset-backed field takes its dataset's items; otherwise the inline options
/// are used. Non-choice fields have no options.
pub fn choice_options(field: &Field, resolver: &dyn DatasetResolver) -> Vec<FieldOption> {
    if !field.field_type.is_choice() {
        return Vec::new();
    }
    if let Some(dataset_id) = &field.dataset_id {
        return resolver
            .get_dataset(dataset_id)
            .map(|dataset| {
                dataset
                    .items
                    .iter()
                    .map(|item| FieldOption::Labeled {
                        value: item.value.clone(),
                        label: Some(item.label.clone()),
                    })
                    .collect()
            })
            .unwrap_or_default();
    }
    field.options.clone().unwrap_or_default()
}
