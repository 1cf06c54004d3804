use super::Workflow;
use itertools::Itertools;

impl Workflow {
    /// Lists the structural problems of the workflow.
    ///
    /// Advisory only: an invalid workflow can still be edited and evaluated.
    /// An empty list means the workflow is complete.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.name.is_empty() {
            errors.push("Workflow name is required".to_string());
        }

        if self.is_empty() {
            errors.push("At least one step is required".to_string());
        }

        let has_duplicate_forms = self
            .steps()
            .iter()
            .filter_map(|s| s.bound_form())
            .duplicates()
            .next()
            .is_some();
        if has_duplicate_forms {
            errors.push("Duplicate form assignments found".to_string());
        }

        errors
    }
}
