use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct ImportSummary {
    #[schema(example = "Import completed. 3 records imported successfully.")]
    pub message: String,
    pub imported: usize,
    /// `Row N: reason` per rejected row, `null` when every row went in.
    pub errors: Option<Vec<String>>,
}

impl ImportSummary {
    pub fn new(imported: usize, errors: Vec<String>) -> Self {
        Self {
            message: format!("Import completed. {imported} records imported successfully."),
            imported,
            errors: if errors.is_empty() { None } else { Some(errors) },
        }
    }
}
