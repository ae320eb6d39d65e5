use dz_model::{CacheKey, Table};
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

/// Result of importing one file.
///
/// Exactly one of `data` and `error` is set.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportOutcome {
    pub filename: String,
    pub key: Option<CacheKey>,
    pub data: Option<Table>,
    pub error: Option<String>,
}

impl ImportOutcome {
    pub fn success(filename: impl Into<String>, key: CacheKey, table: Table) -> Self {
        Self {
            filename: filename.into(),
            key: Some(key),
            data: Some(table),
            error: None,
        }
    }

    pub fn failure(filename: impl Into<String>, error: &impl std::fmt::Display) -> Self {
        Self {
            filename: filename.into(),
            key: None,
            data: None,
            error: Some(error.to_string()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.data.is_some()
    }
}

impl Serialize for ImportOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ImportOutcome", 4)?;
        state.serialize_field("filename", &self.filename)?;
        state.serialize_field("id", &self.key)?;
        state.serialize_field("data", &self.data.as_ref().map(Table::to_records))?;
        state.serialize_field("error", &self.error)?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ImportError;

    #[test]
    fn failure_serializes_null_data() {
        let outcome = ImportOutcome::failure(
            "x.pdf",
            &ImportError::UnsupportedExtension {
                filename: "x.pdf".to_string(),
                extension: "pdf".to_string(),
            },
        );
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["filename"], "x.pdf");
        assert!(json["data"].is_null());
        assert_eq!(
            json["error"],
            "unsupported file extension 'pdf' for x.pdf"
        );
    }
}
