use super::{CanonicalField, TableKind};

/// Errors raised while resolving a table header onto the canonical schema
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    /// A required canonical field could not be bound to any column
    #[error("{table}: missing required column '{field}' (accepted headers: {accepted})")]
    MissingField {
        /// Table being normalized
        table: TableKind,
        /// Field that could not be resolved
        field: CanonicalField,
        /// Comma-separated list of accepted header spellings
        accepted: String,
    },

    /// An explicit column override names a header that does not exist
    #[error("{table}: column '{header}' requested for '{field}' is not present in the header")]
    UnknownOverride {
        /// Table being normalized
        table: TableKind,
        /// Field the override was meant for
        field: CanonicalField,
        /// Header name given in the override
        header: String,
    },

    /// The table has no header row
    #[error("{table}: header row is missing or empty")]
    EmptyHeader {
        /// Table being normalized
        table: TableKind,
    },
}

impl SchemaError {
    pub(crate) fn missing(table: TableKind, field: CanonicalField) -> Self {
        SchemaError::MissingField {
            table,
            field,
            accepted: field.synonyms().join(", "),
        }
    }
}
