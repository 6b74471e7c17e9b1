use log::{debug, info};
use serde::Serialize;

use super::fields::normalize_header;
use super::{CanonicalField, SchemaError, TableKind};

/// One header column bound to a canonical field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnBinding {
    /// Canonical field
    pub field: CanonicalField,
    /// Column index in the input table
    pub index: usize,
    /// Header text as it appeared in the input
    pub header: String,
    /// Synonym (or override) that produced the binding
    pub matched: String,
}

/// Validated mapping from canonical fields to input columns
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnMap {
    /// Table the mapping belongs to
    pub table: TableKind,
    /// Bound columns, in canonical field order
    pub bindings: Vec<ColumnBinding>,
    /// Headers that were not bound to any field
    pub ignored: Vec<String>,
}

impl ColumnMap {
    /// Column index bound to `field`, if any
    pub fn index_of(&self, field: CanonicalField) -> Option<usize> {
        self.binding(field).map(|b| b.index)
    }

    /// Binding for `field`, if any
    pub fn binding(&self, field: CanonicalField) -> Option<&ColumnBinding> {
        self.bindings.iter().find(|b| b.field == field)
    }

    /// Field bound to column `index`, if any
    pub fn field_at(&self, index: usize) -> Option<CanonicalField> {
        self.bindings.iter().find(|b| b.index == index).map(|b| b.field)
    }

    /// Column index bound to a required field
    pub fn require(&self, field: CanonicalField) -> Result<usize, SchemaError> {
        self.index_of(field)
            .ok_or_else(|| SchemaError::missing(self.table, field))
    }
}

/// Resolves raw headers to canonical fields using the synonym table.
///
/// Explicit overrides are applied first and bind exactly the named header.
#[derive(Debug, Clone)]
pub struct ColumnResolver {
    table: TableKind,
    overrides: Vec<(CanonicalField, String)>,
}

impl ColumnResolver {
    /// Resolver using only the built-in synonym table
    pub fn new(table: TableKind) -> Self {
        Self {
            table,
            overrides: Vec::new(),
        }
    }

    /// Force `field` to bind to the column named `header`
    pub fn with_override(mut self, field: CanonicalField, header: impl Into<String>) -> Self {
        self.overrides.push((field, header.into()));
        self
    }

    /// Table this resolver normalizes
    pub fn table(&self) -> TableKind {
        self.table
    }

    /// Bind `headers` to canonical fields and validate required fields
    pub fn resolve<S: AsRef<str>>(&self, headers: &[S]) -> Result<ColumnMap, SchemaError> {
        let normalized: Vec<String> = headers
            .iter()
            .map(|h| normalize_header(h.as_ref()))
            .collect();

        if normalized.iter().all(|h| h.is_empty()) {
            return Err(SchemaError::EmptyHeader { table: self.table });
        }

        let mut taken = vec![false; headers.len()];
        let mut bindings: Vec<ColumnBinding> = Vec::new();

        for (field, wanted) in &self.overrides {
            let wanted_norm = normalize_header(wanted);
            let index = normalized
                .iter()
                .position(|h| *h == wanted_norm)
                .ok_or_else(|| SchemaError::UnknownOverride {
                    table: self.table,
                    field: *field,
                    header: wanted.clone(),
                })?;
            taken[index] = true;
            bindings.push(ColumnBinding {
                field: *field,
                index,
                header: headers[index].as_ref().to_string(),
                matched: wanted.clone(),
            });
        }

        for &field in self.table.fields() {
            if bindings.iter().any(|b| b.field == field) {
                continue;
            }
            let hit = field.synonyms().iter().find_map(|synonym| {
                normalized
                    .iter()
                    .enumerate()
                    .find(|(i, h)| !taken[*i] && h.as_str() == *synonym)
                    .map(|(i, _)| (i, *synonym))
            });
            if let Some((index, synonym)) = hit {
                taken[index] = true;
                bindings.push(ColumnBinding {
                    field,
                    index,
                    header: headers[index].as_ref().to_string(),
                    matched: synonym.to_string(),
                });
            }
        }

        bindings.sort_by_key(|b| b.field);

        for binding in &bindings {
            info!(
                "{}: column '{}' -> {} (matched '{}')",
                self.table, binding.header, binding.field, binding.matched
            );
        }

        let ignored: Vec<String> = headers
            .iter()
            .enumerate()
            .filter(|(i, _)| !taken[*i])
            .map(|(_, h)| h.as_ref().to_string())
            .collect();
        if !ignored.is_empty() {
            debug!("{}: ignoring columns {:?}", self.table, ignored);
        }

        let map = ColumnMap {
            table: self.table,
            bindings,
            ignored,
        };

        for &field in self.table.required_fields() {
            map.require(field)?;
        }

        Ok(map)
    }
}
