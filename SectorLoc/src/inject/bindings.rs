//! Column bindings: which document field goes into which table column

use crate::schema::{EntitySchema, FieldCodec, FieldSpec};

/// One document field bound to one table column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnBinding {
    /// Semantic field name in the translation document
    pub field: String,
    /// Column the value is written to
    pub column: String,
    pub codec: FieldCodec,
    /// Whether a table without the column is an error
    pub required: bool,
}

impl ColumnBinding {
    /// A plain binding to an optional column.
    #[must_use]
    pub fn plain(field: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            column: column.into(),
            codec: FieldCodec::Plain,
            required: false,
        }
    }

    #[must_use]
    pub fn from_spec(spec: &FieldSpec) -> Self {
        Self {
            field: spec.name.to_string(),
            column: spec.column.to_string(),
            codec: spec.codec,
            required: spec.required,
        }
    }
}

/// An ordered set of bindings for one kind of row
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bindings(Vec<ColumnBinding>);

impl Bindings {
    #[must_use]
    pub fn new(bindings: Vec<ColumnBinding>) -> Self {
        Self(bindings)
    }

    /// Bindings for an entity's own table.
    #[must_use]
    pub fn direct(schema: &EntitySchema) -> Self {
        Self(schema.direct_fields.iter().map(ColumnBinding::from_spec).collect())
    }

    /// Bindings for an entity's rows in `descriptions.csv`.
    #[must_use]
    pub fn descriptions(schema: &EntitySchema) -> Self {
        Self(
            schema
                .description_fields
                .iter()
                .map(ColumnBinding::from_spec)
                .collect(),
        )
    }

    /// Replace the binding for `binding.field`, or append it.
    #[must_use]
    pub fn with(mut self, binding: ColumnBinding) -> Self {
        match self.0.iter_mut().find(|b| b.field == binding.field) {
            Some(existing) => *existing = binding,
            None => self.0.push(binding),
        }
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = &ColumnBinding> {
        self.0.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
