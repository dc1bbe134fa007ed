//! Loaded entity records

use indexmap::IndexMap;

use crate::error::Result;
use crate::formats::table::{Table, TableRow};
use crate::highlight::{DisplayMarkup, HighlightedText};
use crate::schema::{EntityType, FieldCodec, FieldSpec};

/// A field value as read from the game files
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Plain(String),
    Highlighted(HighlightedText),
}

impl FieldValue {
    /// The game-form text (without highlight markers).
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Plain(text) => text,
            Self::Highlighted(highlighted) => &highlighted.text,
        }
    }

    /// The form a translator edits.
    #[must_use]
    pub fn to_portable(&self) -> String {
        match self {
            Self::Plain(text) => text.clone(),
            Self::Highlighted(highlighted) => highlighted.to_portable(),
        }
    }

    /// The form shown in previews.
    #[must_use]
    pub fn to_display(&self, markup: &DisplayMarkup) -> String {
        match self {
            Self::Plain(text) => text.clone(),
            Self::Highlighted(highlighted) => highlighted.to_display(markup),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Plain(text) => text.is_empty(),
            Self::Highlighted(highlighted) => highlighted.is_empty(),
        }
    }
}

/// Where one field's cells sit in a particular table header
#[derive(Debug, Clone, Copy)]
pub(crate) struct FieldColumns {
    pub spec: &'static FieldSpec,
    pub text: Option<usize>,
    pub highlights: Option<usize>,
}

impl FieldColumns {
    /// Resolve a field against a header. Optional columns may be absent.
    pub(crate) fn resolve(table: &Table, spec: &'static FieldSpec) -> Result<Self> {
        let text = if spec.required {
            Some(table.column_index(spec.column)?)
        } else {
            table.find_column(spec.column)
        };
        let highlights = match spec.codec {
            FieldCodec::Plain => None,
            FieldCodec::Highlighted { highlights_column, .. } => table.find_column(highlights_column),
        };
        Ok(Self {
            spec,
            text,
            highlights,
        })
    }

    pub(crate) fn resolve_all(table: &Table, specs: &'static [FieldSpec]) -> Result<Vec<Self>> {
        specs.iter().map(|spec| Self::resolve(table, spec)).collect()
    }

    /// Read the field from a row; absent columns read as empty.
    pub(crate) fn read(&self, row: &TableRow) -> FieldValue {
        let text = self.text.map_or("", |i| row.get(i));
        match self.spec.codec {
            FieldCodec::Plain => FieldValue::Plain(text.to_string()),
            FieldCodec::Highlighted { style, .. } => {
                let highlights = self.highlights.map_or("", |i| row.get(i));
                FieldValue::Highlighted(HighlightedText::from_game(text, highlights, style))
            }
        }
    }
}

/// One hull, weapon, ship system, faction or resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityRecord {
    pub entity_type: EntityType,
    pub id: String,
    /// Semantic field name to value, direct fields first
    pub fields: IndexMap<String, FieldValue>,
    /// Untranslated lookup columns
    pub references: IndexMap<String, String>,
}

impl EntityRecord {
    #[must_use]
    pub fn new(entity_type: EntityType, id: impl Into<String>) -> Self {
        Self {
            entity_type,
            id: id.into(),
            fields: IndexMap::new(),
            references: IndexMap::new(),
        }
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Game-form text of a field.
    #[must_use]
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(FieldValue::text)
    }

    #[must_use]
    pub fn portable(&self, name: &str) -> Option<String> {
        self.fields.get(name).map(FieldValue::to_portable)
    }

    #[must_use]
    pub fn display(&self, name: &str, markup: &DisplayMarkup) -> Option<String> {
        self.fields.get(name).map(|v| v.to_display(markup))
    }

    #[must_use]
    pub fn reference(&self, column: &str) -> Option<&str> {
        self.references.get(column).map(String::as_str)
    }

    /// Weapons whose `hints` include `SYSTEM` are mounted by ship systems
    /// and never appear in the refit screen.
    #[must_use]
    pub fn is_system_weapon(&self) -> bool {
        self.entity_type == EntityType::Weapon
            && self
                .reference("hints")
                .is_some_and(|hints| hints.split(',').any(|h| h.trim() == "SYSTEM"))
    }

    /// The ship system a hull mounts, if any.
    #[must_use]
    pub fn system_id(&self) -> Option<&str> {
        if self.entity_type != EntityType::Ship {
            return None;
        }
        self.reference("system id").filter(|id| !id.trim().is_empty())
    }
}
