//! Entity schemas: which columns hold which translatable fields
//!
//! Every entity type has one static [`EntitySchema`]. Direct fields live in
//! the entity's own table; description fields live in the shared
//! `descriptions.csv` under the generic `text1`..`text4` columns. The
//! [`FieldCodec`] of each field is the only place that decides whether a
//! value passes through the highlight codec.

use std::fmt;

use crate::highlight::HighlightStyle;

/// Hull table, relative to the mod root
pub const SHIP_TABLE: &str = "data/hulls/ship_data.csv";
/// Weapon table, relative to the mod root
pub const WEAPON_TABLE: &str = "data/weapons/weapon_data.csv";
/// Ship system table, relative to the mod root
pub const SHIP_SYSTEM_TABLE: &str = "data/shipsystems/ship_systems.csv";
/// Shared descriptions table, relative to the mod root
pub const DESCRIPTIONS_TABLE: &str = "data/strings/descriptions.csv";
/// Mod metadata file, relative to the mod root
pub const MOD_INFO_FILE: &str = "mod_info.json";
/// Ship skin directory, relative to the mod root
pub const SKINS_DIR: &str = "data/hulls/skins";

/// Kind of game content a record describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityType {
    Ship,
    Weapon,
    ShipSystem,
    Faction,
    Resource,
    ModMeta,
}

impl EntityType {
    /// Every entity type, in document order.
    pub const ALL: [EntityType; 6] = [
        Self::Ship,
        Self::Weapon,
        Self::ShipSystem,
        Self::Faction,
        Self::Resource,
        Self::ModMeta,
    ];

    /// Tag used in `descriptions.csv` and translation documents.
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Self::Ship => "SHIP",
            Self::Weapon => "WEAPON",
            Self::ShipSystem => "SHIP_SYSTEM",
            Self::Faction => "FACTION",
            Self::Resource => "RESOURCE",
            Self::ModMeta => "MOD_META",
        }
    }

    /// Parse a type tag. Open tags such as `CUSTOM` have no entity type.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.tag() == tag.trim())
    }

    /// The schema for this type.
    #[must_use]
    pub fn schema(self) -> &'static EntitySchema {
        schema_for(self)
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// How a field's cells map to a value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldCodec {
    /// One column, copied as-is.
    Plain,
    /// Text column plus a sibling column of `|`-separated highlight tags.
    Highlighted {
        highlights_column: &'static str,
        style: HighlightStyle,
    },
}

/// One semantic field and the column that stores it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Semantic name used in translation documents
    pub name: &'static str,
    /// Physical column name
    pub column: &'static str,
    pub codec: FieldCodec,
    /// Whether a table without this column is an error
    pub required: bool,
}

impl FieldSpec {
    const fn plain(name: &'static str, column: &'static str) -> Self {
        Self {
            name,
            column,
            codec: FieldCodec::Plain,
            required: true,
        }
    }

    const fn text(name: &'static str, column: &'static str) -> Self {
        Self {
            name,
            column,
            codec: FieldCodec::Plain,
            required: false,
        }
    }

    const fn highlighted(
        name: &'static str,
        column: &'static str,
        highlights_column: &'static str,
        style: HighlightStyle,
    ) -> Self {
        Self {
            name,
            column,
            codec: FieldCodec::Highlighted {
                highlights_column,
                style,
            },
            required: false,
        }
    }

    /// Whether values pass through the highlight codec.
    #[must_use]
    pub fn is_highlighted(&self) -> bool {
        matches!(self.codec, FieldCodec::Highlighted { .. })
    }
}

/// Column mapping for one entity type
#[derive(Debug)]
pub struct EntitySchema {
    pub entity_type: EntityType,
    /// Primary table relative to the mod root, if the type has one
    pub table: Option<&'static str>,
    pub id_column: &'static str,
    /// Fields stored in the primary table
    pub direct_fields: &'static [FieldSpec],
    /// Fields stored in `descriptions.csv`
    pub description_fields: &'static [FieldSpec],
    /// Columns read for lookups and never translated
    pub reference_columns: &'static [&'static str],
}

impl EntitySchema {
    /// Look up a field by semantic name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.fields().find(|f| f.name == name)
    }

    /// Direct fields followed by description fields.
    pub fn fields(&self) -> impl Iterator<Item = &'static FieldSpec> {
        self.direct_fields.iter().chain(self.description_fields.iter())
    }

    /// File name of the primary table, for messages.
    #[must_use]
    pub fn table_name(&self) -> &'static str {
        self.table
            .and_then(|t| t.rsplit('/').next())
            .unwrap_or(self.entity_type.tag())
    }
}

pub static SHIP: EntitySchema = EntitySchema {
    entity_type: EntityType::Ship,
    table: Some(SHIP_TABLE),
    id_column: "id",
    direct_fields: &[
        FieldSpec::plain("name", "name"),
        FieldSpec::plain("tech", "tech/manufacturer"),
        FieldSpec::plain("role", "designation"),
    ],
    description_fields: &[
        FieldSpec::text("desc_long", "text1"),
        FieldSpec::text("desc_short", "text2"),
        FieldSpec::text("desc_fleet", "text3"),
    ],
    reference_columns: &["system id"],
};

pub static WEAPON: EntitySchema = EntitySchema {
    entity_type: EntityType::Weapon,
    table: Some(WEAPON_TABLE),
    id_column: "id",
    direct_fields: &[
        FieldSpec::plain("name", "name"),
        FieldSpec::plain("tech", "tech/manufacturer"),
        FieldSpec::plain("role", "primaryRoleStr"),
        FieldSpec::plain("accuracy", "accuracyStr"),
        FieldSpec::plain("fly_speed", "speedStr"),
        FieldSpec::plain("tracking", "trackingStr"),
        FieldSpec::plain("turn_rate", "turnRateStr"),
        FieldSpec::highlighted(
            "special_effect_1",
            "customPrimary",
            "customPrimaryHL",
            HighlightStyle::Placeholder,
        ),
        FieldSpec::highlighted(
            "special_effect_2",
            "customAncillary",
            "customAncillaryHL",
            HighlightStyle::Placeholder,
        ),
    ],
    description_fields: &[
        FieldSpec::text("description", "text1"),
        FieldSpec::text("desc_foot_note", "text2"),
    ],
    reference_columns: &["hints"],
};

pub static SHIP_SYSTEM: EntitySchema = EntitySchema {
    entity_type: EntityType::ShipSystem,
    table: Some(SHIP_SYSTEM_TABLE),
    id_column: "id",
    direct_fields: &[FieldSpec::plain("name", "name")],
    description_fields: &[
        FieldSpec::text("desc_in_codex", "text1"),
        FieldSpec::text("system_type", "text2"),
        FieldSpec::highlighted("desc_on_ship", "text3", "text4", HighlightStyle::Inline),
    ],
    reference_columns: &[],
};

pub static FACTION: EntitySchema = EntitySchema {
    entity_type: EntityType::Faction,
    table: None,
    id_column: "id",
    direct_fields: &[],
    description_fields: &[FieldSpec::text("description", "text1")],
    reference_columns: &[],
};

pub static RESOURCE: EntitySchema = EntitySchema {
    entity_type: EntityType::Resource,
    table: None,
    id_column: "id",
    direct_fields: &[],
    description_fields: &[FieldSpec::text("description", "text1")],
    reference_columns: &[],
};

/// Keys of `mod_info.json`. Only `name` and `description` are translated.
pub static MOD_META: EntitySchema = EntitySchema {
    entity_type: EntityType::ModMeta,
    table: None,
    id_column: "id",
    direct_fields: &[
        FieldSpec::text("name", "name"),
        FieldSpec::text("description", "description"),
    ],
    description_fields: &[],
    reference_columns: &["id", "version", "gameVersion", "author"],
};

/// The schema for an entity type.
#[must_use]
pub fn schema_for(entity_type: EntityType) -> &'static EntitySchema {
    match entity_type {
        EntityType::Ship => &SHIP,
        EntityType::Weapon => &WEAPON,
        EntityType::ShipSystem => &SHIP_SYSTEM,
        EntityType::Faction => &FACTION,
        EntityType::Resource => &RESOURCE,
        EntityType::ModMeta => &MOD_META,
    }
}

/// Schemas of the types that have their own table.
pub fn tabled_schemas() -> impl Iterator<Item = &'static EntitySchema> {
    EntityType::ALL
        .into_iter()
        .map(schema_for)
        .filter(|s| s.table.is_some())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_round_trip() {
        for entity_type in EntityType::ALL {
            assert_eq!(EntityType::from_tag(entity_type.tag()), Some(entity_type));
            assert_eq!(schema_for(entity_type).entity_type, entity_type);
        }
        assert_eq!(EntityType::from_tag("CUSTOM"), None);
    }

    #[test]
    fn test_field_names_are_unique_per_schema() {
        for entity_type in EntityType::ALL {
            let schema = schema_for(entity_type);
            let mut names: Vec<&str> = schema.fields().map(|f| f.name).collect();
            let total = names.len();
            names.sort_unstable();
            names.dedup();
            assert_eq!(names.len(), total, "duplicate field in {entity_type}");
        }
    }

    #[test]
    fn test_highlighted_fields() {
        let effect = WEAPON.field("special_effect_1").unwrap();
        assert_eq!(
            effect.codec,
            FieldCodec::Highlighted {
                highlights_column: "customPrimaryHL",
                style: HighlightStyle::Placeholder,
            }
        );
        assert!(SHIP_SYSTEM.field("desc_on_ship").unwrap().is_highlighted());
        assert!(!SHIP.field("desc_long").unwrap().is_highlighted());
    }

    #[test]
    fn test_tabled_schemas() {
        let tables: Vec<&str> = tabled_schemas().filter_map(|s| s.table).collect();
        assert_eq!(tables, vec![SHIP_TABLE, WEAPON_TABLE, SHIP_SYSTEM_TABLE]);
        assert_eq!(SHIP.table_name(), "ship_data.csv");
        assert_eq!(FACTION.table_name(), "FACTION");
    }
}
