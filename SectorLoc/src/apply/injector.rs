//! Injectors: one per kind of target file

use std::path::Path;

use crate::error::Result;
use crate::formats::encoding::EncodingPolicy;
use crate::inject::{inject_descriptions, inject_entity_table, inject_metadata};
use crate::schema::EntitySchema;
use crate::translation::TranslationDocument;

/// Produces a translated copy of one target file.
///
/// `inject` must read `source` and write the complete result to `output`;
/// it must never modify `source`.
pub trait Injector {
    /// Name used in progress output and errors
    fn name(&self) -> &str;

    /// Write the translated copy of `source` to `output`.
    ///
    /// # Errors
    /// Any error aborts the transaction and rolls every target back.
    fn inject(&self, source: &Path, output: &Path) -> Result<()>;
}

/// Direct fields of one entity type into its own table
pub struct TableInjector<'a> {
    schema: &'static EntitySchema,
    doc: &'a TranslationDocument,
    policy: EncodingPolicy,
}

impl<'a> TableInjector<'a> {
    #[must_use]
    pub fn new(schema: &'static EntitySchema, doc: &'a TranslationDocument, policy: EncodingPolicy) -> Self {
        Self { schema, doc, policy }
    }
}

impl Injector for TableInjector<'_> {
    fn name(&self) -> &str {
        self.schema.table_name()
    }

    fn inject(&self, source: &Path, output: &Path) -> Result<()> {
        inject_entity_table(source, output, self.schema, self.doc, &self.policy).map(|_| ())
    }
}

/// Description fields of every type into `descriptions.csv`
pub struct DescriptionsInjector<'a> {
    doc: &'a TranslationDocument,
    policy: EncodingPolicy,
}

impl<'a> DescriptionsInjector<'a> {
    #[must_use]
    pub fn new(doc: &'a TranslationDocument, policy: EncodingPolicy) -> Self {
        Self { doc, policy }
    }
}

impl Injector for DescriptionsInjector<'_> {
    fn name(&self) -> &str {
        "descriptions.csv"
    }

    fn inject(&self, source: &Path, output: &Path) -> Result<()> {
        inject_descriptions(source, output, self.doc, &self.policy).map(|_| ())
    }
}

/// Mod name and description into `mod_info.json`
pub struct MetadataInjector<'a> {
    doc: &'a TranslationDocument,
    policy: EncodingPolicy,
}

impl<'a> MetadataInjector<'a> {
    #[must_use]
    pub fn new(doc: &'a TranslationDocument, policy: EncodingPolicy) -> Self {
        Self { doc, policy }
    }
}

impl Injector for MetadataInjector<'_> {
    fn name(&self) -> &str {
        "mod_info.json"
    }

    fn inject(&self, source: &Path, output: &Path) -> Result<()> {
        inject_metadata(source, output, self.doc, &self.policy).map(|_| ())
    }
}
