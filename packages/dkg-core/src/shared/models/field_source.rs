//! The field-source priority lattice.
//!
//! Every mutable field on a `Node`/`Edge` is tagged with the `FieldSource`
//! that produced its current value. A write is only accepted if its source
//! has priority greater than or equal to the field's current source (or the
//! field has never been set) — see `should_update`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FieldSource {
    Inferred,
    Analyzed,
    Declared,
    UserOverride,
}

impl FieldSource {
    pub fn priority(&self) -> u8 {
        match self {
            Self::Inferred => 1,
            Self::Analyzed => 2,
            Self::Declared => 3,
            Self::UserOverride => 4,
        }
    }
}

/// Which stage of the overall pipeline produced a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParsingStage {
    Rtl,
    Synthesis,
    Constraints,
    Floorplan,
    Timing,
    Board,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldMetadata {
    pub source: FieldSource,
    pub stage: ParsingStage,
    pub origin_file: Option<String>,
    pub origin_line: Option<u32>,
}

/// Per-entity metadata store: one `FieldMetadata` per field name that has
/// ever been written.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntityMetadata {
    pub fields: BTreeMap<String, FieldMetadata>,
}

impl EntityMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn source_of(&self, field: &str) -> Option<FieldSource> {
        self.fields.get(field).map(|m| m.source)
    }

    /// The monotonic acceptance rule: a write is accepted if the field has
    /// never been set, or if `source`'s priority is >= the current source's
    /// priority. Equal priority re-writes (e.g. re-running the same stage)
    /// are accepted, which makes repeated application of a stage idempotent.
    pub fn should_update(&self, field: &str, source: FieldSource) -> bool {
        match self.source_of(field) {
            None => true,
            Some(current) => source.priority() >= current.priority(),
        }
    }

    pub fn set(
        &mut self,
        field: impl Into<String>,
        source: FieldSource,
        stage: ParsingStage,
        origin_file: Option<String>,
        origin_line: Option<u32>,
    ) {
        self.fields.insert(
            field.into(),
            FieldMetadata {
                source,
                stage,
                origin_file,
                origin_line,
            },
        );
    }
}
