//! Dependency edges between sources and between products.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::columns::column;
use super::{Column, DependencyFlags, DependencyType, Entry, UnresolvedDependencyType};
use crate::{Error, Result};

/// Logical identity of a product: its source's GUID plus its sub id.
///
/// Row ids change whenever a job reruns, this pair does not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct AssetId {
    pub source_guid: Uuid,
    pub sub_id: u32,
}

impl AssetId {
    pub fn new(source_guid: Uuid, sub_id: u32) -> Self {
        Self { source_guid, sub_id }
    }

    pub fn is_valid(&self) -> bool {
        !self.source_guid.is_nil()
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}:{:x}", self.source_guid.hyphenated(), self.sub_id)
    }
}

/// "`source` depends on `depends_on_source`", as declared by a builder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceFileDependencyEntry {
    pub source_dependency_id: i64,
    pub builder_guid: Uuid,
    pub source: String,
    pub depends_on_source: String,
    pub type_of_dependency: DependencyType,
}

impl SourceFileDependencyEntry {
    pub fn new(
        builder_guid: Uuid,
        source: impl Into<String>,
        depends_on_source: impl Into<String>,
        type_of_dependency: DependencyType,
    ) -> Self {
        Self {
            source_dependency_id: -1,
            builder_guid,
            source: source.into(),
            depends_on_source: depends_on_source.into(),
            type_of_dependency,
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.source_dependency_id = id;
        self
    }
}

impl Default for SourceFileDependencyEntry {
    fn default() -> Self {
        Self::new(Uuid::nil(), "", "", DependencyType::SOURCE_TO_SOURCE)
    }
}

impl PartialEq for SourceFileDependencyEntry {
    fn eq(&self, other: &Self) -> bool {
        self.builder_guid == other.builder_guid
            && self.source == other.source
            && self.depends_on_source == other.depends_on_source
            && self.type_of_dependency == other.type_of_dependency
    }
}

impl Eq for SourceFileDependencyEntry {}

impl fmt::Display for SourceFileDependencyEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SourceFileDependency id:{} builder:{} source:{} dependsOn:{} type:{}",
            self.source_dependency_id,
            self.builder_guid,
            self.source,
            self.depends_on_source,
            self.type_of_dependency
        )
    }
}

impl Entry for SourceFileDependencyEntry {
    const TABLE: &'static str = "SourceDependency";
    const COLUMNS: &'static [Column<Self>] = &[
        column!("SourceDependencyID" => source_dependency_id),
        column!("BuilderGuid" => builder_guid),
        column!("Source" => source),
        column!("DependsOnSource" => depends_on_source),
        column!("TypeOfDependency" => type_of_dependency),
    ];

    fn id(&self) -> i64 {
        self.source_dependency_id
    }

    fn set_id(&mut self, id: i64) {
        self.source_dependency_id = id;
    }

    fn validate(&self) -> Result<()> {
        if self.type_of_dependency.is_any() {
            return Err(Error::InvalidEntry(format!(
                "dependency {} -> {} has the wildcard type",
                self.source, self.depends_on_source
            )));
        }
        Ok(())
    }
}

/// "Product `product_pk` depends on the product identified by
/// (`dependency_source_guid`, `dependency_sub_id`)".
///
/// While the target is unknown the edge carries an `unresolved_path` instead
/// and a nil GUID.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductDependencyEntry {
    pub product_dependency_id: i64,
    pub product_pk: i64,
    pub dependency_source_guid: Uuid,
    pub dependency_sub_id: u32,
    pub dependency_flags: DependencyFlags,
    pub platform: String,
    pub unresolved_path: String,
    pub dependency_type: UnresolvedDependencyType,
}

impl ProductDependencyEntry {
    pub fn new(
        product_pk: i64,
        dependency_source_guid: Uuid,
        dependency_sub_id: u32,
        dependency_flags: DependencyFlags,
        platform: impl Into<String>,
    ) -> Self {
        Self {
            product_dependency_id: -1,
            product_pk,
            dependency_source_guid,
            dependency_sub_id,
            dependency_flags,
            platform: platform.into(),
            unresolved_path: String::new(),
            dependency_type: UnresolvedDependencyType::ProductFile,
        }
    }

    /// An edge whose target is only known by path.
    pub fn unresolved(
        product_pk: i64,
        unresolved_path: impl Into<String>,
        dependency_type: UnresolvedDependencyType,
        dependency_flags: DependencyFlags,
        platform: impl Into<String>,
    ) -> Self {
        Self {
            unresolved_path: unresolved_path.into(),
            dependency_type,
            ..Self::new(product_pk, Uuid::nil(), 0, dependency_flags, platform)
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.product_dependency_id = id;
        self
    }

    pub fn is_unresolved(&self) -> bool {
        !self.unresolved_path.is_empty()
    }

    pub fn target(&self) -> AssetId {
        AssetId::new(self.dependency_source_guid, self.dependency_sub_id)
    }

    /// Point the edge at a concrete product and drop the placeholder path.
    pub fn resolve_to(&mut self, target: AssetId) {
        self.dependency_source_guid = target.source_guid;
        self.dependency_sub_id = target.sub_id;
        self.unresolved_path.clear();
    }
}

impl Default for ProductDependencyEntry {
    fn default() -> Self {
        Self::new(-1, Uuid::nil(), 0, DependencyFlags::default(), "")
    }
}

impl PartialEq for ProductDependencyEntry {
    fn eq(&self, other: &Self) -> bool {
        self.product_pk == other.product_pk
            && self.dependency_source_guid == other.dependency_source_guid
            && self.dependency_sub_id == other.dependency_sub_id
            && self.dependency_flags == other.dependency_flags
            && self.platform == other.platform
            && self.unresolved_path == other.unresolved_path
            && self.dependency_type == other.dependency_type
    }
}

impl Eq for ProductDependencyEntry {}

impl fmt::Display for ProductDependencyEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ProductDependency id:{} product:{} target:{} flags:{} platform:{}",
            self.product_dependency_id,
            self.product_pk,
            self.target(),
            self.dependency_flags,
            self.platform
        )?;
        if self.is_unresolved() {
            write!(f, " unresolved:{} ({})", self.unresolved_path, self.dependency_type)?;
        }
        Ok(())
    }
}

impl Entry for ProductDependencyEntry {
    const TABLE: &'static str = "ProductDependencies";
    const COLUMNS: &'static [Column<Self>] = &[
        column!("ProductDependencyID" => product_dependency_id),
        column!("ProductPK" => product_pk),
        column!("DependencySourceGuid" => dependency_source_guid),
        column!("DependencySubID" => dependency_sub_id),
        column!("DependencyFlags" => dependency_flags),
        column!("Platform" => platform),
        column!("UnresolvedPath" => unresolved_path),
        column!("UnresolvedDependencyType" => dependency_type),
    ];

    fn id(&self) -> i64 {
        self.product_dependency_id
    }

    fn set_id(&mut self, id: i64) {
        self.product_dependency_id = id;
    }
}
