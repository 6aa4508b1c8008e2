use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::columns::column;
use super::{Column, Entry};

/// One output artifact of a job. `(job_pk, sub_id)` is unique.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductEntry {
    pub product_id: i64,
    pub job_pk: i64,
    pub sub_id: u32,
    pub product_name: String,
    pub asset_type: Uuid,
    pub legacy_guid: Uuid,
}

impl ProductEntry {
    pub fn new(
        job_pk: i64,
        sub_id: u32,
        product_name: impl Into<String>,
        asset_type: Uuid,
        legacy_guid: Uuid,
    ) -> Self {
        Self {
            product_id: -1,
            job_pk,
            sub_id,
            product_name: product_name.into(),
            asset_type,
            legacy_guid,
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.product_id = id;
        self
    }
}

impl Default for ProductEntry {
    fn default() -> Self {
        Self::new(-1, 0, "", Uuid::nil(), Uuid::nil())
    }
}

// The legacy GUID is a lookup alias, not part of the product's content.
impl PartialEq for ProductEntry {
    fn eq(&self, other: &Self) -> bool {
        self.job_pk == other.job_pk
            && self.sub_id == other.sub_id
            && self.asset_type == other.asset_type
            && self.product_name == other.product_name
    }
}

impl Eq for ProductEntry {}

impl fmt::Display for ProductEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Product id:{} job:{} subid:{} name:{} type:{} legacy:{}",
            self.product_id,
            self.job_pk,
            self.sub_id,
            self.product_name,
            self.asset_type,
            self.legacy_guid
        )
    }
}

impl Entry for ProductEntry {
    const TABLE: &'static str = "Products";
    const COLUMNS: &'static [Column<Self>] = &[
        column!("ProductID" => product_id),
        column!("JobPK" => job_pk),
        column!("ProductName" => product_name),
        column!("SubID" => sub_id),
        column!("AssetType" => asset_type),
        column!("LegacyGuid" => legacy_guid),
    ];

    fn id(&self) -> i64 {
        self.product_id
    }

    fn set_id(&mut self, id: i64) {
        self.product_id = id;
    }
}

/// A sub id a product used to be addressed by.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegacySubIdEntry {
    pub sub_ids_entry_id: i64,
    pub product_pk: i64,
    pub sub_id: u32,
}

impl LegacySubIdEntry {
    pub fn new(product_pk: i64, sub_id: u32) -> Self {
        Self {
            sub_ids_entry_id: -1,
            product_pk,
            sub_id,
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.sub_ids_entry_id = id;
        self
    }
}

impl Default for LegacySubIdEntry {
    fn default() -> Self {
        Self::new(-1, 0)
    }
}

impl PartialEq for LegacySubIdEntry {
    fn eq(&self, other: &Self) -> bool {
        self.product_pk == other.product_pk && self.sub_id == other.sub_id
    }
}

impl Eq for LegacySubIdEntry {}

impl fmt::Display for LegacySubIdEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "LegacySubID id:{} product:{} subid:{}",
            self.sub_ids_entry_id, self.product_pk, self.sub_id
        )
    }
}

impl Entry for LegacySubIdEntry {
    const TABLE: &'static str = "LegacySubIDs";
    const COLUMNS: &'static [Column<Self>] = &[
        column!("LegacySubID" => sub_ids_entry_id),
        column!("ProductPK" => product_pk),
        column!("SubID" => sub_id),
    ];

    fn id(&self) -> i64 {
        self.sub_ids_entry_id
    }

    fn set_id(&mut self, id: i64) {
        self.sub_ids_entry_id = id;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_equality_ignores_legacy_guid() {
        let asset_type = Uuid::from_u128(0xa55e7);
        let a = ProductEntry::new(1, 0, "pc/tex.dds", asset_type, Uuid::from_u128(1));
        let b = ProductEntry::new(1, 0, "pc/tex.dds", asset_type, Uuid::from_u128(2)).with_id(9);
        let c = ProductEntry::new(1, 1, "pc/tex.dds", asset_type, Uuid::from_u128(1));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
