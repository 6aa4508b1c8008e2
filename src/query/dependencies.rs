//! Product dependency edge lookups.

use super::catalog::{self, SqlValue};
use crate::entry::{read_column, AssetId, Entry, ProductDependencyEntry};
use crate::storage::AssetDatabase;
use crate::Result;

fn owner_and_edge(row: &rusqlite::Row<'_>) -> rusqlite::Result<(AssetId, ProductDependencyEntry)> {
    let owner = AssetId::new(read_column(row, "SourceGuid")?, read_column(row, "SubID")?);
    Ok((owner, ProductDependencyEntry::from_row(row)?))
}

impl AssetDatabase {
    pub fn query_product_dependency_by_id(
        &self,
        product_dependency_id: i64,
        handler: impl FnMut(ProductDependencyEntry) -> bool,
    ) -> Result<()> {
        self.run(
            &catalog::PRODUCT_DEPENDENCY_BY_ID,
            &[SqlValue::Integer(product_dependency_id)],
            ProductDependencyEntry::from_row,
            handler,
        )
    }

    /// Edges out of one product.
    pub fn query_product_dependencies_by_product_id(
        &self,
        product_id: i64,
        handler: impl FnMut(ProductDependencyEntry) -> bool,
    ) -> Result<()> {
        self.run(
            &catalog::PRODUCT_DEPENDENCY_BY_PRODUCT_ID,
            &[SqlValue::Integer(product_id)],
            ProductDependencyEntry::from_row,
            handler,
        )
    }

    /// Every edge together with the logical identity of the product that owns it.
    pub fn query_product_dependencies_table(
        &self,
        handler: impl FnMut((AssetId, ProductDependencyEntry)) -> bool,
    ) -> Result<()> {
        self.run(&catalog::PRODUCT_DEPENDENCIES_TABLE, &[], owner_and_edge, handler)
    }

    /// Edges still recorded by path.
    pub fn query_unresolved_product_dependencies(
        &self,
        handler: impl FnMut(ProductDependencyEntry) -> bool,
    ) -> Result<()> {
        self.run(
            &catalog::UNRESOLVED_PRODUCT_DEPENDENCIES,
            &[],
            ProductDependencyEntry::from_row,
            handler,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::{DependencyFlags, UnresolvedDependencyType};
    use crate::query::fixtures::Fixture;

    #[test]
    fn test_edges_by_owner_and_unresolved() {
        let fx = Fixture::new();
        let mut resolved = ProductDependencyEntry::new(
            fx.rock_dds.product_id,
            fx.tree.source_guid,
            0,
            DependencyFlags::default().with(3).unwrap(),
            "pc",
        );
        let mut pending = ProductDependencyEntry::unresolved(
            fx.rock_dds.product_id,
            "pc/missing/texture.dds",
            UnresolvedDependencyType::ProductFile,
            DependencyFlags::default(),
            "pc",
        );
        fx.db.set_entry(&mut resolved).unwrap();
        fx.db.set_entry(&mut pending).unwrap();

        let mut edges = Vec::new();
        fx.db
            .query_product_dependencies_by_product_id(fx.rock_dds.product_id, |e| {
                edges.push(e);
                true
            })
            .unwrap();
        assert_eq!(edges, vec![resolved.clone(), pending.clone()]);
        assert!(edges[0].dependency_flags.test(3));

        let mut unresolved = Vec::new();
        fx.db
            .query_unresolved_product_dependencies(|e| {
                unresolved.push(e);
                true
            })
            .unwrap();
        assert_eq!(unresolved, vec![pending.clone()]);

        let mut owners = Vec::new();
        fx.db
            .query_product_dependencies_table(|(owner, edge)| {
                owners.push((owner, edge.product_dependency_id));
                true
            })
            .unwrap();
        owners.sort_by_key(|(_, id)| *id);
        let rock_id = AssetId::new(fx.rock.source_guid, 0);
        assert_eq!(
            owners,
            vec![
                (rock_id, resolved.product_dependency_id),
                (rock_id, pending.product_dependency_id),
            ]
        );

        let mut by_id = None;
        fx.db
            .query_product_dependency_by_id(pending.product_dependency_id, |e| {
                by_id = Some(e);
                false
            })
            .unwrap();
        assert!(by_id.unwrap().is_unresolved());
    }
}
