//! Direct and transitive product dependencies.
//!
//! Edges name their target by (source GUID, sub id), so a target found here
//! is whatever product currently carries that identity, regardless of row id.

use std::collections::{HashSet, VecDeque};

use crate::entry::{Entry, ProductEntry};
use crate::query::catalog::{self, SqlValue};
use crate::storage::AssetDatabase;
use crate::Result;

impl AssetDatabase {
    /// Products the given product depends on through a single edge.
    pub fn query_direct_product_dependencies(
        &self,
        product_id: i64,
        handler: impl FnMut(ProductEntry) -> bool,
    ) -> Result<()> {
        self.run(
            &catalog::DIRECT_PRODUCT_DEPENDENCIES,
            &[SqlValue::Integer(product_id)],
            ProductEntry::from_row,
            handler,
        )
    }

    /// Every product reachable from `product_id`, breadth first.
    ///
    /// Each product is reported once and the root is never reported, even
    /// when a cycle leads back to it.
    pub fn query_all_product_dependencies(
        &self,
        product_id: i64,
        mut handler: impl FnMut(ProductEntry) -> bool,
    ) -> Result<()> {
        let mut visited = HashSet::new();
        let mut queue = VecDeque::new();

        visited.insert(product_id);
        queue.push_back(product_id);

        while let Some(current) = queue.pop_front() {
            let direct = self.collect(
                &catalog::DIRECT_PRODUCT_DEPENDENCIES,
                &[SqlValue::Integer(current)],
                ProductEntry::from_row,
            )?;

            for product in direct {
                if !visited.insert(product.product_id) {
                    continue;
                }
                queue.push_back(product.product_id);
                if !handler(product) {
                    return Ok(());
                }
            }
        }

        tracing::debug!(root = product_id, reached = visited.len() - 1, "walked product dependencies");
        Ok(())
    }
}
