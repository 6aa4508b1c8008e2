//! Unresolved dependency resolution
//!
//! Builders record a product dependency by path when the target has not been
//! built yet. Once products exist, a resolution pass rewrites such edges to
//! carry the target's logical identity and clears the path.
//!
//! Resolution by edge type:
//! 1. ProductFile: a product with exactly that name
//! 2. SourceFile: the first product built from a source with exactly that name
//!
//! Both prefer products of the edge's platform when it has one. Paths with
//! a `*` are patterns and stay unresolved.

use crate::entry::{AssetId, ProductDependencyEntry, ProductEntry, UnresolvedDependencyType};
use crate::query::JobFilter;
use crate::storage::AssetDatabase;
use crate::Result;

/// Outcome for one unresolved edge
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionResult {
    Resolved {
        target: AssetId,
        strategy: ResolutionStrategy,
    },
    /// Path is a wildcard pattern; left for a pass that expands patterns.
    Deferred,
    /// Nothing matches yet
    Unresolved,
}

/// How a target was found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionStrategy {
    ProductName,
    SourceName,
}

/// Rewrites path-only product dependencies once their targets exist.
pub struct Resolver<'a> {
    db: &'a AssetDatabase,
}

impl<'a> Resolver<'a> {
    pub fn new(db: &'a AssetDatabase) -> Self {
        Self { db }
    }

    /// Resolve every unresolved edge in the store
    pub fn resolve_all(&self) -> Result<ResolverStats> {
        let mut pending = Vec::new();
        self.db.query_unresolved_product_dependencies(|edge| {
            pending.push(edge);
            true
        })?;

        let mut stats = ResolverStats {
            total: pending.len(),
            ..Default::default()
        };

        for mut edge in pending {
            match self.resolve_one(&edge)? {
                ResolutionResult::Resolved { target, strategy } => {
                    tracing::debug!(
                        "Resolved {} (product {}) to {}",
                        edge.unresolved_path,
                        edge.product_pk,
                        target
                    );
                    edge.resolve_to(target);
                    self.db.set_entry(&mut edge)?;

                    stats.resolved += 1;
                    match strategy {
                        ResolutionStrategy::ProductName => stats.by_product += 1,
                        ResolutionStrategy::SourceName => stats.by_source += 1,
                    }
                }
                ResolutionResult::Deferred => stats.deferred += 1,
                ResolutionResult::Unresolved => stats.unresolved += 1,
            }
        }

        Ok(stats)
    }

    /// Find the target of a single edge without modifying it.
    pub fn resolve_one(&self, edge: &ProductDependencyEntry) -> Result<ResolutionResult> {
        let path = edge.unresolved_path.as_str();
        if path.is_empty() {
            return Ok(ResolutionResult::Unresolved);
        }
        if path.contains('*') {
            return Ok(ResolutionResult::Deferred);
        }

        let filter = if edge.platform.is_empty() {
            JobFilter::default()
        } else {
            JobFilter::new().platform(edge.platform.as_str())
        };

        let (product, strategy) = match edge.dependency_type {
            UnresolvedDependencyType::ProductFile => (
                self.first_product(|h| self.db.query_products_by_name(path, &filter, h))?,
                ResolutionStrategy::ProductName,
            ),
            UnresolvedDependencyType::SourceFile => (
                self.first_product(|h| self.db.query_products_by_source_name(path, &filter, h))?,
                ResolutionStrategy::SourceName,
            ),
        };

        let Some(product) = product else {
            return Ok(ResolutionResult::Unresolved);
        };

        let mut source_guid = None;
        self.db.query_source_by_product_id(product.product_id, |source| {
            source_guid = Some(source.source_guid);
            false
        })?;

        Ok(match source_guid {
            Some(guid) => ResolutionResult::Resolved {
                target: AssetId::new(guid, product.sub_id),
                strategy,
            },
            None => ResolutionResult::Unresolved,
        })
    }

    fn first_product(
        &self,
        query: impl FnOnce(&mut dyn FnMut(ProductEntry) -> bool) -> Result<()>,
    ) -> Result<Option<ProductEntry>> {
        let mut found = None;
        query(&mut |product: ProductEntry| {
            found = Some(product);
            false
        })?;
        Ok(found)
    }
}

/// Statistics from resolution
#[derive(Debug, Default, Clone, serde::Serialize)]
pub struct ResolverStats {
    pub total: usize,
    pub resolved: usize,
    pub unresolved: usize,
    pub deferred: usize,
    pub by_product: usize,
    pub by_source: usize,
}

impl std::fmt::Display for ResolverStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Resolution Statistics:")?;
        writeln!(f, "  Total unresolved: {}", self.total)?;
        writeln!(f, "  Resolved: {}", self.resolved)?;
        writeln!(f, "    - By product name: {}", self.by_product)?;
        writeln!(f, "    - By source name: {}", self.by_source)?;
        writeln!(f, "  Deferred (patterns): {}", self.deferred)?;
        writeln!(f, "  Still unresolved: {}", self.unresolved)
    }
}
