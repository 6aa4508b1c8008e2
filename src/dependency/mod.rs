//! Dependency Resolver - what a product depends on
//!
//! - direct and transitive product dependencies (`traversal`)
//! - late binding of edges recorded by path (`resolver`)

mod traversal;
pub mod resolver;

pub use resolver::{ResolutionResult, ResolutionStrategy, Resolver, ResolverStats};
