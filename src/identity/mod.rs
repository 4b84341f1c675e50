//! Identity data sources and ownership link resolution.
//!
//! This module handles:
//! - Loading known identifiers, addresses and special addresses
//! - Loading cluster and legal-link ownership claims
//! - Resolving claims into a collapsed link mapping, with a bounded cache

pub mod cache;
pub mod links;
pub mod sources;

// Re-export main types and functions
pub use cache::LinkCache;
pub use links::{resolve_claims, resolve_links, LinkMapping, LinkResolver};
pub use sources::{Claim, IdentityData, MappingInfo};
