//! Resolution of ownership claims into a single-hop link mapping.
//!
//! Claims come from the ledger's cluster file and from the legal links
//! shared by every ledger. Only claims whose validity window overlaps the
//! requested timeframe take part. Chains (`A` owned by `B` owned by `C`)
//! are collapsed so every claimant points at its final owner.

use super::cache::LinkCache;
use super::sources::{Claim, MappingInfo};
use crate::utils::config::LINK_CACHE_CAPACITY;
use crate::utils::error::LinkError;
use crate::utils::timeframe::Timeframe;
use log::{debug, warn};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Claimant -> final owner, valid for one ledger and timeframe
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkMapping {
    owners: HashMap<String, String>,
}

impl LinkMapping {
    /// Final owner of `name`, if `name` is owned by someone else
    pub fn owner_of(&self, name: &str) -> Option<&str> {
        self.owners.get(name).map(String::as_str)
    }

    /// `name` replaced by its final owner, or unchanged
    pub fn normalize(&self, name: &str) -> String {
        self.owner_of(name).unwrap_or(name).to_string()
    }

    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }
}

impl FromIterator<(String, String)> for LinkMapping {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            owners: iter.into_iter().collect(),
        }
    }
}

/// Resolve a sequence of claims for a timeframe
///
/// **Public** - pure core of link resolution
///
/// Claims are applied in order; a later claim for the same claimant
/// overwrites an earlier one.
///
/// # Errors
/// * `LinkError::CircularOwnership` - an ownership chain loops
/// * `LinkError::Timeframe` - a claim window is not a valid timeframe
pub fn resolve_claims<'a, I>(claims: I, timeframe: &Timeframe) -> Result<LinkMapping, LinkError>
where
    I: IntoIterator<Item = &'a Claim>,
{
    let mut links: HashMap<String, String> = HashMap::new();

    for claim in claims {
        if !claim.window()?.overlaps(timeframe) {
            continue;
        }
        if let Some(previous) = links.insert(claim.claimant.clone(), claim.owner.clone()) {
            if previous != claim.owner {
                warn!(
                    "Overlapping claims for {} during {}: {} replaced by {}",
                    claim.claimant, timeframe, previous, claim.owner
                );
            }
        }
    }

    let mut owners = HashMap::with_capacity(links.len());
    for (claimant, owner) in &links {
        let owner = final_owner(&links, claimant, owner)?;
        if owner != claimant.as_str() {
            owners.insert(claimant.clone(), owner.to_string());
        }
    }

    Ok(LinkMapping { owners })
}

/// Follow `owner` through `links` until the chain ends
///
/// A name that maps to itself ends the chain. Returning to a name already
/// seen on the walk is a cycle.
fn final_owner<'a>(
    links: &'a HashMap<String, String>,
    claimant: &'a str,
    owner: &'a str,
) -> Result<&'a str, LinkError> {
    let mut visited: HashSet<&str> = HashSet::from([claimant]);
    let mut current = owner;

    while let Some(next) = links.get(current) {
        if next == current {
            break;
        }
        visited.insert(current);
        if visited.contains(next.as_str()) {
            return Err(LinkError::CircularOwnership {
                claimant: claimant.to_string(),
                owner: current.to_string(),
            });
        }
        current = next;
    }

    Ok(current)
}

/// Resolve the link mapping of a ledger for a timeframe, without caching
///
/// Cluster claims are applied first, then legal links.
pub fn resolve_links(
    info: &MappingInfo,
    ledger: &str,
    timeframe: &Timeframe,
) -> Result<LinkMapping, LinkError> {
    let clusters = info.cluster_claims(ledger)?;
    let legal = info.legal_link_claims()?;
    let mapping = resolve_claims(clusters.iter().chain(legal.iter()), timeframe)?;

    debug!(
        "Resolved {} links for {} during {} ({} claims)",
        mapping.len(),
        ledger,
        timeframe,
        clusters.len() + legal.len()
    );

    Ok(mapping)
}

/// Link resolution with a bounded cache of recent results
#[derive(Debug)]
pub struct LinkResolver {
    info: MappingInfo,
    cache: LinkCache,
}

impl LinkResolver {
    pub fn new(info: MappingInfo) -> Self {
        Self::with_capacity(info, LINK_CACHE_CAPACITY)
    }

    pub fn with_capacity(info: MappingInfo, capacity: usize) -> Self {
        Self {
            info,
            cache: LinkCache::new(capacity),
        }
    }

    pub fn mapping_info(&self) -> &MappingInfo {
        &self.info
    }

    /// Resolve links for a ledger and timeframe, reusing cached results
    pub fn resolve_links(
        &mut self,
        ledger: &str,
        timeframe: &Timeframe,
    ) -> Result<Arc<LinkMapping>, LinkError> {
        if let Some(mapping) = self.cache.get(ledger, timeframe) {
            return Ok(mapping);
        }

        let mapping = Arc::new(resolve_links(&self.info, ledger, timeframe)?);
        self.cache.insert(ledger, *timeframe, Arc::clone(&mapping));
        Ok(mapping)
    }

    /// Resolve links for a timeframe string such as `"2021"` or `"2021-06"`
    pub fn resolve_timeframe(
        &mut self,
        ledger: &str,
        timeframe: &str,
    ) -> Result<Arc<LinkMapping>, LinkError> {
        let timeframe = Timeframe::parse(timeframe)?;
        self.resolve_links(ledger, &timeframe)
    }

    pub fn cached(&self) -> usize {
        self.cache.len()
    }
}
