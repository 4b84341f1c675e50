//! Per-block entity classification.
//!
//! Rules, first match wins:
//! 1. a known identifier carried by the block
//! 2. the block's reward addresses, minus special addresses
//! 3. a sentinel for blocks without any reward signal
//!
//! Ledgers whose raw data differs get their own strategy. Every strategy
//! normalizes named results through the link mapping.

use super::entity::Entity;
use crate::identity::{IdentityData, LinkMapping};
use crate::parser::Block;
use log::warn;
use std::collections::BTreeSet;

/// Classification strategy, selected by ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classifier {
    /// Identifier substring match, then all reward addresses combined
    Default,

    /// No identifiers; at most one reward address per block (Tezos)
    SingleAddress,

    /// Exact pool identifier match, single reward address, and a core
    /// operator sentinel for blocks without either (Cardano)
    PoolIdentifier,
}

impl Classifier {
    /// Strategy for a ledger
    pub fn for_ledger(ledger: &str) -> Self {
        match ledger {
            "tezos" => Classifier::SingleAddress,
            "cardano" => Classifier::PoolIdentifier,
            _ => Classifier::Default,
        }
    }

    /// Attribute one block to an entity
    ///
    /// **Public** - main entry point for classification
    pub fn classify(&self, block: &Block, identity: &IdentityData, links: &LinkMapping) -> Entity {
        let entity = self
            .from_identifiers(block, identity)
            .or_else(|| self.from_addresses(block, identity, links))
            .unwrap_or_else(|| self.without_signal());

        match entity {
            Entity::Named(name) => Entity::Named(links.normalize(&name)),
            sentinel => sentinel,
        }
    }

    fn from_identifiers(&self, block: &Block, identity: &IdentityData) -> Option<Entity> {
        let identifier = block.identifier()?;
        match self {
            Classifier::Default => identity.identifier_within(identifier).map(Entity::named),
            Classifier::SingleAddress => None,
            Classifier::PoolIdentifier => Some(Entity::named(
                identity.identifier_exact(identifier).unwrap_or(identifier),
            )),
        }
    }

    fn from_addresses(
        &self,
        block: &Block,
        identity: &IdentityData,
        links: &LinkMapping,
    ) -> Option<Entity> {
        let raw = block.reward_addresses()?;
        let effective: Vec<&str> = raw
            .iter()
            .map(String::as_str)
            .filter(|address| !identity.is_special(address))
            .collect();

        let Some(&first) = effective.first() else {
            return Some(Entity::SpecialAddress);
        };

        let entity = match self {
            Classifier::Default => combine_addresses(block, &effective, identity, links),
            Classifier::SingleAddress | Classifier::PoolIdentifier => {
                identity.address_owner(first).unwrap_or(first).to_string()
            }
        };
        Some(Entity::Named(entity))
    }

    fn without_signal(&self) -> Entity {
        match self {
            Classifier::PoolIdentifier => Entity::CoreOperator,
            Classifier::Default | Classifier::SingleAddress => Entity::UndefinedMiner,
        }
    }
}

/// Combine every effective reward address into one entity name
///
/// Known addresses win over unknown ones. Several distinct entities, or
/// several unknown addresses, are joined with `/` in sorted order.
fn combine_addresses(
    block: &Block,
    addresses: &[&str],
    identity: &IdentityData,
    links: &LinkMapping,
) -> String {
    let known: BTreeSet<String> = addresses
        .iter()
        .filter_map(|address| identity.address_owner(address))
        .map(|name| links.normalize(name))
        .collect();

    match known.len() {
        0 => {
            let unknown: BTreeSet<&str> = addresses.iter().copied().collect();
            unknown.into_iter().collect::<Vec<_>>().join("/")
        }
        1 => known.into_iter().next().unwrap_or_default(),
        _ => {
            let joined = known.into_iter().collect::<Vec<_>>().join("/");
            warn!("Block {} pays several known entities: {}", block.number, joined);
            joined
        }
    }
}
