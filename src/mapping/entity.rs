//! Classification outcomes.

use crate::utils::config::{CORE_OPERATOR, SPECIAL_ADDRESS, UNDEFINED_MINER};
use std::fmt;

/// The entity a block is attributed to
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Entity {
    /// A real entity, or an unknown but explicit address or identifier
    Named(String),

    /// No reward signal at all
    UndefinedMiner,

    /// Reward signal present, but only special addresses
    SpecialAddress,

    /// Cardano block produced by the federated core nodes
    CoreOperator,
}

impl Entity {
    pub fn named(name: impl Into<String>) -> Self {
        Entity::Named(name.into())
    }

    /// Name written to output files
    pub fn name(&self) -> &str {
        match self {
            Entity::Named(name) => name,
            Entity::UndefinedMiner => UNDEFINED_MINER,
            Entity::SpecialAddress => SPECIAL_ADDRESS,
            Entity::CoreOperator => CORE_OPERATOR,
        }
    }

    pub fn is_sentinel(&self) -> bool {
        !matches!(self, Entity::Named(_))
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
