//! Attribution of blocks to the entities that produced them.

pub mod classifier;
pub mod entity;

pub use classifier::Classifier;
pub use entity::Entity;
