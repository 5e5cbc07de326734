pub mod config;
pub mod resource;

pub use config::*;
pub use resource::{LanguageTag, Resource, ResourceItem, Translation};
