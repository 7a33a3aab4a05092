pub mod config;
pub mod logging;

pub mod content_db;
pub mod domain_cache;
pub mod finder;
pub mod links;
pub mod probe;
pub mod renames;
