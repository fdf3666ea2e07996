//! Configuration module for Threadcast
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files that describe the forum source, crawl limits, output sink, and the
//! categories to crawl.

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    CategoryConfig, Config, CrawlerConfig, OutputConfig, S3Config, SourceConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
