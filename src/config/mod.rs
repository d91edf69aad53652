//! Configuration module
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use guidance_crawler::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("crawler.toml")).unwrap();
//! println!("Crawling {} search sets", config.search.len());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, OutputConfig, OutputFormat, UserAgentConfig, DEFAULT_BASE_URL,
};

// Re-export parser functions
pub use parser::{
    compute_config_hash, default_search, load_config, load_config_with_hash, parse_config,
    DEFAULT_PAGE_SIZE,
};
