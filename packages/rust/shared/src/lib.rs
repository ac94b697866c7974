//! Shared types, error model, and configuration for firmscope.
//!
//! This crate is the foundation depended on by all other firmscope crates.
//! It provides:
//! - [`FirmscopeError`], the unified error type
//! - Domain types ([`CompanyProfile`], [`DiscoveredDocument`], [`ProcurementContract`])
//! - [`Outcome`] for optional sources that degrade instead of failing
//! - Configuration ([`AppConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, DocumentVocabulary, DocumentsConfig, LinkStem, ProcurementConfig, RegistryConfig,
    config_dir, config_file_path, init_config, load_config, load_config_from, validate_config,
};
pub use error::{FirmscopeError, Result};
pub use types::{
    CompanyProfile, CompanyStatus, ContractCustomer, ContractStatus, DiscoveredDocument,
    DocumentSummary, DocumentType, NOT_PROVIDED, Outcome, ProcurementContract,
    ProcurementSummary, RegistryNumber, UNKNOWN_NAME,
};
