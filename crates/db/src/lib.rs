pub mod connection;
pub mod finder;
pub mod fixtures;
pub mod migrations;
pub mod repositories;

pub use connection::{connect, connect_with_settings, DbPool};
pub use finder::{check_integrity, IntegrityReport, MountFinder, UnresolvedClamps};
pub use fixtures::{CatalogSeedDataset, SeedResult, TableSeedInfo, VerificationResult};
pub use repositories::{
    CatalogSnapshot, CatalogStore, InMemoryCatalogStore, RepositoryError, SqlCatalogStore,
};
