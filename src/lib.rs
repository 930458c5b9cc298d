// Library for tests to access modules

pub mod comparator;
pub mod config;
pub mod cycle;
pub mod error;
pub mod extractor;
pub mod models;
pub mod notify;
pub mod snapshot_repo;
pub mod version;
pub mod worker;
