//! Partitioned-collection seeding and query benchmark core.
//!
//! The flow is three phases against one collection: [`CollectionProvisioner`]
//! establishes a clean partitioned collection, [`DocumentSeeder`] populates
//! it with deterministic per-team records, and [`QueryBenchmark`] times the
//! raw-statement and structured query paths over the settled dataset and
//! cross-checks their results.

pub mod bench;
pub mod config;
pub mod error;
pub mod provision;
pub mod record;
pub mod report;
pub mod seed;

pub use bench::{BenchOutcome, QueryBenchmark, QueryOutcome};
pub use config::Config;
pub use error::{BenchError, Result};
pub use provision::CollectionProvisioner;
pub use record::DowntimeRecord;
pub use report::BenchReport;
pub use seed::DocumentSeeder;
