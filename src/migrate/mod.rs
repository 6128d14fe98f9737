//! Migration orchestration and reporting

pub mod config;
pub mod pipeline;
pub mod report;

pub use config::{KodiTimeZone, MigrationConfig};
pub use pipeline::MigrationPipeline;
pub use report::{RecordOutcome, RecordReport, Report, Summary};
