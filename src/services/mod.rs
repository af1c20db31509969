pub mod enrichment;
pub mod monitor;
pub mod report;
pub mod scanner;
pub mod signals;
pub mod store;
pub mod universe;

pub use enrichment::Enricher;
pub use monitor::{GuardOutcome, PositionGuard};
pub use report::{publish_scan, run_report, ReportOutcome};
pub use scanner::Scanner;
