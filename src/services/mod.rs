use std::time::Duration;

pub mod enrichment;
pub mod extractor;
pub mod prompt;
pub mod providers;
pub mod recommendations;
pub mod resolver;

/// Bound on any single catalog call inside a fan-out phase, so one slow
/// lookup cannot stall the whole request
pub(crate) const CATALOG_CALL_TIMEOUT: Duration = Duration::from_secs(10);
