pub mod benefits;
pub mod client;
pub mod report;
pub mod runner;
pub mod schema;
pub mod utils;

// Re-export common items
pub use report::generate_report;
pub use runner::{ConformanceRunner, SuiteReport};
pub use utils::config::SuiteConfig;
