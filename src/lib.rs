pub mod config;
pub mod content;
pub mod error;
pub mod export;
pub mod logging;
pub mod metrics;
pub mod report;
pub mod store;
pub mod util;
