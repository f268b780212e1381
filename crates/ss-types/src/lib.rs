pub mod config;
pub mod errors;
pub mod report;
pub mod task;

pub use config::*;
pub use errors::*;
pub use report::*;
pub use task::*;
