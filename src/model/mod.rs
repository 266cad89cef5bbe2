pub mod app;
pub mod config;
pub mod project;
pub mod sort;
pub mod task;

pub use app::*;
pub use config::*;
pub use project::*;
pub use sort::*;
pub use task::*;
