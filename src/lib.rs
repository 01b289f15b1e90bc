pub mod config;
pub mod content;
pub mod error;
pub mod layout;
pub mod logger;
pub mod render;
pub mod server;
pub mod site_builder;
pub mod util;
mod view;
#[cfg(test)]
mod test_data;

pub use error::BuildError;
pub use site_builder::{build, BuildStage, BuildSummary, SiteBuilder};
