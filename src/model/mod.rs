pub mod config;
pub mod list;

pub use config::*;
pub use list::*;
