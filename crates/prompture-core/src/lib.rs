pub mod clean;
pub mod clock;
pub mod config;
pub mod confirm;
pub mod context;
pub mod error;
pub mod io;
pub mod organize;
pub mod paths;
pub mod policy;
pub mod summary;
pub mod templates;
pub mod week;

pub use error::{PromptureError, Result};
