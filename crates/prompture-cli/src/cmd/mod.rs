pub mod clean;
pub mod context;
pub mod docs;
pub mod gitignore;
pub mod init;
pub mod summary;
