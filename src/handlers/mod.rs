// handlers/mod.rs - local server handlers
//
// Public (no auth): service descriptor and health
// Admin (bearer JWT): document listing through the shared proxy core

pub mod health;
pub mod list_files;

pub use health::{health, root};
pub use list_files::list_files;
