pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod lambda;
pub mod middleware;
pub mod proxy;
pub mod server;
pub mod storage;
pub mod types;

pub use proxy::ListingProxy;
