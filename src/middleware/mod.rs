pub mod auth;
pub mod response;

pub use auth::jwt_claims_middleware;
pub use response::{ProxyResponse, ALLOW_ORIGIN_HEADER};
