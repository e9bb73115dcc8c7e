pub mod auth;
pub mod quota;

pub use auth::*;
pub use quota::*;
