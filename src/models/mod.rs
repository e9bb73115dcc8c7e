pub mod food;
pub mod usage;
pub mod user;

pub use food::*;
pub use usage::*;
pub use user::*;
