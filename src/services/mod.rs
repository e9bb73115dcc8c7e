pub mod cache;
pub mod nutrition;

pub use cache::ResponseCache;
pub use nutrition::NutritionClient;
