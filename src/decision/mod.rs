pub mod adaptation;
pub mod scorer;
pub mod templates;

pub use adaptation::{AdaptationPolicy, AdaptationRegistry};
pub use scorer::MethodologyScorer;
