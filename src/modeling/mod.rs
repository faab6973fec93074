pub mod mastery;
pub mod progress;
pub mod style;

pub use mastery::{MasteryEstimate, MasteryEstimator};
pub use progress::ProgressTracker;
pub use style::StyleAnalyzer;
