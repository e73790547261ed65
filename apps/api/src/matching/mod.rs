pub mod comparator;
pub mod report;
pub mod similarity;

pub use comparator::{compare_requirements, ComparisonResult};
pub use report::GapReport;
pub use similarity::{SimilarityScorer, TfIdfSimilarity};
