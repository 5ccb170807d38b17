//! Core pipeline: acquisition, scoring, and classification

pub mod acquisition;
pub mod decision;
pub mod scoring;

pub use acquisition::ProfileFetcher;
pub use decision::{classify, Classification};
pub use scoring::{gini, hhi, score_profile, sync_index};
