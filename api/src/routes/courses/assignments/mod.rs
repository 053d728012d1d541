//! Assignment submission, scoring and export for one class.

pub mod get;
pub mod post;
pub mod put;

pub use get::export_submissions;
pub use post::submit_assignment;
pub use put::register_scores;
