pub mod cache;
pub mod config;
pub mod gpa_cache;
pub mod singleflight;
pub mod state;
pub mod test_helpers;
