//! Hosted source helpers

pub mod link;

pub use link::raw_file_url;
