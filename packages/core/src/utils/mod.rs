//! Utility functions shared across layers

mod files;

pub use files::{format_file_size, is_accepted_image, is_image_file, unique_file_name};
