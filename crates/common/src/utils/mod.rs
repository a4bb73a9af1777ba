//! Common utility functions
//!
//! - **[`bytes`]**: human-readable byte counts

pub mod bytes;

pub use self::bytes::format_byte_count;
