//! File output for scan results.

pub mod point_cloud;

pub use point_cloud::write_csv;
