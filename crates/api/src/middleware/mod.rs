pub mod connection;
pub mod error_detail;
