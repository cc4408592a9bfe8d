pub mod project;
pub mod stats;
