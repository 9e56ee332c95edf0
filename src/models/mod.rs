pub mod herb;
pub mod report;
