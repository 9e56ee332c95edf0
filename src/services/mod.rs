pub mod encoding;
pub mod prompt;
pub mod report;
pub mod submission;
pub mod transfer;
pub mod validation;
pub mod workers_ai;
