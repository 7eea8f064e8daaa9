pub mod batch;
pub mod browser;
pub mod cli;
pub mod options;
pub mod pdf;
pub mod viewport;
