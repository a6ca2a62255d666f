pub mod app;
pub mod audit;
pub mod config;
pub mod parser;
pub mod report;
pub mod version;
