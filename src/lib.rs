pub mod compile;
pub mod config;
pub mod display;
pub mod errors;
pub mod logging;
pub mod parse;
pub mod pipeline;
pub mod render;
pub mod sweep;
pub mod types;
pub mod viewer;
pub mod workload;
