pub mod analyze;
pub mod api;
pub mod cli;
pub mod collect;
pub mod config;
pub mod convert;
pub mod error;
pub mod ops;
pub mod output;
pub mod progress;
pub mod serve;
