pub mod analyze;
pub mod comprehensive;
pub mod config;
pub mod convert;
pub mod doctor;
pub mod mapping;
pub mod monitor;
pub mod news;
pub mod regions;
pub mod serve;
pub mod stats;
pub mod version;
