//! Operational tooling: a live collection monitor and an environment doctor.

pub mod doctor;
pub mod monitor;
