// src/models/mod.rs

pub mod profile;
pub mod quiz;
pub mod thread;
pub mod topic;
