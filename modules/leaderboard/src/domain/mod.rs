pub mod error;
pub mod ranking;
pub mod repo;
pub mod service;
