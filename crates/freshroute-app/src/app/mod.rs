//! Application use cases

pub mod logistics_service;
