pub mod catalog_service;
pub mod network_service;
