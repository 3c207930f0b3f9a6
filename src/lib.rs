pub mod api_doc;
pub mod authentication;
pub mod configuration;
pub mod domain;
pub mod formatters;
pub mod repository;
pub mod routes;
pub mod services;
pub mod startup;
pub mod telemetry;
pub mod wrappers;
