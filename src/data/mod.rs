pub mod annotations;
pub mod demo;
pub mod gamma_api;
pub mod types;
