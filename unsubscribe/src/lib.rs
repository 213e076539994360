pub mod adapters;
pub mod configuration;
pub mod domain;
pub mod handler_response;
pub mod templates;
pub mod unsubscribe_handler;
pub mod utils;
