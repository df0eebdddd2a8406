//! Clients for external REST APIs the service relays.

pub mod jsonplaceholder;

pub use jsonplaceholder::JsonPlaceholderClient;
