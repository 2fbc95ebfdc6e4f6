//! Clients for services the scorer collaborates with.

pub mod backend;
