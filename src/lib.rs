//! retail-inventory - A small, self-hostable inventory manager
//!
//! CRUD over a single product table, served as JSON over HTTP.

pub mod cli;
pub mod http_server;
pub mod inventory;
pub mod observability;
