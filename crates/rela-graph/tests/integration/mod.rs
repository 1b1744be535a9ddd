//! Integration tests module.

mod properties;
mod scenarios;
mod store;
