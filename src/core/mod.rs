// Core modules implementing type descriptors, the decode engine, resolvers, and error modeling.
pub mod choice;
pub mod classify;
pub mod config;
pub mod containers;
pub mod engine;
pub mod error;
pub mod kv;
pub mod record;
pub mod registry;
pub mod types;
pub mod union;
pub mod value;
