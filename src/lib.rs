//! Purpose: Library crate behind the `strto` CLI: type-directed string decoding.
//! Exports: `api` (stable surface), `catalog` (default leaf decoders), `core` (engine and
//!          resolvers), `source` (file indirection), `type_expr` (type-expression parser).
//! Role: Shared by the CLI binary and integration tests; `api` is the supported entry point.
//! Invariants: No global registries; every decoder owns its registry and config.
//! Invariants: Core modules prefer explicit inputs/outputs over hidden state.
pub mod api;
pub mod catalog;
pub mod core;
mod json;
pub mod source;
pub mod type_expr;
