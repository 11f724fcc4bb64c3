//! Purpose: Define the stable public Rust API boundary for strto.
//! Exports: Decoder engine, registry, type descriptors, values, errors and typed extraction.
//! Role: Public, additive-only surface; the CLI and integration tests only import from here.
//! Invariants: Resolver internals (classifier, union/record/container helpers) stay private.
//! Invariants: Every re-exported item is usable without reaching into `core` paths.

mod decodable;

pub use crate::catalog::default_catalog;
pub use crate::catalog::numexpr::{EvalError, eval_float, eval_int};
pub use crate::core::config::DecoderConfig;
pub use crate::core::engine::{BoundDecoder, Decoder};
#[doc(hidden)]
pub use crate::core::error::to_exit_code;
pub use crate::core::error::{Error, ErrorKind};
pub use crate::core::kv::parse_assignments;
pub use crate::core::registry::{DecoderRegistry, LeafDecoder, from_text};
pub use crate::core::types::{
    ContainerKind, EnumDesc, ExtraFields, FieldDesc, Finisher, LeafType, LiteralValue,
    MappingKind, RecordDesc, RecordFlavor, TypeDesc,
};
pub use crate::core::value::{Fraction, Map, RangeValue, Record, SliceValue, Value};
pub use crate::type_expr::parse_type;
pub use decodable::{Decodable, RecordFields};
