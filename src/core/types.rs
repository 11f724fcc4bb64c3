//! Purpose: Describe decode targets as an explicit, closed set of type shapes.
//! Exports: `TypeDesc`, `LeafType`, `ContainerKind`, `MappingKind`, `LiteralValue`,
//!          `EnumDesc`, `RecordDesc`, `FieldDesc`, `RecordFlavor`, `ExtraFields`, `Finisher`.
//! Role: Registry key and classifier input; replaces runtime reflection with data.
//! Invariants: Descriptors are immutable values; equality/hash are structural except
//!             records, whose identity is `(name, flavor)`.
//! Invariants: `Display` renders the type-expression grammar accepted by `type_expr`.
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::core::value::{Record, Value};

/// Identities of leaf types; the default catalog registers every non-custom variant.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum LeafType {
    Str,
    Int,
    Float,
    Bool,
    Bytes,
    Fraction,
    Path,
    Date,
    DateTime,
    Time,
    Duration,
    Range,
    Slice,
    None,
    Any,
    List,
    Tuple,
    Set,
    FrozenSet,
    Deque,
    Dict,
    OrderedDict,
    Custom(String),
}

impl LeafType {
    pub const BUILTIN: [LeafType; 22] = [
        LeafType::Str,
        LeafType::Int,
        LeafType::Float,
        LeafType::Bool,
        LeafType::Bytes,
        LeafType::Fraction,
        LeafType::Path,
        LeafType::Date,
        LeafType::DateTime,
        LeafType::Time,
        LeafType::Duration,
        LeafType::Range,
        LeafType::Slice,
        LeafType::None,
        LeafType::Any,
        LeafType::List,
        LeafType::Tuple,
        LeafType::Set,
        LeafType::FrozenSet,
        LeafType::Deque,
        LeafType::Dict,
        LeafType::OrderedDict,
    ];

    pub fn name(&self) -> &str {
        match self {
            LeafType::Str => "str",
            LeafType::Int => "int",
            LeafType::Float => "float",
            LeafType::Bool => "bool",
            LeafType::Bytes => "bytes",
            LeafType::Fraction => "fraction",
            LeafType::Path => "path",
            LeafType::Date => "date",
            LeafType::DateTime => "datetime",
            LeafType::Time => "time",
            LeafType::Duration => "duration",
            LeafType::Range => "range",
            LeafType::Slice => "slice",
            LeafType::None => "none",
            LeafType::Any => "any",
            LeafType::List => "list",
            LeafType::Tuple => "tuple",
            LeafType::Set => "set",
            LeafType::FrozenSet => "frozenset",
            LeafType::Deque => "deque",
            LeafType::Dict => "dict",
            LeafType::OrderedDict => "ordereddict",
            LeafType::Custom(name) => name,
        }
    }

    pub fn from_name(name: &str) -> Option<LeafType> {
        LeafType::BUILTIN.into_iter().find(|leaf| leaf.name() == name)
    }
}

/// Homogeneous-element containers.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum ContainerKind {
    List,
    Deque,
    Set,
    FrozenSet,
}

impl ContainerKind {
    pub fn name(self) -> &'static str {
        match self {
            ContainerKind::List => "list",
            ContainerKind::Deque => "deque",
            ContainerKind::Set => "set",
            ContainerKind::FrozenSet => "frozenset",
        }
    }

    /// The unparametrized leaf identity of this container.
    pub fn bare(self) -> LeafType {
        match self {
            ContainerKind::List => LeafType::List,
            ContainerKind::Deque => LeafType::Deque,
            ContainerKind::Set => LeafType::Set,
            ContainerKind::FrozenSet => LeafType::FrozenSet,
        }
    }

    pub fn is_unordered(self) -> bool {
        matches!(self, ContainerKind::Set | ContainerKind::FrozenSet)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum MappingKind {
    Dict,
    OrderedDict,
}

impl MappingKind {
    pub fn name(self) -> &'static str {
        match self {
            MappingKind::Dict => "dict",
            MappingKind::OrderedDict => "ordereddict",
        }
    }

    pub fn bare(self) -> LeafType {
        match self {
            MappingKind::Dict => LeafType::Dict,
            MappingKind::OrderedDict => LeafType::OrderedDict,
        }
    }
}

/// A literal constant allowed in a restricted-choice type.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum LiteralValue {
    Int(i64),
    Str(String),
    Bytes(Vec<u8>),
    Bool(bool),
}

impl LiteralValue {
    pub fn to_value(&self) -> Value {
        match self {
            LiteralValue::Int(n) => Value::Int(*n),
            LiteralValue::Str(s) => Value::Str(s.clone()),
            LiteralValue::Bytes(b) => Value::Bytes(b.clone()),
            LiteralValue::Bool(b) => Value::Bool(*b),
        }
    }
}

impl fmt::Display for LiteralValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LiteralValue::Int(n) => write!(f, "{n}"),
            LiteralValue::Str(s) => write!(f, "{s:?}"),
            LiteralValue::Bytes(b) => write!(f, "b{:?}", String::from_utf8_lossy(b)),
            LiteralValue::Bool(b) => write!(f, "{b}"),
        }
    }
}

/// A closed set of named members, each with an optional literal payload.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct EnumDesc {
    pub name: String,
    pub members: Vec<(String, Option<LiteralValue>)>,
}

impl EnumDesc {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: Vec::new(),
        }
    }

    pub fn member(mut self, name: impl Into<String>) -> Self {
        self.members.push((name.into(), None));
        self
    }

    pub fn member_with_value(mut self, name: impl Into<String>, value: LiteralValue) -> Self {
        self.members.push((name.into(), Some(value)));
        self
    }

    pub fn member_names(&self) -> Vec<&str> {
        self.members.iter().map(|(name, _)| name.as_str()).collect()
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum RecordFlavor {
    /// Lightweight declared-field record.
    Plain,
    /// Validated model with a validation entry point.
    Model,
    /// Arbitrary constructible type; only decoded when explicitly enabled.
    Constructed,
}

/// What happens to source keys that match no declared field.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum ExtraFields {
    Reject,
    Ignore,
    /// Unmatched raw keys are gathered into a map stored under this field name.
    Collect(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldDesc {
    pub name: String,
    pub ty: TypeDesc,
    pub default: Option<Value>,
}

impl FieldDesc {
    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }
}

/// Final construction step for model/constructed records.
pub type Finisher = Arc<dyn Fn(Record) -> Result<Value, String> + Send + Sync>;

#[derive(Clone)]
pub struct RecordDesc {
    pub name: String,
    pub flavor: RecordFlavor,
    pub fields: Vec<FieldDesc>,
    pub extra: ExtraFields,
    pub finish: Option<Finisher>,
}

impl RecordDesc {
    pub fn plain(name: impl Into<String>) -> Self {
        Self::with_flavor(name, RecordFlavor::Plain, ExtraFields::Reject)
    }

    pub fn model(name: impl Into<String>) -> Self {
        Self::with_flavor(name, RecordFlavor::Model, ExtraFields::Ignore)
    }

    pub fn constructed(name: impl Into<String>) -> Self {
        Self::with_flavor(name, RecordFlavor::Constructed, ExtraFields::Reject)
    }

    fn with_flavor(name: impl Into<String>, flavor: RecordFlavor, extra: ExtraFields) -> Self {
        Self {
            name: name.into(),
            flavor,
            fields: Vec::new(),
            extra,
            finish: None,
        }
    }

    pub fn field(mut self, name: impl Into<String>, ty: TypeDesc) -> Self {
        self.fields.push(FieldDesc {
            name: name.into(),
            ty,
            default: None,
        });
        self
    }

    pub fn field_with_default(
        mut self,
        name: impl Into<String>,
        ty: TypeDesc,
        default: Value,
    ) -> Self {
        self.fields.push(FieldDesc {
            name: name.into(),
            ty,
            default: Some(default),
        });
        self
    }

    pub fn extra(mut self, extra: ExtraFields) -> Self {
        self.extra = extra;
        self
    }

    /// Validation entry point for `Model` records.
    pub fn validator<F>(mut self, validate: F) -> Self
    where
        F: Fn(Record) -> Result<Value, String> + Send + Sync + 'static,
    {
        self.finish = Some(Arc::new(validate));
        self
    }

    /// Constructor for `Constructed` records.
    pub fn constructor<F>(self, construct: F) -> Self
    where
        F: Fn(Record) -> Result<Value, String> + Send + Sync + 'static,
    {
        self.validator(construct)
    }

    pub fn field_desc(&self, name: &str) -> Option<&FieldDesc> {
        self.fields.iter().find(|field| field.name == name)
    }
}

impl fmt::Debug for RecordDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordDesc")
            .field("name", &self.name)
            .field("flavor", &self.flavor)
            .field("fields", &self.fields)
            .field("extra", &self.extra)
            .field("finish", &self.finish.is_some())
            .finish()
    }
}

impl PartialEq for RecordDesc {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.flavor == other.flavor
    }
}

impl Eq for RecordDesc {}

impl Hash for RecordDesc {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.flavor.hash(state);
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum TypeDesc {
    Leaf(LeafType),
    Container {
        kind: ContainerKind,
        item: Box<TypeDesc>,
    },
    Mapping {
        kind: MappingKind,
        key: Box<TypeDesc>,
        value: Box<TypeDesc>,
    },
    /// Fixed arity, one type per position.
    Tuple(Vec<TypeDesc>),
    /// `tuple[T, ...]` and `tuple[T]`.
    VariadicTuple(Box<TypeDesc>),
    Union(Vec<TypeDesc>),
    Literal(Vec<LiteralValue>),
    Enum(EnumDesc),
    Record(RecordDesc),
    /// Named alias or annotated type; resolves to `target` unless registered itself.
    Alias {
        name: String,
        target: Box<TypeDesc>,
    },
    /// A named identity without structure.
    Opaque(String),
}

impl TypeDesc {
    pub fn str() -> Self {
        TypeDesc::Leaf(LeafType::Str)
    }

    pub fn int() -> Self {
        TypeDesc::Leaf(LeafType::Int)
    }

    pub fn float() -> Self {
        TypeDesc::Leaf(LeafType::Float)
    }

    pub fn bool() -> Self {
        TypeDesc::Leaf(LeafType::Bool)
    }

    pub fn none() -> Self {
        TypeDesc::Leaf(LeafType::None)
    }

    pub fn any() -> Self {
        TypeDesc::Leaf(LeafType::Any)
    }

    pub fn custom(name: impl Into<String>) -> Self {
        TypeDesc::Leaf(LeafType::Custom(name.into()))
    }

    pub fn list(item: TypeDesc) -> Self {
        TypeDesc::Container {
            kind: ContainerKind::List,
            item: Box::new(item),
        }
    }

    pub fn set(item: TypeDesc) -> Self {
        TypeDesc::Container {
            kind: ContainerKind::Set,
            item: Box::new(item),
        }
    }

    pub fn container(kind: ContainerKind, item: TypeDesc) -> Self {
        TypeDesc::Container {
            kind,
            item: Box::new(item),
        }
    }

    pub fn dict(key: TypeDesc, value: TypeDesc) -> Self {
        TypeDesc::Mapping {
            kind: MappingKind::Dict,
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    /// A single item type means "any length, every item of that type", like `tuple[T]`.
    pub fn tuple(mut items: Vec<TypeDesc>) -> Self {
        if items.len() == 1 {
            return TypeDesc::variadic_tuple(items.remove(0));
        }
        TypeDesc::Tuple(items)
    }

    pub fn variadic_tuple(item: TypeDesc) -> Self {
        TypeDesc::VariadicTuple(Box::new(item))
    }

    pub fn union(members: Vec<TypeDesc>) -> Self {
        TypeDesc::Union(members)
    }

    pub fn optional(inner: TypeDesc) -> Self {
        TypeDesc::Union(vec![inner, TypeDesc::none()])
    }

    pub fn literal(choices: Vec<LiteralValue>) -> Self {
        TypeDesc::Literal(choices)
    }

    pub fn alias(name: impl Into<String>, target: TypeDesc) -> Self {
        TypeDesc::Alias {
            name: name.into(),
            target: Box::new(target),
        }
    }
}

impl From<LeafType> for TypeDesc {
    fn from(leaf: LeafType) -> Self {
        TypeDesc::Leaf(leaf)
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, items: &[TypeDesc], sep: &str) -> fmt::Result {
    for (idx, item) in items.iter().enumerate() {
        if idx > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

impl fmt::Display for TypeDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDesc::Leaf(leaf) => f.write_str(leaf.name()),
            TypeDesc::Container { kind, item } => write!(f, "{}[{item}]", kind.name()),
            TypeDesc::Mapping { kind, key, value } => {
                write!(f, "{}[{key}, {value}]", kind.name())
            }
            TypeDesc::Tuple(items) => {
                f.write_str("tuple[")?;
                write_joined(f, items, ", ")?;
                f.write_str("]")
            }
            TypeDesc::VariadicTuple(item) => write!(f, "tuple[{item}, ...]"),
            TypeDesc::Union(members) => write_joined(f, members, " | "),
            TypeDesc::Literal(choices) => {
                f.write_str("literal[")?;
                for (idx, choice) in choices.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{choice}")?;
                }
                f.write_str("]")
            }
            TypeDesc::Enum(desc) => f.write_str(&desc.name),
            TypeDesc::Record(desc) => f.write_str(&desc.name),
            TypeDesc::Alias { name, .. } => f.write_str(name),
            TypeDesc::Opaque(name) => f.write_str(name),
        }
    }
}
