//! Purpose: Parse compact type expressions such as `dict[str, int | float]` into `TypeDesc`.
//! Exports: `parse_type`, plus `TypeDesc::parse` and `FromStr for TypeDesc`.
//! Role: Text front end for the CLI and for callers that configure types from strings.
//! Invariants: `parse_type(&ty.to_string())` reproduces `ty` for leaf, container, mapping,
//!             tuple, union and literal descriptors.
//! Invariants: Unknown bare names become `Opaque`; malformed syntax is a `Usage` error.
use std::str::FromStr;

use crate::core::error::{Error, ErrorKind};
use crate::core::types::{ContainerKind, LeafType, LiteralValue, MappingKind, TypeDesc};

const SYNTAX_HINT: &str = "examples: int, list[int], dict[str, int | float], tuple[int, ...], literal[1, \"a\"]";

const MAX_NESTING: usize = 200;

struct Cursor<'a> {
    input: &'a str,
    pos: usize,
    depth: usize,
}

impl<'a> Cursor<'a> {
    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn skip_ws(&mut self) {
        let trimmed = self.rest().trim_start();
        self.pos = self.input.len() - trimmed.len();
    }

    fn peek(&mut self) -> Option<char> {
        self.skip_ws();
        self.rest().chars().next()
    }

    fn eat(&mut self, ch: char) -> bool {
        if self.peek() == Some(ch) {
            self.pos += ch.len_utf8();
            true
        } else {
            false
        }
    }

    fn eat_str(&mut self, token: &str) -> bool {
        self.skip_ws();
        if self.rest().starts_with(token) {
            self.pos += token.len();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, ch: char) -> Result<(), Error> {
        if self.eat(ch) {
            Ok(())
        } else {
            Err(self.error(format!("expected `{ch}`")))
        }
    }

    fn error(&self, message: impl Into<String>) -> Error {
        Error::new(ErrorKind::Usage)
            .with_message(format!("{} at offset {} in type `{}`", message.into(), self.pos, self.input))
            .with_hint(SYNTAX_HINT)
    }

    fn ident(&mut self) -> Result<&'a str, Error> {
        self.skip_ws();
        let rest = self.rest();
        let len = rest
            .find(|c: char| !(c.is_alphanumeric() || c == '_' || c == '.'))
            .unwrap_or(rest.len());
        if len == 0 {
            return Err(self.error("expected a type name"));
        }
        self.pos += len;
        Ok(&rest[..len])
    }

    fn union(&mut self) -> Result<TypeDesc, Error> {
        let mut members = vec![self.member()?];
        while self.eat('|') {
            members.push(self.member()?);
        }
        Ok(if members.len() == 1 {
            members.remove(0)
        } else {
            TypeDesc::Union(members)
        })
    }

    fn type_list(&mut self) -> Result<(Vec<TypeDesc>, bool), Error> {
        let mut items = Vec::new();
        let mut variadic = false;
        loop {
            if self.eat_str("...") {
                variadic = true;
                break;
            }
            items.push(self.union()?);
            if !self.eat(',') {
                break;
            }
        }
        self.expect(']')?;
        Ok((items, variadic))
    }

    fn args(&mut self, name: &str, count: usize) -> Result<Vec<TypeDesc>, Error> {
        let (items, variadic) = self.type_list()?;
        if variadic || items.len() != count {
            return Err(self.error(format!("`{name}` takes {count} type argument(s)")));
        }
        Ok(items)
    }

    fn member(&mut self) -> Result<TypeDesc, Error> {
        let name = self.ident()?;
        if !self.eat('[') {
            return Ok(match LeafType::from_name(name) {
                Some(leaf) => TypeDesc::Leaf(leaf),
                None => TypeDesc::Opaque(name.to_string()),
            });
        }
        if self.depth >= MAX_NESTING {
            return Err(self.error("type arguments nested too deeply"));
        }
        self.depth += 1;
        let ty = self.generic(name);
        self.depth -= 1;
        ty
    }

    fn generic(&mut self, name: &str) -> Result<TypeDesc, Error> {
        let container = match name {
            "list" => Some(ContainerKind::List),
            "deque" => Some(ContainerKind::Deque),
            "set" => Some(ContainerKind::Set),
            "frozenset" => Some(ContainerKind::FrozenSet),
            _ => None,
        };
        if let Some(kind) = container {
            let mut args = self.args(name, 1)?;
            return Ok(TypeDesc::container(kind, args.remove(0)));
        }
        match name {
            "dict" | "ordereddict" => {
                let mut args = self.args(name, 2)?;
                let value = args.remove(1);
                let key = args.remove(0);
                let kind = if name == "dict" {
                    MappingKind::Dict
                } else {
                    MappingKind::OrderedDict
                };
                Ok(TypeDesc::Mapping {
                    kind,
                    key: Box::new(key),
                    value: Box::new(value),
                })
            }
            "tuple" => {
                let (mut items, variadic) = self.type_list()?;
                match (items.len(), variadic) {
                    (1, _) => Ok(TypeDesc::variadic_tuple(items.remove(0))),
                    (0, _) => Err(self.error("`tuple` needs at least one type argument")),
                    (_, true) => Err(self.error("`...` must follow exactly one tuple type")),
                    (_, false) => Ok(TypeDesc::Tuple(items)),
                }
            }
            "optional" => {
                let mut args = self.args(name, 1)?;
                Ok(TypeDesc::optional(args.remove(0)))
            }
            "union" => {
                let (items, variadic) = self.type_list()?;
                if variadic || items.is_empty() {
                    return Err(self.error("`union` takes one or more types"));
                }
                Ok(TypeDesc::Union(items))
            }
            "literal" => self.literal_choices(),
            other => Err(self.error(format!("`{other}` does not take type arguments"))),
        }
    }

    fn literal_choices(&mut self) -> Result<TypeDesc, Error> {
        let mut choices = Vec::new();
        if !self.eat(']') {
            loop {
                choices.push(self.literal()?);
                if !self.eat(',') {
                    break;
                }
            }
            self.expect(']')?;
        }
        Ok(TypeDesc::Literal(choices))
    }

    fn quoted(&mut self) -> Result<String, Error> {
        let Some(quote) = self.peek().filter(|c| *c == '"' || *c == '\'') else {
            return Err(self.error("expected a quoted string"));
        };
        self.pos += 1;
        let mut out = String::new();
        let mut chars = self.rest().char_indices();
        while let Some((idx, ch)) = chars.next() {
            match ch {
                '\\' => {
                    if let Some((_, next)) = chars.next() {
                        out.push(next);
                    }
                }
                c if c == quote => {
                    self.pos += idx + 1;
                    return Ok(out);
                }
                c => out.push(c),
            }
        }
        Err(self.error("unterminated string literal"))
    }

    fn literal(&mut self) -> Result<LiteralValue, Error> {
        match self.peek() {
            Some('"' | '\'') => return self.quoted().map(LiteralValue::Str),
            Some('b') if self.rest()[1..].starts_with(['"', '\'']) => {
                self.pos += 1;
                return self.quoted().map(|s| LiteralValue::Bytes(s.into_bytes()));
            }
            _ => {}
        }
        let rest = self.rest();
        let len = rest
            .find(|c: char| c == ',' || c == ']' || c.is_whitespace())
            .unwrap_or(rest.len());
        let token = &rest[..len];
        let value = match token {
            "true" | "True" => LiteralValue::Bool(true),
            "false" | "False" => LiteralValue::Bool(false),
            _ => LiteralValue::Int(
                token
                    .parse()
                    .map_err(|_| self.error(format!("invalid literal `{token}`")))?,
            ),
        };
        self.pos += len;
        Ok(value)
    }
}

pub fn parse_type(input: &str) -> Result<TypeDesc, Error> {
    let mut cursor = Cursor {
        input,
        pos: 0,
        depth: 0,
    };
    let ty = cursor.union()?;
    if cursor.peek().is_some() {
        return Err(cursor.error("unexpected trailing input"));
    }
    Ok(ty)
}

impl TypeDesc {
    pub fn parse(input: &str) -> Result<TypeDesc, Error> {
        parse_type(input)
    }
}

impl FromStr for TypeDesc {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_type(s)
    }
}
