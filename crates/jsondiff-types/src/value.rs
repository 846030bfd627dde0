//! The JSON value model.
//!
//! [`JsonValue`] is a closed enum over the six JSON kinds. Objects are stored
//! in a `BTreeMap`, so key order in the source text never affects equality
//! or iteration order.
//!
//! Equality, cloning, dropping, and conversion to and from
//! `serde_json::Value` all run on explicit stacks, so a value of any depth
//! can be handled without exhausting the call stack. `Debug` and `Serialize`
//! still recurse.

use std::collections::BTreeMap;
use std::fmt;

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::number::Number;
use crate::path::{JsonPath, PathSegment};

/// A parsed JSON document or fragment.
#[derive(Debug, Default)]
pub enum JsonValue {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Array(Vec<JsonValue>),
    Object(BTreeMap<String, JsonValue>),
}

/// The kind of a [`JsonValue`], without its payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum JsonKind {
    Null,
    Bool,
    Number,
    String,
    Array,
    Object,
}

impl JsonKind {
    /// Returns `true` for kinds that hold no child values.
    pub fn is_scalar(&self) -> bool {
        !matches!(self, Self::Array | Self::Object)
    }

    /// Lowercase kind name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool => "boolean",
            Self::Number => "number",
            Self::String => "string",
            Self::Array => "array",
            Self::Object => "object",
        }
    }
}

impl fmt::Display for JsonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl JsonValue {
    /// The kind of this value.
    pub fn kind(&self) -> JsonKind {
        match self {
            Self::Null => JsonKind::Null,
            Self::Bool(_) => JsonKind::Bool,
            Self::Number(_) => JsonKind::Number,
            Self::String(_) => JsonKind::String,
            Self::Array(_) => JsonKind::Array,
            Self::Object(_) => JsonKind::Object,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[JsonValue]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&BTreeMap<String, JsonValue>> {
        match self {
            Self::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Look up a direct child of an object.
    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.as_object().and_then(|map| map.get(key))
    }

    /// Resolve a path against this value.
    ///
    /// Returns `None` if any segment is missing or addresses the wrong kind
    /// of container.
    pub fn get_path(&self, path: &JsonPath) -> Option<&JsonValue> {
        path.segments()
            .iter()
            .try_fold(self, |current, segment| match (current, segment) {
                (Self::Object(map), PathSegment::Key(key)) => map.get(key),
                (Self::Array(items), PathSegment::Index(index)) => items.get(*index),
                _ => None,
            })
    }
}

impl PartialEq for JsonValue {
    /// Structural equality with numeric number comparison.
    ///
    /// Walks both trees with an explicit stack, so arbitrarily deep values can
    /// be compared without exhausting the call stack.
    fn eq(&self, other: &Self) -> bool {
        let mut pending = vec![(self, other)];
        while let Some((a, b)) = pending.pop() {
            match (a, b) {
                (Self::Null, Self::Null) => {}
                (Self::Bool(x), Self::Bool(y)) if x == y => {}
                (Self::Number(x), Self::Number(y)) if x == y => {}
                (Self::String(x), Self::String(y)) if x == y => {}
                (Self::Array(x), Self::Array(y)) if x.len() == y.len() => {
                    pending.extend(x.iter().zip(y));
                }
                (Self::Object(x), Self::Object(y)) if x.len() == y.len() => {
                    for ((kx, vx), (ky, vy)) in x.iter().zip(y) {
                        if kx != ky {
                            return false;
                        }
                        pending.push((vx, vy));
                    }
                }
                _ => return false,
            }
        }
        true
    }
}

impl Eq for JsonValue {}

impl fmt::Display for JsonValue {
    /// Compact JSON text.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

impl Serialize for JsonValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Number(Number::PosInt(n)) => serializer.serialize_u64(*n),
            Self::Number(Number::NegInt(n)) => serializer.serialize_i64(*n),
            Self::Number(Number::Float(f)) => serializer.serialize_f64(*f),
            Self::String(s) => serializer.serialize_str(s),
            Self::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Object(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for JsonValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(Self::from)
    }
}

impl Clone for JsonValue {
    fn clone(&self) -> Self {
        rebuild(
            self,
            |value| match value {
                Self::Null => Shape::Leaf(Self::Null),
                Self::Bool(b) => Shape::Leaf(Self::Bool(*b)),
                Self::Number(n) => Shape::Leaf(Self::Number(*n)),
                Self::String(s) => Shape::Leaf(Self::String(s.clone())),
                Self::Array(items) => Shape::Array(items.iter()),
                Self::Object(map) => Shape::Object(map.iter().map(|(k, v)| (k.clone(), v))),
            },
            Self::Array,
            |entries| Self::Object(entries.into_iter().collect()),
        )
    }
}

impl Drop for JsonValue {
    fn drop(&mut self) {
        // Move children onto a flat list first, so every value reaching the
        // generated drop glue is already empty.
        let mut pending = match self {
            Self::Array(items) if !items.is_empty() => std::mem::take(items),
            Self::Object(map) if !map.is_empty() => std::mem::take(map).into_values().collect(),
            _ => return,
        };
        while let Some(mut value) = pending.pop() {
            match &mut value {
                Self::Array(items) => pending.append(items),
                Self::Object(map) => pending.extend(std::mem::take(map).into_values()),
                _ => {}
            }
        }
    }
}

impl From<serde_json::Value> for JsonValue {
    fn from(value: serde_json::Value) -> Self {
        rebuild(
            value,
            |value| match value {
                serde_json::Value::Null => Shape::Leaf(Self::Null),
                serde_json::Value::Bool(b) => Shape::Leaf(Self::Bool(b)),
                serde_json::Value::Number(n) => Shape::Leaf(Self::Number(Number::from(&n))),
                serde_json::Value::String(s) => Shape::Leaf(Self::String(s)),
                serde_json::Value::Array(items) => Shape::Array(items.into_iter()),
                serde_json::Value::Object(map) => Shape::Object(map.into_iter()),
            },
            Self::Array,
            |entries| Self::Object(entries.into_iter().collect()),
        )
    }
}

impl From<JsonValue> for serde_json::Value {
    fn from(value: JsonValue) -> Self {
        rebuild(
            value,
            |mut value: JsonValue| match &mut value {
                JsonValue::Null => Shape::Leaf(Self::Null),
                JsonValue::Bool(b) => Shape::Leaf(Self::Bool(*b)),
                JsonValue::Number(n) => Shape::Leaf(Self::from(*n)),
                JsonValue::String(s) => Shape::Leaf(Self::String(std::mem::take(s))),
                JsonValue::Array(items) => Shape::Array(std::mem::take(items).into_iter()),
                JsonValue::Object(map) => Shape::Object(std::mem::take(map).into_iter()),
            },
            Self::Array,
            |entries| Self::Object(entries.into_iter().collect()),
        )
    }
}

/// One input node, as seen by [`rebuild`].
enum Shape<A, O, T> {
    Array(A),
    Object(O),
    Leaf(T),
}

/// A container whose children are still being converted.
enum Frame<A, O, T> {
    Array(A, Vec<T>),
    /// The `String` is the key of the child currently being converted.
    Object(O, Vec<(String, T)>, String),
}

enum Step<I, T> {
    Visit(I),
    Done(T),
}

impl<A, O, T> Frame<A, O, T> {
    fn array(items: A) -> Self
    where
        A: Iterator,
    {
        let out = Vec::with_capacity(items.size_hint().0);
        Self::Array(items, out)
    }

    fn object(entries: O) -> Self
    where
        O: Iterator,
    {
        let out = Vec::with_capacity(entries.size_hint().0);
        Self::Object(entries, out, String::new())
    }

    fn attach(&mut self, value: T) {
        match self {
            Self::Array(_, out) => out.push(value),
            Self::Object(_, out, key) => out.push((std::mem::take(key), value)),
        }
    }
}

/// Pull the next child of `frame`, or assemble the frame once it has none.
fn advance<I, T, A, O>(
    mut frame: Frame<A, O, T>,
    stack: &mut Vec<Frame<A, O, T>>,
    array: &impl Fn(Vec<T>) -> T,
    object: &impl Fn(Vec<(String, T)>) -> T,
) -> Step<I, T>
where
    A: Iterator<Item = I>,
    O: Iterator<Item = (String, I)>,
{
    let next = match &mut frame {
        Frame::Array(items, _) => items.next(),
        Frame::Object(entries, _, key) => entries.next().map(|(k, child)| {
            *key = k;
            child
        }),
    };
    match next {
        Some(child) => {
            stack.push(frame);
            Step::Visit(child)
        }
        None => Step::Done(match frame {
            Frame::Array(_, out) => array(out),
            Frame::Object(_, out, _) => object(out),
        }),
    }
}

/// Convert a tree bottom-up using an explicit stack of open containers.
///
/// `split` exposes a node either as a finished leaf or as an iterator over
/// its children; `array` and `object` assemble converted children.
fn rebuild<I, T, A, O>(
    root: I,
    split: impl Fn(I) -> Shape<A, O, T>,
    array: impl Fn(Vec<T>) -> T,
    object: impl Fn(Vec<(String, T)>) -> T,
) -> T
where
    A: Iterator<Item = I>,
    O: Iterator<Item = (String, I)>,
{
    let mut stack = Vec::new();
    let mut step = Step::Visit(root);
    loop {
        step = match step {
            Step::Visit(node) => match split(node) {
                Shape::Leaf(value) => Step::Done(value),
                Shape::Array(items) => advance(Frame::array(items), &mut stack, &array, &object),
                Shape::Object(entries) => {
                    advance(Frame::object(entries), &mut stack, &array, &object)
                }
            },
            Step::Done(value) => match stack.pop() {
                None => return value,
                Some(mut frame) => {
                    frame.attach(value);
                    advance(frame, &mut stack, &array, &object)
                }
            },
        };
    }
}

impl From<bool> for JsonValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<Number> for JsonValue {
    fn from(n: Number) -> Self {
        Self::Number(n)
    }
}

impl From<i64> for JsonValue {
    fn from(n: i64) -> Self {
        Self::Number(n.into())
    }
}

impl From<u64> for JsonValue {
    fn from(n: u64) -> Self {
        Self::Number(n.into())
    }
}

impl From<&str> for JsonValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for JsonValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<Vec<JsonValue>> for JsonValue {
    fn from(items: Vec<JsonValue>) -> Self {
        Self::Array(items)
    }
}

impl From<BTreeMap<String, JsonValue>> for JsonValue {
    fn from(map: BTreeMap<String, JsonValue>) -> Self {
        Self::Object(map)
    }
}

impl<K: Into<String>> FromIterator<(K, JsonValue)> for JsonValue {
    fn from_iter<I: IntoIterator<Item = (K, JsonValue)>>(iter: I) -> Self {
        Self::Object(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}
