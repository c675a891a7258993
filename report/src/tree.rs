use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::Error;

#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Count(u64),
    Float(f64),
    Text(String),
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::Count(v)
    }
}

impl From<usize> for Value {
    fn from(v: usize) -> Self {
        Value::Count(v as u64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

/// Undefined rates are published as the text `undefined`.
impl From<Option<f64>> for Value {
    fn from(v: Option<f64>) -> Self {
        match v {
            Some(x) => Value::Float(x),
            None => Value::Text("undefined".into()),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ReportNode {
    Scalar(Value),
    Section(Section),
}

macro_rules! scalar_node {
    ($($t:ty),*) => {
        $(
            impl From<$t> for ReportNode {
                fn from(v: $t) -> Self {
                    ReportNode::Scalar(v.into())
                }
            }
        )*
    };
}

scalar_node!(Value, u64, usize, f64, &str, String, Option<f64>);

impl From<Section> for ReportNode {
    fn from(s: Section) -> Self {
        ReportNode::Section(s)
    }
}

impl ReportNode {
    pub fn as_section(&self) -> Option<&Section> {
        match self {
            ReportNode::Section(s) => Some(s),
            ReportNode::Scalar(_) => None,
        }
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            ReportNode::Scalar(v) => Some(v),
            ReportNode::Section(_) => None,
        }
    }
}

/// Ordered, append-only mapping of key to node. Insertion order is the
/// serialization order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Section {
    entries: Vec<(String, ReportNode)>,
}

impl Section {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, key: impl Into<String>, node: impl Into<ReportNode>) -> Result<(), Error> {
        let key = key.into();
        if self.get(&key).is_some() {
            return Err(Error::DuplicateKey(key));
        }
        self.entries.push((key, node.into()));
        Ok(())
    }

    pub fn add_section(
        &mut self,
        key: impl Into<String>,
        build: impl FnOnce(&mut Section) -> Result<(), Error>,
    ) -> Result<(), Error> {
        let mut child = Section::new();
        build(&mut child)?;
        self.add(key, child)
    }

    pub fn get(&self, key: &str) -> Option<&ReportNode> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, n)| n)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ReportNode)> {
        self.entries.iter().map(|(k, n)| (k.as_str(), n))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A named, versioned document built once per run by the report owner.
#[derive(Clone, Debug, PartialEq)]
pub struct Report {
    pub name: String,
    pub version: String,
    pub root: Section,
}

impl Report {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            root: Section::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&ReportNode> {
        self.root.get(key)
    }
}

/// YAML spelling of a float that has no plain decimal form.
pub(crate) fn non_finite_label(v: f64) -> Option<&'static str> {
    if v.is_nan() {
        Some(".nan")
    } else if v == f64::INFINITY {
        Some(".inf")
    } else if v == f64::NEG_INFINITY {
        Some("-.inf")
    } else {
        None
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Count(v) => serializer.serialize_u64(*v),
            Value::Float(v) => match non_finite_label(*v) {
                Some(label) => serializer.serialize_str(label),
                None => serializer.serialize_f64(*v),
            },
            Value::Text(v) => serializer.serialize_str(v),
        }
    }
}

impl Serialize for ReportNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ReportNode::Scalar(v) => v.serialize(serializer),
            ReportNode::Section(s) => s.serialize(serializer),
        }
    }
}

impl Serialize for Section {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, n) in &self.entries {
            map.serialize_entry(k, n)?;
        }
        map.end()
    }
}

impl Serialize for Report {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.root.len() + 1))?;
        map.serialize_entry(&format!("{} version", self.name), &self.version)?;
        for (k, n) in self.root.iter() {
            map.serialize_entry(k, n)?;
        }
        map.end()
    }
}
