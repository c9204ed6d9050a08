use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashMap;
use std::fmt;

/// A decoded physical value with whatever annotation the database offers.
///
/// The variant is chosen by strict precedence: value-table label first, then
/// signal comment, then unit, else the bare number.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum SignalValue {
    /// No label, comment or unit.
    Bare(f64),
    /// The raw value matched a `VAL_` entry. The comment is kept when present.
    Labeled {
        value: f64,
        label: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        comment: Option<String>,
    },
    /// A `CM_ SG_` comment exists but no label matched.
    Commented { value: f64, comment: String },
    /// Only a unit is declared.
    Unitful { value: f64, unit: String },
}

impl SignalValue {
    /// Physical value, whatever the shape.
    pub fn value(&self) -> f64 {
        match self {
            SignalValue::Bare(value)
            | SignalValue::Labeled { value, .. }
            | SignalValue::Commented { value, .. }
            | SignalValue::Unitful { value, .. } => *value,
        }
    }

    pub fn label(&self) -> Option<&str> {
        match self {
            SignalValue::Labeled { label, .. } => Some(label),
            _ => None,
        }
    }

    pub fn comment(&self) -> Option<&str> {
        match self {
            SignalValue::Labeled { comment, .. } => comment.as_deref(),
            SignalValue::Commented { comment, .. } => Some(comment),
            _ => None,
        }
    }

    pub fn unit(&self) -> Option<&str> {
        match self {
            SignalValue::Unitful { unit, .. } => Some(unit),
            _ => None,
        }
    }
}

/// `[comment] label|value [unit]`, space separated.
impl fmt::Display for SignalValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalValue::Bare(value) => write!(f, "{}", value),
            SignalValue::Labeled {
                label,
                comment: Some(comment),
                ..
            } => write!(f, "{} {}", comment, label),
            SignalValue::Labeled { label, .. } => write!(f, "{}", label),
            SignalValue::Commented { value, comment } => write!(f, "{} {}", comment, value),
            SignalValue::Unitful { value, unit } => write!(f, "{} {}", value, unit),
        }
    }
}

/// Decoded signals of one frame, keyed by signal name, in decode order.
///
/// The multiplexer switch (if any) comes first, then the remaining signals in
/// declaration order. Names are unique.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DecodedSignals {
    entries: Vec<(String, SignalValue)>,
    // name → position in `entries`
    index: HashMap<String, usize>,
}

impl DecodedSignals {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        DecodedSignals {
            entries: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
        }
    }

    /// Appends `name`, or replaces its value in place if the name repeats.
    pub(crate) fn insert(&mut self, name: &str, value: SignalValue) {
        match self.index.get(name) {
            Some(&pos) => self.entries[pos].1 = value,
            None => {
                self.index.insert(name.to_string(), self.entries.len());
                self.entries.push((name.to_string(), value));
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&SignalValue> {
        let &pos = self.index.get(name)?;
        self.entries.get(pos).map(|(_, v)| v)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SignalValue)> + '_ {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// One-line rendering: `name: value | name: value`.
    pub fn summary(&self) -> String {
        self.entries
            .iter()
            .map(|(n, v)| format!("{}: {}", n, v))
            .collect::<Vec<String>>()
            .join(" | ")
    }
}

impl Serialize for DecodedSignals {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<'a> IntoIterator for &'a DecodedSignals {
    type Item = (&'a str, &'a SignalValue);
    type IntoIter = Box<dyn Iterator<Item = (&'a str, &'a SignalValue)> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}
