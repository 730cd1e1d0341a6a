use std::fmt;

use crate::models::ParamValue;

/// The value assigned to one parameter of a job.
#[derive(Debug, Clone, PartialEq)]
pub enum AssignedValue {
    Scalar(ParamValue),
    /// Per-layer values, rendered comma-joined in position order.
    List(Vec<ParamValue>),
}

impl AssignedValue {
    /// Build a per-layer list, substituting the `0` sentinel when there are no layers.
    pub fn layer_list(values: Vec<ParamValue>) -> Self {
        if values.is_empty() {
            AssignedValue::List(vec![ParamValue::Int(0)])
        } else {
            AssignedValue::List(values)
        }
    }

    /// The scalar payload, if this is not a list.
    pub fn as_scalar(&self) -> Option<&ParamValue> {
        match self {
            AssignedValue::Scalar(v) => Some(v),
            AssignedValue::List(_) => None,
        }
    }
}

impl fmt::Display for AssignedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssignedValue::Scalar(v) => write!(f, "{}", v),
            AssignedValue::List(values) => {
                for (i, v) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}", v)?;
                }
                Ok(())
            }
        }
    }
}

/// One job's fully resolved parameter values, in declared key order.
///
/// Keys keep the position they were first inserted at; overwriting a key
/// replaces the value in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Assignment {
    entries: Vec<(String, AssignedValue)>,
}

impl Assignment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Set a key, replacing an existing value or appending a new key.
    pub fn set(&mut self, name: &str, value: AssignedValue) {
        match self.entries.iter_mut().find(|(k, _)| k == name) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((name.to_string(), value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&AssignedValue> {
        self.entries
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v)
    }

    /// Iterate over `(key, value)` pairs in declared order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AssignedValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_list_sentinel() {
        assert_eq!(AssignedValue::layer_list(vec![]).to_string(), "0");
        let list = AssignedValue::layer_list(vec![
            ParamValue::Int(8),
            ParamValue::Int(16),
            ParamValue::Int(32),
        ]);
        assert_eq!(list.to_string(), "8,16,32");
    }

    #[test]
    fn test_set_overwrites_in_place() {
        let mut a = Assignment::new();
        a.set("A", AssignedValue::Scalar(ParamValue::Int(1)));
        a.set("B", AssignedValue::Scalar(ParamValue::Int(2)));
        a.set(
            "A",
            AssignedValue::List(vec![ParamValue::Int(3), ParamValue::Int(4)]),
        );

        let keys: Vec<&str> = a.keys().collect();
        assert_eq!(keys, vec!["A", "B"]);
        assert_eq!(a.get("A").unwrap().to_string(), "3,4");
        assert_eq!(a.len(), 2);
    }
}
