//! Attributes of a start tag
//!
//! The [`Handler`](crate::Handler) does not depend on a particular tokenizer,
//! so attributes are handed over already unescaped and decoded, as owned
//! `name="value"` pairs in document order.

use std::fmt::{self, Debug, Formatter};

/// A single `name="value"` pair
#[derive(Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Qualified name of the attribute
    pub key: String,
    /// Unescaped value
    pub value: String,
}

impl Debug for Attribute {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}={:?}", self.key, self.value)
    }
}

impl<K: Into<String>, V: Into<String>> From<(K, V)> for Attribute {
    fn from((key, value): (K, V)) -> Self {
        Attribute {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Ordered list of attributes of one element.
///
/// Lookups are linear: elements of a collection file carry at most a handful
/// of attributes.
///
/// # Examples
///
/// ```
/// use meas_collec::Attributes;
///
/// let attrs = Attributes::from([("measInfoId", "LTE_QoS"), ("p", "1")]);
/// assert_eq!(attrs.get("measInfoId"), Some("LTE_QoS"));
/// assert_eq!(attrs.get("jobId"), None);
/// ```
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    entries: Vec<Attribute>,
}

impl Attributes {
    /// Creates an empty attribute list
    #[inline]
    pub const fn new() -> Self {
        Attributes {
            entries: Vec::new(),
        }
    }

    /// Removes all attributes, keeping the allocation for the next element
    #[inline]
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Adds an attribute at the end of the list
    pub fn push<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) {
        self.entries.push(Attribute {
            key: key.into(),
            value: value.into(),
        });
    }

    /// Returns the value of the first attribute named `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|a| a.key == key)
            .map(|a| a.value.as_str())
    }

    /// Iterates attributes in document order
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Attribute> {
        self.entries.iter()
    }

    /// Number of attributes
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the element has no attributes
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Debug for Attributes {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.debug_list().entries(self.entries.iter()).finish()
    }
}

impl<'a> IntoIterator for &'a Attributes {
    type Item = &'a Attribute;
    type IntoIter = std::slice::Iter<'a, Attribute>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl<A: Into<Attribute>> FromIterator<A> for Attributes {
    fn from_iter<I: IntoIterator<Item = A>>(iter: I) -> Self {
        Attributes {
            entries: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl<A: Into<Attribute>> Extend<A> for Attributes {
    fn extend<I: IntoIterator<Item = A>>(&mut self, iter: I) {
        self.entries.extend(iter.into_iter().map(Into::into));
    }
}

impl<K: Into<String>, V: Into<String>, const N: usize> From<[(K, V); N]> for Attributes {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}
