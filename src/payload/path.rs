use std::borrow::Cow;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use bson::{Bson, Document};
use serde::de::{SeqAccess, Visitor};
use serde::{Deserialize, Deserializer};

/// Location of a field inside a payload document.
///
/// Segments are kept apart rather than joined with dots, because FHR keys such as
/// `org.mozilla.profile.age` contain dots themselves.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldPath {
    segments: Vec<String>,
}

impl FieldPath {
    pub fn new<S: AsRef<str>>(segments: &[S]) -> Option<Self> {
        if segments.is_empty() || segments.iter().any(|s| s.as_ref().is_empty()) {
            return None;
        }
        Some(Self { segments: segments.iter().map(|s| s.as_ref().to_owned()).collect() })
    }

    pub fn profile_creation() -> Self {
        Self {
            segments: ["data", "last", "org.mozilla.profile.age", "profileCreation"]
                .map(String::from)
                .to_vec(),
        }
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().map(String::as_str)
    }

    // arrays are indexed by decimal segments
    pub fn resolve<'d>(&self, doc: &'d Document) -> Option<&'d Bson> {
        let mut segments = self.iter();
        let mut current = doc.get(segments.next()?)?;
        for segment in segments {
            current = match current {
                Bson::Document(doc) => doc.get(segment)?,
                Bson::Array(array) => array.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(current)
    }
}

impl Display for FieldPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.segments.join("/"))
    }
}

#[derive(Debug, thiserror::Error)]
#[error("invalid field path {0:?}")]
pub struct InvalidFieldPath(String);

impl FromStr for FieldPath {
    type Err = InvalidFieldPath;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let segments: Vec<&str> = s.split('/').collect();
        Self::new(&segments).ok_or_else(|| InvalidFieldPath(s.to_owned()))
    }
}

impl<'de> Deserialize<'de> for FieldPath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PathVisitor;

        impl<'de> Visitor<'de> for PathVisitor {
            type Value = FieldPath;

            fn expecting(&self, f: &mut Formatter) -> std::fmt::Result {
                f.write_str("a nonempty sequence of nonempty strings")
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
                // Cow, because JSON strings with escapes can't be borrowed
                let mut segments = Vec::new();
                while let Some(segment) = seq.next_element::<Cow<str>>()? {
                    segments.push(segment.into_owned());
                }
                FieldPath::new(&segments)
                    .ok_or_else(|| serde::de::Error::custom("field path segments cannot be empty"))
            }
        }

        deserializer.deserialize_seq(PathVisitor)
    }
}
