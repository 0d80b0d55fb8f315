use serde::{Deserialize, Serialize};
use std::fmt;

/// A queue name in the kernel namespace
///
/// Always starts with exactly one `/`. Names given without the separator are
/// prefixed with it; repeated leading separators collapse to one. Anything
/// else (embedded separators, length) is left for the kernel to judge.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct QueueName(String);

impl QueueName {
    pub fn new(name: impl AsRef<str>) -> Self {
        let bare = name.as_ref().trim_start_matches('/');
        Self(format!("/{}", bare))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QueueName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for QueueName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for QueueName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for QueueName {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

impl From<&QueueName> for QueueName {
    fn from(name: &QueueName) -> Self {
        name.clone()
    }
}

impl From<QueueName> for String {
    fn from(name: QueueName) -> Self {
        name.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_separator_is_prefixed() {
        assert_eq!(QueueName::new("jobs").as_str(), "/jobs");
    }

    #[test]
    fn test_existing_separator_is_kept() {
        assert_eq!(QueueName::new("/jobs").as_str(), "/jobs");
    }

    #[test]
    fn test_repeated_separators_collapse() {
        assert_eq!(QueueName::new("///jobs").as_str(), "/jobs");
    }

    #[test]
    fn test_conversions() {
        let from_string: QueueName = String::from("events").into();
        assert_eq!(from_string, QueueName::from("/events"));
        assert_eq!(from_string.to_string(), "/events");
        assert_eq!(String::from(from_string), "/events");
    }

    #[test]
    fn test_deserialize_normalizes() {
        let name: QueueName = serde_json::from_str("\"events\"").unwrap();
        assert_eq!(name.as_str(), "/events");
    }
}
