//! Breadcrumb task names.
//!
//! A task's full name is a sequence of `+segment` parts concatenated, e.g.
//! `+basic+parallel_task_foo+bar`. The leading `+` belongs to the first
//! segment; there is no separate marker for the implicit root.

use thiserror::Error;

/// Separator that prefixes every segment of a full task name
pub const SEGMENT_PREFIX: char = '+';

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskNameError {
    #[error("task name is empty")]
    Empty,
    #[error("task name '{0}' does not start with '+'")]
    MissingPrefix(String),
    #[error("task name '{name}' has an empty segment at position {position}")]
    EmptySegment { name: String, position: usize },
}

/// A parsed full task name.
///
/// Keeps the original string as the lookup key alongside the split segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskName {
    key: String,
    segments: Vec<String>,
}

impl TaskName {
    pub fn parse(name: &str) -> Result<Self, TaskNameError> {
        if name.is_empty() {
            return Err(TaskNameError::Empty);
        }
        let Some(rest) = name.strip_prefix(SEGMENT_PREFIX) else {
            return Err(TaskNameError::MissingPrefix(name.to_string()));
        };

        let mut segments = Vec::new();
        for (position, segment) in rest.split(SEGMENT_PREFIX).enumerate() {
            if segment.is_empty() {
                return Err(TaskNameError::EmptySegment {
                    name: name.to_string(),
                    position,
                });
            }
            segments.push(segment.to_string());
        }

        Ok(TaskName {
            key: name.to_string(),
            segments,
        })
    }

    /// The original full name, used as the node key
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// Keys of every prefix, shallow to deep, ending with this name's own key.
    ///
    /// `+a+b+c` yields `+a`, `+a+b`, `+a+b+c`.
    pub fn prefix_keys(&self) -> impl Iterator<Item = String> + '_ {
        self.segments.iter().scan(String::new(), |acc, segment| {
            acc.push(SEGMENT_PREFIX);
            acc.push_str(segment);
            Some(acc.clone())
        })
    }

    /// Key of the parent node; `""` for a top-level task
    pub fn parent_key(&self) -> &str {
        let last = self.segments.last().map_or(0, |s| s.len() + 1);
        &self.key[..self.key.len() - last]
    }
}

/// Label for a single segment as shown in the timeline (`+bar`)
pub fn segment_label(segment: &str) -> String {
    format!("{}{}", SEGMENT_PREFIX, segment)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nested_name() {
        let name = TaskName::parse("+basic+parallel_task_foo+bar").unwrap();
        assert_eq!(name.segments(), &["basic", "parallel_task_foo", "bar"]);
        assert_eq!(name.key(), "+basic+parallel_task_foo+bar");
        assert_eq!(name.depth(), 3);
    }

    #[test]
    fn test_parse_single_segment() {
        let name = TaskName::parse("+basic").unwrap();
        assert_eq!(name.segments(), &["basic"]);
        assert_eq!(name.parent_key(), "");
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert_eq!(TaskName::parse(""), Err(TaskNameError::Empty));
    }

    #[test]
    fn test_parse_rejects_bare_prefix() {
        assert!(matches!(
            TaskName::parse("+"),
            Err(TaskNameError::EmptySegment { position: 0, .. })
        ));
    }

    #[test]
    fn test_parse_rejects_missing_prefix() {
        assert!(matches!(
            TaskName::parse("basic+a"),
            Err(TaskNameError::MissingPrefix(_))
        ));
    }

    #[test]
    fn test_parse_rejects_inner_empty_segment() {
        let err = TaskName::parse("+a++b").unwrap_err();
        assert_eq!(
            err,
            TaskNameError::EmptySegment {
                name: "+a++b".to_string(),
                position: 1,
            }
        );
        assert!(TaskName::parse("+a+").is_err());
    }

    #[test]
    fn test_prefix_keys() {
        let name = TaskName::parse("+a+b+c").unwrap();
        let keys: Vec<String> = name.prefix_keys().collect();
        assert_eq!(keys, vec!["+a", "+a+b", "+a+b+c"]);
    }

    #[test]
    fn test_parent_key() {
        let name = TaskName::parse("+basic+any_task_name_here+nested_task").unwrap();
        assert_eq!(name.parent_key(), "+basic+any_task_name_here");
    }

    #[test]
    fn test_segment_label() {
        assert_eq!(segment_label("bar"), "+bar");
    }
}
