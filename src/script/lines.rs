//! Joins physical lines ending in ` \` into logical lines

use std::sync::LazyLock;

use regex::Regex;

static CONTINUATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[ \t]\\$").expect("continuation pattern is valid")
});

/// A logical script line
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Line {
    /// 1-based number of the first physical line in the group
    pub number: usize,
    pub text: String,
}

impl Line {
    pub fn new(number: usize, text: impl Into<String>) -> Self {
        Self {
            number,
            text: text.into(),
        }
    }
}

/// Combine physical lines into logical lines.
///
/// A physical line ending in a space or tab followed by a backslash is
/// joined, with a single space, to the line after it. The resulting line
/// keeps the number of its first physical line.
pub fn combine_lines<S: AsRef<str>>(physical: &[S]) -> Vec<Line> {
    let mut combined = Vec::with_capacity(physical.len());
    // Text of the logical line that starts right after the current index.
    let mut following: Option<String> = None;

    for (index, raw) in physical.iter().enumerate().rev() {
        let raw = raw.as_ref();
        let text = match CONTINUATION.find(raw) {
            Some(marker) => {
                let head = &raw[..marker.start()];
                match following.take() {
                    Some(next) => format!("{} {}", head, next),
                    None => head.to_string(),
                }
            }
            None => {
                if let Some(next) = following.take() {
                    combined.push(Line::new(index + 2, next));
                }
                raw.to_string()
            }
        };
        following = Some(text);
    }

    if let Some(first) = following {
        combined.push(Line::new(1, first));
    }

    combined.reverse();
    combined
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbering_is_identity_without_markers() {
        let lines = combine_lines(&["a", "", "$value x", "b \\x"]);
        let numbers: Vec<usize> = lines.iter().map(|l| l.number).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4]);
        assert_eq!(lines[3].text, "b \\x");
    }

    #[test]
    fn test_continuation_joins_lines() {
        let lines = combine_lines(&["add user {{name}} \\", "--is-superuser"]);
        assert_eq!(lines, vec![Line::new(1, "add user {{name}} --is-superuser")]);
    }

    #[test]
    fn test_multiple_continuations_keep_first_number() {
        let lines = combine_lines(&["first", "add \\", "user\t\\", "bob", "last"]);
        assert_eq!(
            lines,
            vec![
                Line::new(1, "first"),
                Line::new(2, "add user bob"),
                Line::new(5, "last"),
            ]
        );
    }

    #[test]
    fn test_trailing_continuation_only_strips_marker() {
        let lines = combine_lines(&["list users", "list groups \\"]);
        assert_eq!(
            lines,
            vec![Line::new(1, "list users"), Line::new(2, "list groups")]
        );
    }

    #[test]
    fn test_backslash_without_whitespace_is_not_a_marker() {
        let lines = combine_lines(&["path C:\\", "next"]);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text, "path C:\\");
    }

    #[test]
    fn test_empty_input() {
        let lines: Vec<Line> = combine_lines::<&str>(&[]);
        assert!(lines.is_empty());
    }
}
