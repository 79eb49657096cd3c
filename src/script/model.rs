//! Parsed, validated scripts

use std::collections::BTreeSet;

use crate::script::error::{InvalidScript, ScriptError};
use crate::script::lines::combine_lines;
use crate::script::parser::parse_line;
use crate::script::resolver::{resolve_dependencies, Dependencies};
use crate::script::statement::Statement;

/// One logical line with its statement
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParsedLine {
    pub raw_text: String,
    pub number: usize,
    pub statement: Statement,
}

/// An immutable, validated script
#[derive(Debug, Clone)]
pub struct Script {
    lines: Vec<ParsedLine>,
    dependencies: Dependencies,
}

impl Script {
    /// Parse and validate script source text.
    pub fn parse(source: &str) -> Result<Self, InvalidScript> {
        let physical: Vec<&str> = source.lines().collect();
        Self::from_lines(&physical)
    }

    /// Parse and validate physical script lines.
    ///
    /// Every syntax error is reported. Dependency problems are only looked
    /// for once all lines parse.
    pub fn from_lines<S: AsRef<str>>(physical: &[S]) -> Result<Self, InvalidScript> {
        let mut lines = Vec::new();
        let mut errors: Vec<ScriptError> = Vec::new();

        for line in combine_lines(physical) {
            match parse_line(&line) {
                Ok(parsed) => lines.push(parsed),
                Err(e) => errors.push(e.into()),
            }
        }

        if !errors.is_empty() {
            return Err(InvalidScript { errors });
        }

        let (dependencies, errors) = resolve_dependencies(&lines);
        if !errors.is_empty() {
            return Err(InvalidScript { errors });
        }

        Ok(Self {
            lines,
            dependencies,
        })
    }

    /// All lines in order.
    pub fn lines(&self) -> &[ParsedLine] {
        &self.lines
    }

    /// The line starting at physical line `number`.
    pub fn line(&self, number: usize) -> Option<&ParsedLine> {
        self.lines
            .binary_search_by_key(&number, |l| l.number)
            .ok()
            .map(|i| &self.lines[i])
    }

    /// Lines that `line` directly depends on.
    pub fn dependencies_of(&self, line: &ParsedLine) -> Vec<&ParsedLine> {
        self.dependencies
            .get(&line.number)
            .map(|deps| deps.iter().filter_map(|n| self.line(*n)).collect())
            .unwrap_or_default()
    }

    /// Lines to execute when starting at `start`: every line from `start`
    /// on, plus every earlier line they need, in line order.
    pub fn lines_from(&self, start: usize) -> Vec<&ParsedLine> {
        if start < 2 {
            return self.lines.iter().collect();
        }

        let mut selected = BTreeSet::new();
        for line in self.lines.iter().filter(|l| l.number >= start) {
            selected.insert(line.number);
            self.collect_dependencies(line.number, &mut selected);
        }

        selected.iter().filter_map(|n| self.line(*n)).collect()
    }

    // Edges always point at earlier lines, so this walk terminates.
    fn collect_dependencies(&self, number: usize, into: &mut BTreeSet<usize>) {
        if let Some(deps) = self.dependencies.get(&number) {
            for dep in deps {
                if into.insert(*dep) {
                    self.collect_dependencies(*dep, into);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbers(lines: &[&ParsedLine]) -> Vec<usize> {
        lines.iter().map(|l| l.number).collect()
    }

    #[test]
    fn test_parse_script() {
        let script = Script::parse("$value name='henk'\n\nadd user {{name}}\n").unwrap();
        assert_eq!(script.lines().len(), 3);
        assert_eq!(script.lines()[1].statement, Statement::Empty);
        let deps = script.dependencies_of(&script.lines()[2]);
        assert_eq!(numbers(&deps), vec![1]);
    }

    #[test]
    fn test_start_at_first_line_returns_everything() {
        let script = Script::parse("list users\n# hi\nlist groups").unwrap();
        assert_eq!(numbers(&script.lines_from(1)), vec![1, 2, 3]);
        assert_eq!(numbers(&script.lines_from(0)), vec![1, 2, 3]);
    }

    #[test]
    fn test_start_later_pulls_in_dependencies() {
        let script = Script::parse("$value name='henk'\nadd user {{name}}").unwrap();
        assert_eq!(numbers(&script.lines_from(2)), vec![1, 2]);
    }

    #[test]
    fn test_start_later_follows_dependencies_transitively() {
        let script = Script::parse(
            "$value a='x'\n\
             $value unused='u'\n\
             $value b='{{a}}'\n\
             list users\n\
             add group {{b}}\n\
             list groups",
        )
        .unwrap();
        assert_eq!(numbers(&script.lines_from(4)), vec![1, 3, 4, 5, 6]);
        assert_eq!(numbers(&script.lines_from(6)), vec![6]);
        assert!(script.lines_from(7).is_empty());
    }

    #[test]
    fn test_start_inside_continued_line() {
        let script = Script::parse("$value u='bob'\nadd user \\\n{{u}}\nlist users").unwrap();
        assert_eq!(numbers(&script.lines_from(3)), vec![4]);
        assert_eq!(numbers(&script.lines_from(2)), vec![1, 2, 4]);
    }

    #[test]
    fn test_syntax_errors_are_all_reported() {
        let err = Script::parse("$bogus\nlist users\n$value\n").unwrap_err();
        let lines: Vec<usize> = err.errors.iter().map(ScriptError::line).collect();
        assert_eq!(lines, vec![1, 3]);
    }

    #[test]
    fn test_validation_errors_refuse_script() {
        let err = Script::parse("add user {{name}}\n$value name='x'").unwrap_err();
        assert!(matches!(err.errors[..], [ScriptError::ForwardReference { .. }]));
    }

    #[test]
    fn test_line_lookup() {
        let script = Script::parse("a \\\nb\nc").unwrap();
        assert_eq!(script.line(1).map(|l| l.raw_text.as_str()), Some("a b"));
        assert!(script.line(2).is_none());
        assert_eq!(script.line(3).map(|l| l.raw_text.as_str()), Some("c"));
    }
}
