//! Dependency resolution between script lines
//!
//! Each line that uses a variable depends on the earlier line declaring it.
//! Problems are collected rather than reported one at a time, so a user sees
//! every mistake in a script at once.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::script::error::ScriptError;
use crate::script::model::ParsedLine;

/// Edges from a line number to the line numbers it depends on
pub type Dependencies = BTreeMap<usize, BTreeSet<usize>>;

/// Build the dependency graph for `lines`, collecting every problem found.
pub fn resolve_dependencies(lines: &[ParsedLine]) -> (Dependencies, Vec<ScriptError>) {
    let mut errors = Vec::new();
    let mut declarations: HashMap<&str, &ParsedLine> = HashMap::new();

    for line in lines {
        let Some(name) = line.statement.assigned_name() else {
            continue;
        };
        match declarations.get(name) {
            Some(first) => errors.push(ScriptError::Reassignment {
                name: name.to_string(),
                line: line.number,
                text: line.raw_text.clone(),
                first_line: first.number,
            }),
            None => {
                declarations.insert(name, line);
            }
        }
    }

    let mut dependencies = Dependencies::new();

    for line in lines.iter().filter(|l| l.statement.is_templatable()) {
        for name in line.statement.variables() {
            let Some(declaration) = declarations.get(name) else {
                errors.push(ScriptError::UnknownReference {
                    name: name.to_string(),
                    line: line.number,
                    text: line.raw_text.clone(),
                });
                continue;
            };

            if declaration.number == line.number {
                errors.push(ScriptError::RecursiveReference {
                    name: name.to_string(),
                    line: line.number,
                    text: line.raw_text.clone(),
                });
            } else if declaration.number >= line.number {
                errors.push(ScriptError::ForwardReference {
                    name: name.to_string(),
                    line: line.number,
                    text: line.raw_text.clone(),
                    declared_on: declaration.number,
                });
            } else {
                dependencies
                    .entry(line.number)
                    .or_default()
                    .insert(declaration.number);
            }
        }
    }

    (dependencies, errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::lines::combine_lines;
    use crate::script::parser::parse_line;

    fn parsed(source: &[&str]) -> Vec<ParsedLine> {
        combine_lines(source)
            .iter()
            .map(|l| parse_line(l).unwrap())
            .collect()
    }

    #[test]
    fn test_reference_to_earlier_line() {
        let lines = parsed(&["$value name='henk'", "add user {{name}}"]);
        let (deps, errors) = resolve_dependencies(&lines);
        assert!(errors.is_empty());
        assert_eq!(deps.get(&2), Some(&BTreeSet::from([1])));
        assert_eq!(deps.get(&1), None);
    }

    #[test]
    fn test_self_reference() {
        let lines = parsed(&["$value name = \"{{name}}\""]);
        let (deps, errors) = resolve_dependencies(&lines);
        assert!(deps.is_empty());
        assert_eq!(
            errors,
            vec![ScriptError::RecursiveReference {
                name: "name".to_string(),
                line: 1,
                text: "$value name = \"{{name}}\"".to_string(),
            }]
        );
    }

    #[test]
    fn test_self_reference_in_input_prompt() {
        let lines = parsed(&["$input text who: 'who is {{who}}?'"]);
        let (_, errors) = resolve_dependencies(&lines);
        assert!(matches!(errors[..], [ScriptError::RecursiveReference { line: 1, .. }]));
    }

    #[test]
    fn test_forward_reference() {
        let lines = parsed(&["add user {{name}}", "$value name='henk'"]);
        let (deps, errors) = resolve_dependencies(&lines);
        assert!(deps.is_empty());
        assert_eq!(
            errors,
            vec![ScriptError::ForwardReference {
                name: "name".to_string(),
                line: 1,
                text: "add user {{name}}".to_string(),
                declared_on: 2,
            }]
        );
    }

    #[test]
    fn test_duplicate_declaration_lists_both_lines() {
        let lines = parsed(&["$value name='a'", "list users", "$input text name"]);
        let (_, errors) = resolve_dependencies(&lines);
        assert_eq!(
            errors,
            vec![ScriptError::Reassignment {
                name: "name".to_string(),
                line: 3,
                text: "$input text name".to_string(),
                first_line: 1,
            }]
        );
    }

    #[test]
    fn test_first_declaration_wins() {
        let lines = parsed(&["$value a='x'", "$value a='y'", "# {{a}}"]);
        let (deps, errors) = resolve_dependencies(&lines);
        assert_eq!(errors.len(), 1);
        assert_eq!(deps.get(&3), Some(&BTreeSet::from([1])));
    }

    #[test]
    fn test_unknown_reference() {
        let lines = parsed(&["# hello {{who}}"]);
        let (_, errors) = resolve_dependencies(&lines);
        assert!(matches!(
            &errors[..],
            [ScriptError::UnknownReference { name, line: 1, .. }] if name == "who"
        ));
    }

    #[test]
    fn test_errors_accumulate() {
        let lines = parsed(&[
            "add user {{missing}}",
            "$value a = '{{a}}'",
            "$value a = 'again'",
            "$wait: '{{later}}'",
            "$value later = true",
        ]);
        let (_, errors) = resolve_dependencies(&lines);
        assert_eq!(errors.len(), 4);
        let lines_with_errors: BTreeSet<usize> = errors.iter().map(ScriptError::line).collect();
        assert_eq!(lines_with_errors, BTreeSet::from([1, 2, 3, 4]));
    }

    #[test]
    fn test_edges_only_point_to_earlier_lines() {
        let lines = parsed(&[
            "$value a = 'x'",
            "$value b = '{{a}}'",
            "$input text c: '{{b}} {{a}}'",
            "// {{nothing}}",
            "add user {{c}} \\",
            "  --password {{b}}",
        ]);
        let (deps, errors) = resolve_dependencies(&lines);
        assert!(errors.is_empty());
        for (from, targets) in &deps {
            assert!(targets.iter().all(|to| to < from));
        }
        assert_eq!(deps.get(&5), Some(&BTreeSet::from([2, 3])));
    }
}
