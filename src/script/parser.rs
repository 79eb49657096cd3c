//! Pest grammar parser for script lines

use pest::error::{ErrorVariant, InputLocation};
use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;

use crate::script::error::ScriptSyntaxError;
use crate::script::lines::Line;
use crate::script::model::ParsedLine;
use crate::script::statement::{InputType, Statement, ValueDefault};
use crate::script::template::Template;

#[derive(Parser)]
#[grammar = "../grammar/script.pest"]
pub struct ScriptParser;

/// Parse one logical line into its statement.
pub fn parse_line(line: &Line) -> Result<ParsedLine, ScriptSyntaxError> {
    let stripped = line.text.trim();
    let indent = line.text[..line.text.len() - line.text.trim_start().len()]
        .chars()
        .count();

    let syntax_error = |column: Option<usize>, message: String| ScriptSyntaxError {
        line: line.number,
        column,
        text: line.text.clone(),
        message,
    };

    let mut pairs = ScriptParser::parse(Rule::line, stripped).map_err(|e| {
        let column = match e.location {
            InputLocation::Pos(pos) | InputLocation::Span((pos, _)) => {
                stripped[..pos].chars().count() + indent + 1
            }
        };
        syntax_error(Some(column), describe(&e.variant))
    })?;

    let statement_pair = pairs
        .next()
        .and_then(|line_pair| line_pair.into_inner().next())
        .ok_or_else(|| syntax_error(None, "empty parse result".to_string()))?;

    let statement =
        build_statement(statement_pair).map_err(|message| syntax_error(None, message))?;

    Ok(ParsedLine {
        raw_text: line.text.clone(),
        number: line.number,
        statement,
    })
}

fn build_statement(pair: Pair<Rule>) -> Result<Statement, String> {
    match pair.as_rule() {
        Rule::value_stmt => {
            let mut name = String::new();
            let mut default = None;
            for inner in pair.into_inner() {
                match inner.as_rule() {
                    Rule::name => name = identifier_of(inner),
                    Rule::value_default => default = Some(build_default(inner)?),
                    _ => {}
                }
            }
            Ok(Statement::Value { name, default })
        }
        Rule::input_stmt => {
            let mut name = String::new();
            let mut input_type = InputType::Text;
            let mut message = None;
            for inner in pair.into_inner() {
                match inner.as_rule() {
                    Rule::input_kind => {
                        input_type = match inner.as_str().trim() {
                            "bool" => InputType::Bool,
                            "pass" => InputType::Password,
                            _ => InputType::Text,
                        }
                    }
                    Rule::name => name = identifier_of(inner),
                    Rule::input_prompt => message = Some(template(&quoted_text(inner))?),
                    _ => {}
                }
            }
            Ok(Statement::Input {
                name,
                input_type,
                message,
            })
        }
        Rule::wait_stmt => {
            let mut message = None;
            for inner in pair.into_inner() {
                match inner.as_rule() {
                    Rule::wait_prompt => message = Some(template(&quoted_text(inner))?),
                    Rule::wait_text => message = Some(template(inner.as_str().trim())?),
                    _ => {}
                }
            }
            Ok(Statement::Wait { message })
        }
        Rule::visible_comment => Ok(Statement::VisibleComment {
            text: template(&comment_text(pair))?,
        }),
        Rule::invisible_comment => Ok(Statement::InvisibleComment {
            text: comment_text(pair),
        }),
        Rule::empty => Ok(Statement::Empty),
        Rule::command => Ok(Statement::Command {
            command: template(pair.as_str())?,
        }),
        other => Err(format!("unexpected rule {:?}", other)),
    }
}

fn build_default(pair: Pair<Rule>) -> Result<ValueDefault, String> {
    match pair.into_inner().next() {
        Some(inner) if inner.as_rule() == Rule::boolean => {
            Ok(ValueDefault::Boolean(inner.as_str() == "true"))
        }
        Some(inner) => Ok(ValueDefault::Template(template(&unescape(
            inner.into_inner().as_str(),
        ))?)),
        None => Err("missing value after '='".to_string()),
    }
}

fn identifier_of(pair: Pair<Rule>) -> String {
    pair.into_inner()
        .next()
        .map(|p| p.as_str().to_string())
        .unwrap_or_default()
}

/// Unescaped contents of the single quoted string inside `pair`.
fn quoted_text(pair: Pair<Rule>) -> String {
    pair.into_inner()
        .find(|p| matches!(p.as_rule(), Rule::single_quoted | Rule::double_quoted))
        .map(|quoted| unescape(quoted.into_inner().as_str()))
        .unwrap_or_default()
}

fn comment_text(pair: Pair<Rule>) -> String {
    pair.into_inner()
        .find(|p| p.as_rule() == Rule::text)
        .map(|p| p.as_str().to_string())
        .unwrap_or_default()
}

fn template(text: &str) -> Result<Template, String> {
    Template::new(text).map_err(|e| e.to_string())
}

/// Resolve backslash escapes inside a quoted script string.
///
/// `\n`, `\t` and `\r` become control characters; any other escaped
/// character stands for itself. Command words are split with plain
/// shell-style escapes instead, see `cli::words`.
fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

fn describe(variant: &ErrorVariant<Rule>) -> String {
    let ErrorVariant::ParsingError { positives, .. } = variant else {
        return variant.message().to_string();
    };

    let mut expected: Vec<&str> = positives.iter().map(rule_name).collect();
    expected.sort_unstable();
    expected.dedup();

    match expected.as_slice() {
        [] => "unexpected input".to_string(),
        [single] => format!("expected {}", single),
        many => format!("expected one of {}", many.join(", ")),
    }
}

fn rule_name(rule: &Rule) -> &'static str {
    match rule {
        Rule::kw_value | Rule::value_stmt => "'value'",
        Rule::kw_input | Rule::input_stmt => "'input'",
        Rule::kw_wait | Rule::wait_stmt => "'wait'",
        Rule::name | Rule::identifier => "a variable name",
        Rule::value_default => "'= <value>'",
        Rule::boolean => "'true' or 'false'",
        Rule::input_kind | Rule::input_type => "'text', 'bool' or 'pass'",
        Rule::input_prompt | Rule::wait_prompt => "': <quoted message>'",
        Rule::wait_text => "a message",
        Rule::visible_comment => "'#'",
        Rule::invisible_comment => "'//'",
        Rule::command => "a command",
        Rule::single_quoted | Rule::double_quoted => "a quoted string",
        Rule::EOI | Rule::empty => "end of line",
        _ => "a statement",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Statement {
        parse_line(&Line::new(1, text)).unwrap().statement
    }

    fn parse_err(text: &str) -> ScriptSyntaxError {
        parse_line(&Line::new(7, text)).unwrap_err()
    }

    fn t(s: &str) -> Template {
        Template::new(s).unwrap()
    }

    #[test]
    fn test_value_booleans() {
        assert_eq!(
            parse("$value val = true"),
            Statement::Value {
                name: "val".to_string(),
                default: Some(ValueDefault::Boolean(true)),
            }
        );
        assert_eq!(
            parse("$value myValue    =false"),
            Statement::Value {
                name: "myValue".to_string(),
                default: Some(ValueDefault::Boolean(false)),
            }
        );
    }

    #[test]
    fn test_value_quoted() {
        assert_eq!(
            parse("$value name='henk'"),
            Statement::Value {
                name: "name".to_string(),
                default: Some(ValueDefault::Template(t("henk"))),
            }
        );
        assert_eq!(
            parse(r#"$value greeting = "say \"hi\" to {{name}}""#),
            Statement::Value {
                name: "greeting".to_string(),
                default: Some(ValueDefault::Template(t("say \"hi\" to {{name}}"))),
            }
        );
        assert_eq!(
            parse(r"$value it = 'it\'s'"),
            Statement::Value {
                name: "it".to_string(),
                default: Some(ValueDefault::Template(t("it's"))),
            }
        );
    }

    #[test]
    fn test_value_control_escapes() {
        assert_eq!(
            parse(r"$value banner = 'one\ttwo\nthree\\'"),
            Statement::Value {
                name: "banner".to_string(),
                default: Some(ValueDefault::Template(t("one\ttwo\nthree\\"))),
            }
        );
    }

    #[test]
    fn test_value_without_default() {
        assert_eq!(
            parse("   $value required_arg   "),
            Statement::Value {
                name: "required_arg".to_string(),
                default: None,
            }
        );
    }

    #[test]
    fn test_value_quoted_true_is_text() {
        assert_eq!(
            parse("$value flag = 'true'"),
            Statement::Value {
                name: "flag".to_string(),
                default: Some(ValueDefault::Template(t("true"))),
            }
        );
    }

    #[test]
    fn test_input() {
        assert_eq!(
            parse("$input text username"),
            Statement::Input {
                name: "username".to_string(),
                input_type: InputType::Text,
                message: None,
            }
        );
        assert_eq!(
            parse("$input pass secret : 'Password for {{username}}'"),
            Statement::Input {
                name: "secret".to_string(),
                input_type: InputType::Password,
                message: Some(t("Password for {{username}}")),
            }
        );
        assert_eq!(
            parse("$input bool admin:\"Superuser?\""),
            Statement::Input {
                name: "admin".to_string(),
                input_type: InputType::Bool,
                message: Some(t("Superuser?")),
            }
        );
    }

    #[test]
    fn test_wait() {
        assert_eq!(parse("$wait"), Statement::Wait { message: None });
        assert_eq!(
            parse("$wait: 'check {{name}}'"),
            Statement::Wait {
                message: Some(t("check {{name}}")),
            }
        );
        assert_eq!(
            parse("$wait   check the dashboard  "),
            Statement::Wait {
                message: Some(t("check the dashboard")),
            }
        );
    }

    #[test]
    fn test_comments() {
        assert_eq!(
            parse("# Creating {{name}}"),
            Statement::VisibleComment {
                text: t("Creating {{name}}"),
            }
        );
        assert_eq!(
            parse("#tight"),
            Statement::VisibleComment { text: t("tight") }
        );
        assert_eq!(
            parse("// not {{rendered"),
            Statement::InvisibleComment {
                text: "not {{rendered".to_string(),
            }
        );
        assert_eq!(parse("#"), Statement::VisibleComment { text: t("") });
    }

    #[test]
    fn test_empty() {
        assert_eq!(parse(""), Statement::Empty);
        assert_eq!(parse("   \t  "), Statement::Empty);
    }

    #[test]
    fn test_command() {
        assert_eq!(
            parse("  add user {{name}} --is-superuser"),
            Statement::Command {
                command: t("add user {{name}} --is-superuser"),
            }
        );
    }

    #[test]
    fn test_parsed_line_keeps_raw_text_and_number() {
        let parsed = parse_line(&Line::new(12, "  list users")).unwrap();
        assert_eq!(parsed.number, 12);
        assert_eq!(parsed.raw_text, "  list users");
    }

    #[test]
    fn test_unknown_declaration() {
        let err = parse_err("$valeu x");
        assert_eq!(err.line, 7);
        assert_eq!(err.column, Some(2));
        assert_eq!(err.message, "expected one of 'input', 'value', 'wait'");
    }

    #[test]
    fn test_column_accounts_for_indent() {
        let err = parse_err("  $valeu x");
        assert_eq!(err.column, Some(4));
    }

    #[test]
    fn test_malformed_declarations() {
        assert!(parse_line(&Line::new(1, "$value")).is_err());
        assert!(parse_line(&Line::new(1, "$value x = maybe")).is_err());
        assert!(parse_line(&Line::new(1, "$value x = 'open")).is_err());
        assert!(parse_line(&Line::new(1, "$input number x")).is_err());
        assert!(parse_line(&Line::new(1, "$waiting")).is_err());
        assert!(parse_line(&Line::new(1, "/single slash")).is_err());
    }

    #[test]
    fn test_template_error_has_no_column() {
        let err = parse_err("add user {{name");
        assert_eq!(err.column, None);
        assert!(err.message.contains("invalid template"));
    }

    #[test]
    fn test_round_trip_rendering() {
        use crate::script::value::{Value, Values};

        let line = "add member {{group}} {{user}} --note 'x'";
        let Statement::Command { command } = parse(line) else {
            panic!("Expected command");
        };
        let reparsed = Template::new(command.source()).unwrap();
        let mut values = Values::new();
        values.insert("group".to_string(), Value::from("ops"));
        values.insert("user".to_string(), Value::from("henk"));
        assert_eq!(command.render(&values), reparsed.render(&values));
        assert_eq!(
            command.render(&values).unwrap(),
            "add member ops henk --note 'x'"
        );
    }
}
