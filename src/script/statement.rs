//! Statement definitions for script lines

use std::collections::BTreeSet;

use crate::script::template::Template;

/// Initializer of a `$value` declaration
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ValueDefault {
    Boolean(bool),
    Template(Template),
}

/// Kind of answer requested by `$input`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputType {
    Text,
    Bool,
    Password,
}

impl std::fmt::Display for InputType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputType::Text => write!(f, "text"),
            InputType::Bool => write!(f, "bool"),
            InputType::Password => write!(f, "pass"),
        }
    }
}

/// One statement per logical script line
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Statement {
    /// `$value name [= default]`. Without a default the value must be
    /// supplied as a script argument.
    Value {
        name: String,
        default: Option<ValueDefault>,
    },
    /// `$input type name [: 'message']`
    Input {
        name: String,
        input_type: InputType,
        message: Option<Template>,
    },
    /// `$wait [: 'message']`
    Wait { message: Option<Template> },
    /// `# text`, logged while running
    VisibleComment { text: Template },
    /// `// text`, never rendered
    InvisibleComment { text: String },
    /// Any other line: a command for the top-level grammar
    Command { command: Template },
    Empty,
}

impl Statement {
    /// The variable bound by this statement, if it is an assignment.
    pub fn assigned_name(&self) -> Option<&str> {
        match self {
            Statement::Value { name, .. } | Statement::Input { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Templates contained in this statement.
    pub fn templates(&self) -> Vec<&Template> {
        match self {
            Statement::Value {
                default: Some(ValueDefault::Template(t)),
                ..
            } => vec![t],
            Statement::Input {
                message: Some(t), ..
            } => vec![t],
            Statement::Wait { message: Some(t) } => vec![t],
            Statement::VisibleComment { text } => vec![text],
            Statement::Command { command } => vec![command],
            _ => Vec::new(),
        }
    }

    /// Whether this statement carries templates that need rendering.
    pub fn is_templatable(&self) -> bool {
        matches!(
            self,
            Statement::Value {
                default: Some(ValueDefault::Template(_)),
                ..
            } | Statement::Input { .. }
                | Statement::Wait { .. }
                | Statement::VisibleComment { .. }
                | Statement::Command { .. }
        )
    }

    /// Every variable referenced by this statement's templates.
    pub fn variables(&self) -> BTreeSet<&str> {
        self.templates()
            .into_iter()
            .flat_map(|t| t.variables().iter().map(String::as_str))
            .collect()
    }

    /// Short lowercase name of the statement kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Statement::Value { .. } => "value",
            Statement::Input { .. } => "input",
            Statement::Wait { .. } => "wait",
            Statement::VisibleComment { .. } => "comment",
            Statement::InvisibleComment { .. } => "hidden comment",
            Statement::Command { .. } => "command",
            Statement::Empty => "empty",
        }
    }
}
