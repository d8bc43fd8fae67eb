//! Command-line interface of the `tui-dialogs` binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::field::{FieldDescriptor, FieldKind};

/// Ask the user a question in the terminal and print the answer as JSON.
#[derive(Debug, Parser)]
#[command(name = "tui-dialogs", version, about)]
pub struct Cli {
    /// Path to a config file (defaults to ~/.config/tui-dialogs/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Ask a yes/no question; prints `true` when confirmed
    Confirm {
        title: String,
        #[arg(default_value = "")]
        message: String,
    },
    /// Ask for one or more fields; prints an object of field values
    Prompt {
        title: String,
        /// Field as name[:label[:kind]], kind is text, password or number.
        /// A trailing `!` on the name marks the field required.
        #[arg(long = "field", short = 'f', required = true, value_parser = parse_field)]
        fields: Vec<FieldDescriptor>,
    },
}

/// Parse a `name[:label[:kind]]` field spec.
pub fn parse_field(spec: &str) -> Result<FieldDescriptor, String> {
    let mut parts = spec.splitn(3, ':');
    let raw_name = parts.next().unwrap_or_default().trim();
    let (name, required) = match raw_name.strip_suffix('!') {
        Some(name) => (name, true),
        None => (raw_name, false),
    };
    if name.is_empty() {
        return Err(format!("field '{}' has no name", spec));
    }

    let label = parts
        .next()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .unwrap_or(name);

    let kind = match parts.next().map(str::trim) {
        None | Some("") => FieldKind::Text,
        Some(kind) => FieldKind::from_name(kind).ok_or_else(|| {
            format!(
                "unknown field kind '{}' (expected text, password or number)",
                kind
            )
        })?,
    };

    let mut field = FieldDescriptor::new(name, label).with_kind(kind);
    if required {
        field = field.required();
    }
    Ok(field)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_field_name_only() {
        let field = parse_field("newName").unwrap();
        assert_eq!(field, FieldDescriptor::new("newName", "newName"));
    }

    #[test]
    fn test_parse_field_full() {
        let field = parse_field("port!:Port number:number").unwrap();
        assert_eq!(field.name, "port");
        assert_eq!(field.label, "Port number");
        assert_eq!(field.kind, FieldKind::Number);
        assert!(field.required);
    }

    #[test]
    fn test_parse_field_errors() {
        assert!(parse_field(":Label").is_err());
        assert!(parse_field("!").is_err());
        let err = parse_field("when:When:date").unwrap_err();
        assert!(err.contains("unknown field kind 'date'"));
    }

    #[test]
    fn test_cli_parses_prompt() {
        let cli = Cli::try_parse_from([
            "tui-dialogs",
            "prompt",
            "Rename",
            "--field",
            "newName:New name",
        ])
        .unwrap();
        match cli.command {
            Command::Prompt { title, fields } => {
                assert_eq!(title, "Rename");
                assert_eq!(fields, vec![FieldDescriptor::new("newName", "New name")]);
            }
            other => panic!("Expected prompt command, got {:?}", other),
        }
    }

    #[test]
    fn test_cli_confirm_message_optional() {
        let cli = Cli::try_parse_from(["tui-dialogs", "confirm", "Delete?"]).unwrap();
        assert!(matches!(cli.command, Command::Confirm { ref message, .. } if message.is_empty()));
    }
}
