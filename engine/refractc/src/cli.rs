//! Command-line argument parsing.
//!
//! Hand-rolled: the surface is one command, one file, and a handful
//! of flags.

use std::path::PathBuf;

use refract_ir::{Position, Selection};

/// A prompt answer scripted from the command line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Answer<T> {
    /// Flag absent.
    #[default]
    Unset,
    /// `cancel` passed.
    Cancel,
    Value(T),
}

/// Parsed invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    pub command: String,
    pub path: PathBuf,
    pub selection: Selection,
    pub write_back: bool,
    pub choice: Answer<usize>,
    pub input: Answer<String>,
    pub order: Answer<Vec<usize>>,
}

/// Parse `argv[1..]`.
pub fn parse_args(args: &[String]) -> Result<Args, String> {
    let mut positional = Vec::new();
    let mut selection = None;
    let mut write_back = false;
    let mut choice = Answer::Unset;
    let mut input = Answer::Unset;
    let mut order = Answer::Unset;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--at" => {
                let value = flag_value(args, i, "--at")?;
                selection = Some(parse_at(value)?);
                i += 2;
            }
            "--write" => {
                write_back = true;
                i += 1;
            }
            "--choice" => {
                let value = flag_value(args, i, "--choice")?;
                choice = if value == "cancel" {
                    Answer::Cancel
                } else {
                    Answer::Value(
                        value
                            .parse()
                            .map_err(|_| format!("invalid --choice value: {value}"))?,
                    )
                };
                i += 2;
            }
            "--input" => {
                let value = flag_value(args, i, "--input")?;
                input = if value == "cancel" {
                    Answer::Cancel
                } else {
                    Answer::Value(value.to_owned())
                };
                i += 2;
            }
            "--order" => {
                let value = flag_value(args, i, "--order")?;
                order = if value == "cancel" {
                    Answer::Cancel
                } else {
                    Answer::Value(parse_order(value)?)
                };
                i += 2;
            }
            flag if flag.starts_with("--") => {
                return Err(format!("unknown flag: {flag}"));
            }
            _ => {
                positional.push(args[i].clone());
                i += 1;
            }
        }
    }

    let [command, path] = positional.as_slice() else {
        return Err("expected a refactoring and a file".to_owned());
    };
    let selection = selection.ok_or("missing --at <line:col[-line:col]>")?;

    Ok(Args {
        command: command.clone(),
        path: PathBuf::from(path),
        selection,
        write_back,
        choice,
        input,
        order,
    })
}

fn flag_value<'a>(args: &'a [String], i: usize, flag: &str) -> Result<&'a str, String> {
    args.get(i + 1)
        .map(String::as_str)
        .ok_or_else(|| format!("{flag} needs a value"))
}

/// Parse `line:col` or `line:col-line:col`, 1-based as editors
/// display them.
pub fn parse_at(value: &str) -> Result<Selection, String> {
    let mut ends = value.splitn(2, '-');
    let start = parse_position(ends.next().unwrap_or_default())?;
    match ends.next() {
        Some(end) => Ok(Selection::new(start, parse_position(end)?)),
        None => Ok(Selection::cursor_at(start)),
    }
}

fn parse_position(value: &str) -> Result<Position, String> {
    let (line, character) = value
        .split_once(':')
        .ok_or_else(|| format!("expected line:col, got {value}"))?;
    let line: u32 = line
        .parse()
        .map_err(|_| format!("invalid line number: {line}"))?;
    let character: u32 = character
        .parse()
        .map_err(|_| format!("invalid column number: {character}"))?;
    if line == 0 || character == 0 {
        return Err("lines and columns are 1-based".to_owned());
    }
    Ok(Position::new(line - 1, character - 1))
}

fn parse_order(value: &str) -> Result<Vec<usize>, String> {
    value
        .split(',')
        .map(|part| {
            part.trim()
                .parse()
                .map_err(|_| format!("invalid --order index: {part}"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn strings(args: &[&str]) -> Vec<String> {
        args.iter().map(|&arg| arg.to_owned()).collect()
    }

    #[test]
    fn parses_cursor_invocation() {
        let args = match parse_args(&strings(&[
            "extract-variable",
            "src/app.js",
            "--at",
            "3:14",
        ])) {
            Ok(args) => args,
            Err(err) => panic!("parse failed: {err}"),
        };
        assert_eq!(args.command, "extract-variable");
        assert_eq!(args.path, PathBuf::from("src/app.js"));
        assert_eq!(
            args.selection,
            Selection::cursor_at(Position::new(2, 13))
        );
        assert!(!args.write_back);
    }

    #[test]
    fn parses_range_and_flags() {
        let args = match parse_args(&strings(&[
            "extract-variable",
            "app.js",
            "--at",
            "1:3-2:5",
            "--choice",
            "1",
            "--write",
        ])) {
            Ok(args) => args,
            Err(err) => panic!("parse failed: {err}"),
        };
        assert_eq!(args.selection, Selection::from_coords(0, 2, 1, 4));
        assert_eq!(args.choice, Answer::Value(1));
        assert!(args.write_back);
    }

    #[test]
    fn parses_cancel_answers() {
        let args = match parse_args(&strings(&[
            "rename-symbol",
            "app.js",
            "--at",
            "1:1",
            "--input",
            "cancel",
        ])) {
            Ok(args) => args,
            Err(err) => panic!("parse failed: {err}"),
        };
        assert_eq!(args.input, Answer::Cancel);
    }

    #[test]
    fn parses_order_list() {
        assert_eq!(parse_order("1,0,2"), Ok(vec![1, 0, 2]));
        assert!(parse_order("1,x").is_err());
    }

    #[test]
    fn rejects_zero_based_positions() {
        assert!(parse_at("0:1").is_err());
        assert!(parse_at("1:0").is_err());
    }

    #[test]
    fn rejects_missing_pieces() {
        assert!(parse_args(&strings(&["extract-variable"])).is_err());
        assert!(parse_args(&strings(&["extract-variable", "a.js"])).is_err());
        assert!(parse_args(&strings(&["x", "a.js", "--at", "1:1", "--bogus"])).is_err());
    }
}
