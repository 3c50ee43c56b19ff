//! Navigation scripts: one command per line.
//!
//! ```text
//! # comments and blank lines are skipped
//! push /vendors/edit?id=2
//! replace /vendors/add
//! back
//! forward
//! wait 50
//! dismiss
//! show
//! ```

use std::fmt;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
	/// Navigate to a new entry.
	Push(String),
	/// Replace the current entry.
	Replace(String),
	Back,
	Forward,
	/// Let background work run for a while.
	Wait(Duration),
	/// Clear the error shown by the current form.
	Dismiss,
	/// Render without navigating.
	Show,
}

impl fmt::Display for Step {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Push(url) => write!(f, "push {url}"),
			Self::Replace(url) => write!(f, "replace {url}"),
			Self::Back => f.write_str("back"),
			Self::Forward => f.write_str("forward"),
			Self::Wait(d) => write!(f, "wait {}", d.as_millis()),
			Self::Dismiss => f.write_str("dismiss"),
			Self::Show => f.write_str("show"),
		}
	}
}

/// A script line that could not be parsed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("line {line}: {message}")]
pub struct ScriptError {
	pub line: usize,
	pub message: String,
}

impl ScriptError {
	fn new(line: usize, message: impl Into<String>) -> Self {
		Self {
			line,
			message: message.into(),
		}
	}
}

/// Parses one line. Blank lines and `#` comments yield `None`.
pub fn parse_line(line: usize, text: &str) -> Result<Option<Step>, ScriptError> {
	let text = text.trim();
	if text.is_empty() || text.starts_with('#') {
		return Ok(None);
	}

	let (command, arg) = match text.split_once(char::is_whitespace) {
		Some((command, arg)) => (command, Some(arg.trim())),
		None => (text, None),
	};

	let step = match (command, arg) {
		("push", Some(url)) => Step::Push(url.to_string()),
		("replace", Some(url)) => Step::Replace(url.to_string()),
		("push" | "replace", None) => return Err(ScriptError::new(line, format!("`{command}` needs a url"))),
		("wait", Some(ms)) => {
			let ms: u64 = ms
				.parse()
				.map_err(|_| ScriptError::new(line, format!("`wait` needs milliseconds, got {ms:?}")))?;
			Step::Wait(Duration::from_millis(ms))
		}
		("wait", None) => return Err(ScriptError::new(line, "`wait` needs milliseconds")),
		("back", None) => Step::Back,
		("forward", None) => Step::Forward,
		("dismiss", None) => Step::Dismiss,
		("show", None) => Step::Show,
		("back" | "forward" | "dismiss" | "show", Some(_)) => {
			return Err(ScriptError::new(line, format!("`{command}` takes no argument")));
		}
		_ => return Err(ScriptError::new(line, format!("unknown command `{command}`"))),
	};
	Ok(Some(step))
}

/// Parses a whole script, numbering lines from 1.
pub fn parse_script(source: &str) -> Result<Vec<Step>, ScriptError> {
	let mut steps = Vec::new();
	for (index, text) in source.lines().enumerate() {
		if let Some(step) = parse_line(index + 1, text)? {
			steps.push(step);
		}
	}
	Ok(steps)
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn parses_every_command() {
		let steps = parse_script(
			"# tour\n\npush /vendors/edit?id=2\nreplace   /vendors/add\nback\nforward\nwait 25\ndismiss\nshow\n",
		)
		.unwrap();
		assert_eq!(
			steps,
			[
				Step::Push("/vendors/edit?id=2".to_string()),
				Step::Replace("/vendors/add".to_string()),
				Step::Back,
				Step::Forward,
				Step::Wait(Duration::from_millis(25)),
				Step::Dismiss,
				Step::Show,
			]
		);
	}

	#[test]
	fn errors_carry_line_numbers() {
		let err = parse_script("push /\n\njump /vendors").unwrap_err();
		assert_eq!(err.line, 3);
		assert!(err.message.contains("jump"), "{err}");

		assert_eq!(parse_line(1, "wait soon").unwrap_err().line, 1);
		assert!(parse_line(7, "push").is_err());
		assert!(parse_line(2, "back 2").is_err());
	}

	#[test]
	fn display_matches_source_form() {
		for line in ["push /audits?id=1", "wait 10", "back", "dismiss"] {
			assert_eq!(parse_line(1, line).unwrap().unwrap().to_string(), line);
		}
	}
}
