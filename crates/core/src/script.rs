//! Recognizer for the `document.cookie` scripts Execute Script accepts.
//!
//! There is no JavaScript engine behind this crate. Execute Script only
//! understands a sequence of statements of two shapes:
//!
//! ```text
//! document.cookie = '<string literal>';
//! return document.cookie;
//! ```
//!
//! Anything else is reported as unsupported.

use crate::error::{Error, Result};

/// One recognized statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
	/// `document.cookie = "..."` with the literal already unescaped.
	SetDocumentCookie(String),
	/// `return document.cookie`
	ReturnDocumentCookie,
}

const DOCUMENT_COOKIE: &str = "document.cookie";

/// Splits `script` into recognized statements.
///
/// A `return` ends the script; anything after it is ignored like the body of
/// a function after `return` would be.
pub fn parse_script(script: &str) -> Result<Vec<Statement>> {
	let mut scanner = Scanner::new(script);
	let mut statements = Vec::new();

	loop {
		scanner.skip_separators();
		if scanner.at_end() {
			break;
		}
		if scanner.eat_keyword("return") {
			scanner.skip_whitespace();
			if !scanner.eat_keyword(DOCUMENT_COOKIE) {
				return Err(unsupported(script));
			}
			statements.push(Statement::ReturnDocumentCookie);
			break;
		}
		if scanner.eat(DOCUMENT_COOKIE) {
			scanner.skip_whitespace();
			if !scanner.eat("=") || scanner.peek() == Some('=') {
				return Err(unsupported(script));
			}
			scanner.skip_whitespace();
			let value = scanner.string_literal().ok_or_else(|| unsupported(script))?;
			statements.push(Statement::SetDocumentCookie(value));
			scanner.skip_whitespace();
			if !(scanner.at_end() || scanner.eat(";") || scanner.eat("\n")) {
				return Err(unsupported(script));
			}
			continue;
		}
		return Err(unsupported(script));
	}

	Ok(statements)
}

fn unsupported(script: &str) -> Error {
	let preview: String = script.chars().take(60).collect();
	Error::UnsupportedOperation(format!("script is not supported without a script engine: {preview}"))
}

struct Scanner<'a> {
	rest: &'a str,
}

impl<'a> Scanner<'a> {
	fn new(input: &'a str) -> Self {
		Self { rest: input }
	}

	fn at_end(&self) -> bool {
		self.rest.is_empty()
	}

	fn peek(&self) -> Option<char> {
		self.rest.chars().next()
	}

	fn bump(&mut self) -> Option<char> {
		let c = self.peek()?;
		self.rest = &self.rest[c.len_utf8()..];
		Some(c)
	}

	fn eat(&mut self, token: &str) -> bool {
		match self.rest.strip_prefix(token) {
			Some(rest) => {
				self.rest = rest;
				true
			}
			None => false,
		}
	}

	/// Like [`Scanner::eat`] but the keyword must not run into an identifier.
	fn eat_keyword(&mut self, keyword: &str) -> bool {
		let Some(rest) = self.rest.strip_prefix(keyword) else {
			return false;
		};
		if rest.starts_with(|c: char| c.is_alphanumeric() || c == '_' || c == '$') {
			return false;
		}
		self.rest = rest;
		true
	}

	fn skip_whitespace(&mut self) {
		self.rest = self.rest.trim_start_matches(|c: char| c.is_whitespace() && c != '\n');
	}

	fn skip_separators(&mut self) {
		self.rest = self.rest.trim_start_matches(|c: char| c.is_whitespace() || c == ';');
	}

	/// Reads a single- or double-quoted literal and resolves its escapes.
	fn string_literal(&mut self) -> Option<String> {
		let quote = self.bump().filter(|q| *q == '\'' || *q == '"')?;
		let mut out = String::new();
		loop {
			match self.bump()? {
				c if c == quote => return Some(out),
				'\n' | '\r' => return None,
				'\\' => self.escape(&mut out)?,
				c => out.push(c),
			}
		}
	}

	fn escape(&mut self, out: &mut String) -> Option<()> {
		match self.bump()? {
			'n' => out.push('\n'),
			't' => out.push('\t'),
			'r' => out.push('\r'),
			'b' => out.push('\u{8}'),
			'f' => out.push('\u{c}'),
			'v' => out.push('\u{b}'),
			'0' if !self.peek().is_some_and(|c| c.is_ascii_digit()) => out.push('\0'),
			'x' => out.push(self.hex_char(2)?),
			'u' => {
				if self.eat("{") {
					let end = self.rest.find('}')?;
					let code = u32::from_str_radix(&self.rest[..end], 16).ok()?;
					self.rest = &self.rest[end + 1..];
					out.push(char::from_u32(code)?);
				} else {
					out.push(self.hex_char(4)?);
				}
			}
			// line continuation
			'\n' => {}
			'\r' => {
				self.eat("\n");
			}
			c if c.is_ascii_digit() => return None,
			c => out.push(c),
		}
		Some(())
	}

	fn hex_char(&mut self, digits: usize) -> Option<char> {
		let hex = self.rest.get(..digits)?;
		if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
			return None;
		}
		let code = u32::from_str_radix(hex, 16).ok()?;
		self.rest = &self.rest[digits..];
		char::from_u32(code)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn single_assignment() {
		assert_eq!(
			parse_script("document.cookie = 'foo=bar; path=/'").unwrap(),
			vec![Statement::SetDocumentCookie("foo=bar; path=/".into())]
		);
	}

	#[test]
	fn several_statements_and_return() {
		let script = "document.cookie = \"a=1\";\n  document.cookie = 'b=2';\nreturn document.cookie;";
		assert_eq!(
			parse_script(script).unwrap(),
			vec![
				Statement::SetDocumentCookie("a=1".into()),
				Statement::SetDocumentCookie("b=2".into()),
				Statement::ReturnDocumentCookie,
			]
		);
	}

	#[test]
	fn escapes_are_resolved() {
		let parsed = parse_script(r#"document.cookie = 'it\'s=\x41B\u{43}\\'"#).unwrap();
		assert_eq!(parsed, vec![Statement::SetDocumentCookie("it's=ABC\\".into())]);
	}

	#[test]
	fn empty_script_does_nothing() {
		assert!(parse_script("").unwrap().is_empty());
		assert!(parse_script("  ;  ").unwrap().is_empty());
	}

	#[test]
	fn other_scripts_are_unsupported() {
		for script in [
			"return 1",
			"window.location = 'x'",
			"document.cookie == 'a'",
			"document.cookie = someVariable",
			"document.cookie = 'unterminated",
			"returndocument.cookie",
			"return document.cookies",
			"document.cookie = 'a' + 'b'",
		] {
			assert!(
				matches!(parse_script(script), Err(Error::UnsupportedOperation(_))),
				"{script}"
			);
		}
	}
}
