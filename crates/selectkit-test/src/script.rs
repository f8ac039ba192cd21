//! Line-oriented interaction scripts.
//!
//! One step per line, blank lines and `#` comments ignored:
//!
//! ```text
//! # open, search, pick
//! click-trigger
//! type ma
//! key down
//! key enter
//! click-outside
//! ```

use crate::harness::Harness;
use selectkit::OptionValue;
use selectkit_core::Key;
use std::str::FromStr;
use thiserror::Error;

/// One scripted interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step<T> {
    /// `key <name>`: press a key
    Key(Key),
    /// `type <text>`: type text one character at a time
    Type(String),
    /// `query <text>`: replace the query
    Query(String),
    /// `click-trigger`
    ClickTrigger,
    /// `click-outside`
    ClickOutside,
    /// `click <n>`: click the option row at view position `n`
    Click(usize),
    /// `hover <n>`: hover the option row at view position `n`
    Hover(usize),
    /// `blur`: focus leaves the control
    Blur,
    /// `clear`
    Clear,
    /// `remove <value>`: remove a selected value
    Remove(T),
    /// `open`
    Open,
    /// `close`
    Close,
}

/// Error parsing a script.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {message}")]
pub struct ScriptError {
    /// 1-based line number
    pub line: usize,
    /// What went wrong
    pub message: String,
}

impl<T: FromStr> Step<T> {
    /// Parse one step.
    ///
    /// # Errors
    ///
    /// Returns a message describing the problem.
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        let (command, arg) = match line.split_once(char::is_whitespace) {
            Some((command, arg)) => (command, arg.trim()),
            None => (line, ""),
        };
        let step = match command {
            "key" => Self::Key(arg.parse().map_err(|e| format!("{e}"))?),
            "type" => Self::Type(required(command, arg)?.to_string()),
            "query" => Self::Query(arg.to_string()),
            "click-trigger" => Self::ClickTrigger,
            "click-outside" => Self::ClickOutside,
            "click" => Self::Click(position(command, arg)?),
            "hover" => Self::Hover(position(command, arg)?),
            "blur" => Self::Blur,
            "clear" => Self::Clear,
            "remove" => Self::Remove(
                required(command, arg)?
                    .parse()
                    .map_err(|_| format!("invalid value: {arg:?}"))?,
            ),
            "open" => Self::Open,
            "close" => Self::Close,
            other => return Err(format!("unknown command: {other:?}")),
        };
        Ok(step)
    }
}

fn required<'a>(command: &str, arg: &'a str) -> Result<&'a str, String> {
    if arg.is_empty() {
        Err(format!("{command} needs an argument"))
    } else {
        Ok(arg)
    }
}

fn position(command: &str, arg: &str) -> Result<usize, String> {
    required(command, arg)?
        .parse()
        .map_err(|_| format!("{command} needs a row number, got {arg:?}"))
}

/// Meaningful lines of a script as `(line number, text)`, skipping blank
/// lines and `#` comments. Line numbers are 1-based.
pub fn script_lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
}

/// Parse a whole script.
///
/// # Errors
///
/// Returns the first line that fails to parse.
pub fn parse_script<T: FromStr>(text: &str) -> Result<Vec<Step<T>>, ScriptError> {
    script_lines(text)
        .map(|(line, source)| Step::parse(source).map_err(|message| ScriptError { line, message }))
        .collect()
}

impl<T: OptionValue> Harness<T> {
    /// Perform one scripted step.
    pub fn run(&mut self, step: &Step<T>) -> &mut Self {
        match step {
            Step::Key(key) => self.press_key(*key),
            Step::Type(text) => self.type_text(text),
            Step::Query(query) => self.set_query(query),
            Step::ClickTrigger => self.click_trigger(),
            Step::ClickOutside => self.click_outside(),
            Step::Click(position) => self.click_option(*position),
            Step::Hover(position) => self.hover(*position),
            Step::Blur => self.blur(),
            Step::Clear => self.clear(),
            Step::Remove(value) => self.remove(value),
            Step::Open => self.open(),
            Step::Close => self.close(),
        }
    }

    /// Perform every step in order.
    pub fn run_all(&mut self, steps: &[Step<T>]) -> &mut Self {
        for step in steps {
            self.run(step);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_steps() {
        assert_eq!(Step::<u32>::parse("key down"), Ok(Step::Key(Key::Down)));
        assert_eq!(Step::<u32>::parse("  key   Escape "), Ok(Step::Key(Key::Escape)));
        assert_eq!(
            Step::<u32>::parse("type ma pu"),
            Ok(Step::Type("ma pu".to_string()))
        );
        assert_eq!(Step::<u32>::parse("query"), Ok(Step::Query(String::new())));
        assert_eq!(Step::<u32>::parse("click 2"), Ok(Step::Click(2)));
        assert_eq!(Step::<u32>::parse("hover 0"), Ok(Step::Hover(0)));
        assert_eq!(Step::<u32>::parse("remove 7"), Ok(Step::Remove(7)));
        assert_eq!(Step::<u32>::parse("click-outside"), Ok(Step::ClickOutside));
        assert_eq!(Step::<u32>::parse("click-trigger"), Ok(Step::ClickTrigger));
        assert_eq!(Step::<u32>::parse("blur"), Ok(Step::Blur));
    }

    #[test]
    fn test_parse_errors() {
        assert!(Step::<u32>::parse("key sideways").is_err());
        assert!(Step::<u32>::parse("type").is_err());
        assert!(Step::<u32>::parse("click first").is_err());
        assert!(Step::<u32>::parse("remove x").is_err());
        assert_eq!(
            Step::<u32>::parse("jump"),
            Err("unknown command: \"jump\"".to_string())
        );
    }

    #[test]
    fn test_parse_script_skips_comments() {
        let script = "# pick beira\n\nkey down\n  # indented comment\nkey enter\n";
        let steps: Vec<Step<u32>> = parse_script(script).unwrap();
        assert_eq!(steps, vec![Step::Key(Key::Down), Step::Key(Key::Enter)]);
    }

    #[test]
    fn test_script_lines() {
        let lines: Vec<_> = script_lines("# c\n\n  open \nclose").collect();
        assert_eq!(lines, [(3, "open"), (4, "close")]);
    }

    #[test]
    fn test_parse_script_reports_line() {
        let err = parse_script::<u32>("key down\n\nkey nowhere\n").unwrap_err();
        assert_eq!(err.line, 3);
        assert!(err.to_string().starts_with("line 3: "));
    }
}
