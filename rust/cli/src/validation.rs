//! Parsing of console chat input and command arguments.

use chrono::NaiveDate;

use ginga_bot::{Event, Reply};

/// One line typed into the console chat.
#[derive(Debug, PartialEq, Eq)]
pub enum ConsoleInput {
    Event(Event),
    Quit,
    Invalid(String),
}

/// Parses a console line against the keyboard of the last reply.
///
/// - `/name args` is a command
/// - `[label]` presses the button with that label on the last keyboard
/// - `#data` presses a button by its callback data
/// - `q` or `quit` ends the session
/// - anything else is free text
///
/// # Example
///
/// ```rust
/// use ginga_bot::{Button, Event, Reply};
/// # use ginga_cli::validation::{parse_console_line, ConsoleInput};
///
/// let keyboard = Reply::text("menu").with_buttons(vec![vec![Button::callback("🎰 Slots", "slots")]]);
/// assert_eq!(
///     parse_console_line("[🎰 Slots]", Some(&keyboard)),
///     ConsoleInput::Event(Event::Button("slots".into()))
/// );
/// assert_eq!(
///     parse_console_line("/start 42", None),
///     ConsoleInput::Event(Event::Command { name: "start".into(), args: "42".into() })
/// );
/// assert_eq!(parse_console_line("q", None), ConsoleInput::Quit);
/// ```
pub fn parse_console_line(line: &str, keyboard: Option<&Reply>) -> ConsoleInput {
    let line = line.trim();
    if line.is_empty() {
        return ConsoleInput::Invalid("Empty input".to_string());
    }
    if line.eq_ignore_ascii_case("q") || line.eq_ignore_ascii_case("quit") {
        return ConsoleInput::Quit;
    }

    if let Some(rest) = line.strip_prefix('/') {
        let (name, args) = match rest.split_once(char::is_whitespace) {
            Some((name, args)) => (name, args.trim()),
            None => (rest, ""),
        };
        if name.is_empty() {
            return ConsoleInput::Invalid("Command name missing after '/'".to_string());
        }
        return ConsoleInput::Event(Event::Command {
            name: name.to_string(),
            args: args.to_string(),
        });
    }

    if let Some(data) = line.strip_prefix('#') {
        if data.is_empty() {
            return ConsoleInput::Invalid("Button data missing after '#'".to_string());
        }
        return ConsoleInput::Event(Event::Button(data.to_string()));
    }

    if let Some(label) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
        let found = keyboard
            .into_iter()
            .flat_map(|reply| reply.buttons.iter().flatten())
            .find(|b| b.label.eq_ignore_ascii_case(label.trim()));
        return match found.and_then(|b| b.data()) {
            Some(data) => ConsoleInput::Event(Event::Button(data.to_string())),
            None => ConsoleInput::Invalid(format!("No button labelled '{}'", label.trim())),
        };
    }

    ConsoleInput::Event(Event::Text(line.to_string()))
}

/// Parses `YYYY-MM-DD`.
pub fn parse_date(input: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|e| format!("Invalid date '{}': {} (expected YYYY-MM-DD)", input, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ginga_bot::Button;

    #[test]
    fn url_buttons_cannot_be_pressed() {
        let reply = Reply::text("x").with_buttons(vec![vec![Button::url("📢 Channel", "https://t.me/x")]]);
        assert!(matches!(
            parse_console_line("[📢 Channel]", Some(&reply)),
            ConsoleInput::Invalid(_)
        ));
    }

    #[test]
    fn plain_text_passes_through() {
        assert_eq!(
            parse_console_line("  100 ", None),
            ConsoleInput::Event(Event::Text("100".into()))
        );
        assert!(matches!(parse_console_line("   ", None), ConsoleInput::Invalid(_)));
        assert!(matches!(parse_console_line("/", None), ConsoleInput::Invalid(_)));
    }

    #[test]
    fn dates_are_iso() {
        assert_eq!(
            parse_date("2025-03-01"),
            Ok(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap())
        );
        assert!(parse_date("01.03.2025").is_err());
    }
}
