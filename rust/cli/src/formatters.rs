//! Terminal rendering of bot replies.

use ginga_bot::{ButtonTarget, Reply};

/// Renders a reply as plain text followed by its keyboard, one row per line.
///
/// ```rust
/// use ginga_bot::{Button, Reply};
/// # use ginga_cli::formatters::render_reply;
///
/// let reply = Reply::text("Choose:").with_buttons(vec![vec![
///     Button::callback("Hit", "hit"),
///     Button::callback("Stand", "stand"),
/// ]]);
/// assert_eq!(render_reply(&reply), "Choose:\n  [Hit] [Stand]");
/// ```
pub fn render_reply(reply: &Reply) -> String {
    let mut out = reply.text.clone();
    for row in &reply.buttons {
        let cells: Vec<String> = row
            .iter()
            .map(|b| match &b.target {
                ButtonTarget::Callback(_) => format!("[{}]", b.label),
                ButtonTarget::Url(url) => format!("[{}]({})", b.label, url),
            })
            .collect();
        out.push_str("\n  ");
        out.push_str(&cells.join(" "));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use ginga_bot::Button;

    #[test]
    fn url_buttons_show_their_target() {
        let reply = Reply::text("News").with_buttons(vec![vec![Button::url("📢 Channel", "https://t.me/ginga_news")]]);
        assert_eq!(
            render_reply(&reply),
            "News\n  [📢 Channel](https://t.me/ginga_news)"
        );
    }
}
