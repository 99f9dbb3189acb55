//! `/coach` command: ask the text-generation model for training advice

use indoc::indoc;

use crate::telegram::update::IncomingMessage;

pub const USAGE_TEXT: &str = indoc! {"
    🤖 Ask the coach a question:
    /coach how should I taper for a half marathon?

    Or reply to any message with /coach to get feedback on it."};

pub const THINKING_TEXT: &str = "🤔 Thinking about it...";

pub const APOLOGY_TEXT: &str = "😔 Sorry, the coach is unavailable right now. Please try again in a moment.";

/// Picks the question for `/coach`.
///
/// Priority: the command arguments, then the text (or caption) of the message
/// being replied to. Whitespace-only candidates are skipped.
pub fn extract_prompt(args: &str, message: &IncomingMessage) -> Option<String> {
    let args = args.trim();
    if !args.is_empty() {
        return Some(args.to_string());
    }

    message
        .reply_to_message
        .as_deref()
        .and_then(IncomingMessage::text_or_caption)
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}
