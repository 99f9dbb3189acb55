//! Static replies for the simple commands and the plain-text fallback

pub const GREETING_TEXT: &str = "👋 KinethosBot here. Try /ping, set up your profile with /onboard, or ask /coach anything.";

pub const PONG_TEXT: &str = "pong 🏓";

/// Plain text that is treated like `/ping`
pub fn is_ping_alias(text: &str) -> bool {
    text.trim().eq_ignore_ascii_case("ping")
}

/// Unrecognised slash commands are dropped rather than echoed.
pub fn looks_like_command(text: &str) -> bool {
    text.trim_start().starts_with('/')
}

pub fn echo_text(text: &str) -> String {
    format!("Echo: {}", text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ping_alias() {
        assert!(is_ping_alias("ping"));
        assert!(is_ping_alias(" Ping \n"));
        assert!(!is_ping_alias("ping me later"));
    }

    #[test]
    fn test_echo_is_verbatim_after_prefix() {
        assert_eq!(echo_text("hi  there"), "Echo: hi  there");
        assert_eq!(echo_text(""), "Echo: ");
    }

    #[test]
    fn test_command_shape() {
        assert!(looks_like_command("/weather"));
        assert!(!looks_like_command("a/b"));
    }
}
