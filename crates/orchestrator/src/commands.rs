//! The slash-command interpreter.
//!
//! A static, case-insensitive mapping from slash-prefixed tokens to
//! commands, checked before any AI dispatch. Unknown slash input (and
//! admin tokens from non-admin senders) parses to `None` and falls
//! through to normal AI processing.

/// A recognized slash command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `/help` - command overview.
    Help,
    /// `/info` - company information.
    Info,
    /// `/status` - the sender's account status.
    Status,
    /// `/provider` - active backend name and model.
    Provider,
    /// `/reset` - close the sender's continuation session.
    Reset,
    /// `/language [code]` - show options, or set the preference.
    Language(Option<String>),
    /// `/stats` - aggregate usage statistics (admin).
    Stats,
    /// `/users` - recent users (admin).
    Users,
    /// `/broadcast <text>` - paced fan-out to all users (admin).
    Broadcast(String),
    /// `/cleanup [days]` - prune messages older than the window (admin).
    Cleanup(Option<i64>),
    /// `/sessions` - open continuation count and owners (admin).
    Sessions,
    /// `/clearsession <user>` - drop one continuation (admin).
    ClearSession(String),
    /// `/clearsessions` - drop every continuation (admin).
    ClearSessions,
    /// `/prunesessions` - drop idle continuations (admin).
    PruneSessions,
}

impl Command {
    /// Parse `text` as a slash command.
    ///
    /// Returns `None` for anything that should go to the AI instead:
    /// non-slash text, unknown tokens, admin tokens from non-admin
    /// senders, and commands missing a required argument.
    pub fn parse(text: &str, is_admin: bool) -> Option<Command> {
        let text = text.trim();
        if !text.starts_with('/') {
            return None;
        }

        let mut parts = text.splitn(2, char::is_whitespace);
        let token = parts.next()?.to_lowercase();
        let rest = parts.next().map(str::trim).unwrap_or("");

        let command = match token.as_str() {
            "/help" => Command::Help,
            "/info" => Command::Info,
            "/status" => Command::Status,
            "/provider" => Command::Provider,
            "/reset" => Command::Reset,
            "/language" => {
                if rest.is_empty() {
                    Command::Language(None)
                } else {
                    Command::Language(Some(rest.to_lowercase()))
                }
            }
            "/stats" if is_admin => Command::Stats,
            "/users" if is_admin => Command::Users,
            "/broadcast" if is_admin => {
                if rest.is_empty() {
                    return None;
                }
                Command::Broadcast(rest.to_string())
            }
            "/cleanup" if is_admin => {
                if rest.is_empty() {
                    Command::Cleanup(None)
                } else {
                    Command::Cleanup(Some(rest.parse().ok()?))
                }
            }
            "/sessions" if is_admin => Command::Sessions,
            "/clearsession" if is_admin => {
                if rest.is_empty() {
                    return None;
                }
                Command::ClearSession(rest.to_string())
            }
            "/clearsessions" if is_admin => Command::ClearSessions,
            "/prunesessions" if is_admin => Command::PruneSessions,
            _ => return None,
        };

        Some(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_commands_parse_for_everyone() {
        assert_eq!(Command::parse("/help", false), Some(Command::Help));
        assert_eq!(Command::parse("/HELP", false), Some(Command::Help));
        assert_eq!(Command::parse("  /status  ", false), Some(Command::Status));
        assert_eq!(Command::parse("/reset", false), Some(Command::Reset));
    }

    #[test]
    fn language_argument_is_normalized() {
        assert_eq!(Command::parse("/language", false), Some(Command::Language(None)));
        assert_eq!(
            Command::parse("/language EN", false),
            Some(Command::Language(Some("en".to_string())))
        );
    }

    #[test]
    fn admin_commands_require_admin() {
        assert_eq!(Command::parse("/stats", false), None);
        assert_eq!(Command::parse("/stats", true), Some(Command::Stats));
        assert_eq!(Command::parse("/broadcast hi all", false), None);
        assert_eq!(
            Command::parse("/broadcast hi all", true),
            Some(Command::Broadcast("hi all".to_string()))
        );
    }

    #[test]
    fn broadcast_keeps_original_casing() {
        assert_eq!(
            Command::parse("/Broadcast Promo DISKON besar!", true),
            Some(Command::Broadcast("Promo DISKON besar!".to_string()))
        );
    }

    #[test]
    fn cleanup_days_are_optional() {
        assert_eq!(Command::parse("/cleanup", true), Some(Command::Cleanup(None)));
        assert_eq!(
            Command::parse("/cleanup 7", true),
            Some(Command::Cleanup(Some(7)))
        );
        // Unparsable argument falls through to the AI
        assert_eq!(Command::parse("/cleanup soon", true), None);
    }

    #[test]
    fn unknown_or_incomplete_input_falls_through() {
        assert_eq!(Command::parse("hello", false), None);
        assert_eq!(Command::parse("/frobnicate", true), None);
        assert_eq!(Command::parse("/broadcast", true), None);
        assert_eq!(Command::parse("/clearsession", true), None);
    }
}
