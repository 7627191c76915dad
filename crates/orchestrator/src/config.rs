//! Orchestrator configuration.

use std::env;
use std::time::Duration;

use language::DEFAULT_LANGUAGE;

/// Which backend the orchestrator dispatches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProviderKind {
    /// OpenAI chat completions (stateless).
    #[default]
    OpenAi,
    /// Anthropic messages API (stateless).
    Anthropic,
    /// Gemini chat sessions (stateful).
    Gemini,
}

impl ProviderKind {
    /// Parse a provider name, as used in `KABAR_PROVIDER`.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "openai" => Some(Self::OpenAi),
            "anthropic" => Some(Self::Anthropic),
            "gemini" => Some(Self::Gemini),
            _ => None,
        }
    }
}

/// Static company metadata shown by `/info` and injected into prompts.
#[derive(Debug, Clone, Default)]
pub struct CompanyInfo {
    /// Company or shop name.
    pub name: String,
    /// Short description of what the company does.
    pub description: String,
    /// Opening hours, free-form.
    pub hours: String,
    /// Contact line (phone, email, address).
    pub contact: String,
}

/// Orchestrator configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Active provider backend.
    pub provider: ProviderKind,

    /// Default language code when a user has no preference.
    pub default_language: String,

    /// Sender IDs allowed to run admin commands.
    pub admin_ids: Vec<String>,

    /// How many persisted messages to replay as history per turn.
    pub history_limit: i64,

    /// Maximum reply length in characters; longer replies are truncated.
    pub max_response_chars: usize,

    /// Deadline for one provider call; exceeding it is a failure.
    pub provider_timeout: Duration,

    /// Continuations idle longer than this are reopened from history.
    pub session_idle: Duration,

    /// Fixed delay between broadcast sends.
    pub broadcast_delay: Duration,

    /// Default retention window for `/cleanup`.
    pub retention_days: i64,

    /// Company metadata block.
    pub company: CompanyInfo,

    /// Optional override for the language pack's base system prompt.
    pub base_prompt: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider: ProviderKind::OpenAi,
            default_language: DEFAULT_LANGUAGE.to_string(),
            admin_ids: Vec::new(),
            history_limit: 10,
            max_response_chars: 4000,
            provider_timeout: Duration::from_secs(30),
            session_idle: Duration::from_secs(30 * 60),
            broadcast_delay: Duration::from_millis(1100),
            retention_days: 30,
            company: CompanyInfo::default(),
            base_prompt: None,
        }
    }
}

impl Config {
    /// Create configuration from environment variables.
    ///
    /// All variables are optional:
    /// - `KABAR_PROVIDER` - active backend: openai, anthropic, gemini (default: openai)
    /// - `KABAR_DEFAULT_LANGUAGE` - default language code (default: id)
    /// - `KABAR_ADMIN_IDS` - comma-separated admin sender IDs
    /// - `KABAR_HISTORY_LIMIT` - history messages per turn (default: 10)
    /// - `KABAR_MAX_RESPONSE_CHARS` - reply truncation limit (default: 4000)
    /// - `KABAR_PROVIDER_TIMEOUT_SECS` - provider call deadline (default: 30)
    /// - `KABAR_SESSION_IDLE_MINUTES` - continuation idle timeout (default: 30)
    /// - `KABAR_BROADCAST_DELAY_MS` - delay between broadcast sends (default: 1100)
    /// - `KABAR_RETENTION_DAYS` - default /cleanup window (default: 30)
    /// - `KABAR_COMPANY_NAME` / `KABAR_COMPANY_DESCRIPTION` /
    ///   `KABAR_COMPANY_HOURS` / `KABAR_COMPANY_CONTACT` - company block
    /// - `KABAR_BASE_PROMPT` - override for the per-language base prompt
    ///
    /// The provider credential itself is read by the provider crate
    /// (`OPENAI_API_KEY`, `ANTHROPIC_API_KEY`, `GEMINI_API_KEY`); a
    /// missing credential for the selected provider fails at startup.
    pub fn from_env() -> Self {
        let provider = env::var("KABAR_PROVIDER")
            .ok()
            .and_then(|v| ProviderKind::parse(&v))
            .unwrap_or_default();

        let default_language =
            env::var("KABAR_DEFAULT_LANGUAGE").unwrap_or_else(|_| DEFAULT_LANGUAGE.to_string());

        let admin_ids = env::var("KABAR_ADMIN_IDS")
            .map(|v| {
                v.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let history_limit = env::var("KABAR_HISTORY_LIMIT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(10);

        let max_response_chars = env::var("KABAR_MAX_RESPONSE_CHARS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(4000);

        let provider_timeout = env::var("KABAR_PROVIDER_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(30));

        let session_idle = env::var("KABAR_SESSION_IDLE_MINUTES")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(|m: u64| Duration::from_secs(m * 60))
            .unwrap_or(Duration::from_secs(30 * 60));

        let broadcast_delay = env::var("KABAR_BROADCAST_DELAY_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_millis)
            .unwrap_or(Duration::from_millis(1100));

        let retention_days = env::var("KABAR_RETENTION_DAYS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(30);

        let company = CompanyInfo {
            name: env::var("KABAR_COMPANY_NAME").unwrap_or_default(),
            description: env::var("KABAR_COMPANY_DESCRIPTION").unwrap_or_default(),
            hours: env::var("KABAR_COMPANY_HOURS").unwrap_or_default(),
            contact: env::var("KABAR_COMPANY_CONTACT").unwrap_or_default(),
        };

        let base_prompt = env::var("KABAR_BASE_PROMPT").ok().filter(|v| !v.is_empty());

        Self {
            provider,
            default_language,
            admin_ids,
            history_limit,
            max_response_chars,
            provider_timeout,
            session_idle,
            broadcast_delay,
            retention_days,
            company,
            base_prompt,
        }
    }

    /// Whether `sender_id` may run admin commands.
    pub fn is_admin(&self, sender_id: &str) -> bool {
        self.admin_ids.iter().any(|id| id == sender_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_kind_parsing() {
        assert_eq!(ProviderKind::parse("openai"), Some(ProviderKind::OpenAi));
        assert_eq!(ProviderKind::parse(" Gemini "), Some(ProviderKind::Gemini));
        assert_eq!(
            ProviderKind::parse("ANTHROPIC"),
            Some(ProviderKind::Anthropic)
        );
        assert_eq!(ProviderKind::parse("bard"), None);
    }

    #[test]
    fn admin_check() {
        let config = Config {
            admin_ids: vec!["+628999".to_string()],
            ..Config::default()
        };
        assert!(config.is_admin("+628999"));
        assert!(!config.is_admin("+628111"));
    }

    #[test]
    fn defaults_are_sane() {
        let config = Config::default();
        assert_eq!(config.default_language, "id");
        assert_eq!(config.history_limit, 10);
        assert_eq!(config.provider, ProviderKind::OpenAi);
    }
}
