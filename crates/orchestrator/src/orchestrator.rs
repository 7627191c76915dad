//! The conversation orchestrator: one inbound text in, one reply out.

use std::collections::HashMap;
use std::sync::Arc;

use anthropic_provider::AnthropicProvider;
use broadcaster::Broadcaster;
use database::{analytics, message, user as user_store, Database, Message, User};
use gemini_provider::GeminiProvider;
use language::{detect, LanguagePack, Packs};
use openai_provider::OpenAiProvider;
use provider_core::{Adapter, GenerateLimits, ProviderError, Turn};
use rand::Rng;
use tokio::sync::{Mutex, RwLock};
use tokio::time::timeout;
use tracing::{error, info, warn};
use transport::MessageSender;

use crate::commands::Command;
use crate::config::{Config, ProviderKind};
use crate::error::OrchestratorError;
use crate::prompt::build_system_prompt;
use crate::sessions::SessionTable;

/// Build the adapter for the configured provider kind.
///
/// A missing credential surfaces as a configuration error here, before
/// the process accepts any traffic.
pub fn build_adapter(kind: ProviderKind) -> Result<Adapter, OrchestratorError> {
    let adapter = match kind {
        ProviderKind::OpenAi => Adapter::Stateless(Arc::new(OpenAiProvider::from_env()?)),
        ProviderKind::Anthropic => Adapter::Stateless(Arc::new(AnthropicProvider::from_env()?)),
        ProviderKind::Gemini => Adapter::Stateful(Arc::new(GeminiProvider::from_env()?)),
    };
    Ok(adapter)
}

/// The conversation orchestrator.
///
/// Owns the active adapter, the session table, and the per-user turn
/// locks. One instance serves every user; each inbound message becomes
/// one call to [`Orchestrator::handle_message`].
pub struct Orchestrator<S: MessageSender> {
    adapter: RwLock<Adapter>,
    db: Database,
    packs: Packs,
    config: Config,
    sessions: SessionTable,
    turn_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
    broadcaster: Broadcaster<S>,
}

impl<S: MessageSender> Orchestrator<S> {
    /// Create an orchestrator over an already-built adapter.
    pub fn new(adapter: Adapter, db: Database, sender: Arc<S>, config: Config) -> Self {
        let sessions = SessionTable::new(db.clone());
        let broadcaster = Broadcaster::new(sender, config.broadcast_delay);

        Self {
            adapter: RwLock::new(adapter),
            db,
            packs: Packs::builtin(),
            config,
            sessions,
            turn_locks: Mutex::new(HashMap::new()),
            broadcaster,
        }
    }

    /// Create an orchestrator from environment configuration.
    pub fn from_env(db: Database, sender: Arc<S>) -> Result<Self, OrchestratorError> {
        let config = Config::from_env();
        let adapter = build_adapter(config.provider)?;
        Ok(Self::new(adapter, db, sender, config))
    }

    /// The orchestrator configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The session table (admin surfaces inspect it).
    pub fn sessions(&self) -> &SessionTable {
        &self.sessions
    }

    /// Replace the active adapter and clear every continuation.
    ///
    /// Continuation handles are provider-specific; a handle opened
    /// against the old backend is useless against the new one.
    pub async fn set_adapter(&self, adapter: Adapter) {
        info!("Switching provider to {}", adapter.name());
        *self.adapter.write().await = adapter;

        let cleared = self.sessions.clear_all().await;
        if cleared > 0 {
            info!("Cleared {} continuations on provider switch", cleared);
        }
    }

    /// Handle one inbound message and produce the reply text.
    ///
    /// Always returns user-facing text: internal failures are logged and
    /// mapped to a localized fallback, never echoed to the user. Turns
    /// from the same user are serialized by a per-user lock so two
    /// near-simultaneous messages cannot race on history and session
    /// state.
    pub async fn handle_message(&self, sender_id: &str, text: &str) -> String {
        let turn_lock = {
            let mut locks = self.turn_locks.lock().await;
            Arc::clone(locks.entry(sender_id.to_string()).or_default())
        };
        let guard = turn_lock.lock().await;

        let reply = match self.process_turn(sender_id, text.trim()).await {
            Ok(reply) => reply,
            Err(e) => {
                error!("Turn failed for {}: {}", sender_id, e);
                self.fallback_reply(sender_id).await
            }
        };

        drop(guard);
        self.release_turn_lock(sender_id, &turn_lock).await;
        reply
    }

    /// Drop a sender's lock entry once no other turn holds or awaits it,
    /// so the map does not accumulate one entry per sender ever seen.
    async fn release_turn_lock(&self, sender_id: &str, held: &Arc<Mutex<()>>) {
        let mut locks = self.turn_locks.lock().await;
        // Two strong refs mean the map's clone plus ours; a waiting turn
        // would hold a third. Cloning requires the map lock, so the check
        // and removal are atomic.
        if Arc::strong_count(held) <= 2 {
            locks.remove(sender_id);
        }
    }

    async fn process_turn(
        &self,
        sender_id: &str,
        text: &str,
    ) -> Result<String, OrchestratorError> {
        let pool = self.db.pool();

        let mut user = match user_store::find_user(pool, sender_id).await? {
            Some(user) => user,
            None => {
                info!("First contact from {}", sender_id);
                user_store::create_user(pool, sender_id, "").await?
            }
        };

        // Commands short-circuit before any AI dispatch and are not part
        // of the conversation history.
        if let Some(command) = Command::parse(text, self.config.is_admin(sender_id)) {
            let pack = self.pack_for(user.language.as_deref());
            return self.execute_command(&user, pack, command).await;
        }

        // Explicit preference wins; otherwise one confident detection
        // becomes the preference. Indeterminate input changes nothing.
        if user.language.is_none() {
            if let Some(code) = detect(text) {
                user_store::set_language(pool, sender_id, code).await?;
                user.language = Some(code.to_string());
                info!("Detected language '{}' for {}", code, sender_id);
            }
        }
        let pack = self.pack_for(user.language.as_deref());

        // First-ever message: welcome instead of dispatching.
        if user.message_count == 0 {
            message::append_message(pool, sender_id, text, true).await?;
            let welcome = self.render(pack, "welcome", &[("company", &self.config.company.name)]);
            message::append_message(pool, sender_id, &welcome, false).await?;
            return Ok(welcome);
        }

        // History is fetched before the inbound append, so the current
        // message reaches the adapter exactly once.
        let history = message::get_history(pool, sender_id, self.config.history_limit).await?;
        let turns = to_turns(&history);
        let prompt = build_system_prompt(
            pack,
            self.config.base_prompt.as_deref(),
            &self.config.company,
            &user.name,
        );

        message::append_message(pool, sender_id, text, true).await?;

        let reply = self.dispatch(sender_id, &prompt, &turns, text).await?;
        let reply = truncate_chars(reply, self.config.max_response_chars);
        message::append_message(pool, sender_id, &reply, false).await?;

        Ok(reply)
    }

    /// One bounded adapter call. Stateful backends go through the
    /// session table: resume-or-open before the send, put back only on
    /// success, discard on any failure so the next turn reopens from
    /// persisted history.
    async fn dispatch(
        &self,
        user_id: &str,
        system_prompt: &str,
        history: &[Turn],
        text: &str,
    ) -> Result<String, OrchestratorError> {
        let adapter = self.adapter.read().await.clone();
        let limits = GenerateLimits::default();
        let deadline = self.config.provider_timeout;

        match adapter {
            Adapter::Stateless(provider) => {
                let reply = timeout(
                    deadline,
                    provider.generate(system_prompt, history, text, &limits),
                )
                .await
                .map_err(|_| ProviderError::Timeout)??;
                Ok(reply)
            }
            Adapter::Stateful(provider) => {
                let resumed = self
                    .sessions
                    .resume(user_id, self.config.session_idle)
                    .await
                    .filter(|c| c.belongs_to(provider.name()));

                let mut continuation = match resumed {
                    Some(continuation) => continuation,
                    None => timeout(deadline, provider.open(system_prompt, history))
                        .await
                        .map_err(|_| ProviderError::Timeout)??,
                };

                match timeout(deadline, provider.send(&mut continuation, text, &limits)).await {
                    Ok(Ok(reply)) => {
                        self.sessions.put(user_id, continuation).await;
                        Ok(reply)
                    }
                    Ok(Err(e)) => {
                        self.sessions.discard(user_id).await;
                        Err(e.into())
                    }
                    Err(_) => {
                        self.sessions.discard(user_id).await;
                        Err(ProviderError::Timeout.into())
                    }
                }
            }
        }
    }

    async fn execute_command(
        &self,
        user: &User,
        pack: &LanguagePack,
        command: Command,
    ) -> Result<String, OrchestratorError> {
        let pool = self.db.pool();

        let reply = match command {
            Command::Help => {
                let mut help =
                    self.render(pack, "help", &[("company", &self.config.company.name)]);
                if self.config.is_admin(&user.id) {
                    help.push_str("\n\n");
                    help.push_str(&self.render(pack, "help_admin", &[]));
                }
                help
            }

            Command::Info => self.render(
                pack,
                "info",
                &[
                    ("company", self.config.company.name.as_str()),
                    ("description", self.config.company.description.as_str()),
                    ("hours", self.config.company.hours.as_str()),
                    ("contact", self.config.company.contact.as_str()),
                ],
            ),

            Command::Status => {
                let provider = self.adapter.read().await.name().to_string();
                let name = if user.name.is_empty() {
                    user.id.as_str()
                } else {
                    user.name.as_str()
                };
                let messages = user.message_count.to_string();
                let since: String = user.created_at.chars().take(10).collect();
                self.render(
                    pack,
                    "status",
                    &[
                        ("name", name),
                        ("language", pack.display_name),
                        ("messages", &messages),
                        ("since", &since),
                        ("provider", &provider),
                    ],
                )
            }

            Command::Provider => {
                let adapter = self.adapter.read().await;
                self.render(
                    pack,
                    "provider_info",
                    &[("provider", adapter.name()), ("model", adapter.model())],
                )
            }

            Command::Reset => {
                self.sessions.discard(&user.id).await;
                self.render(pack, "reset_done", &[])
            }

            Command::Language(None) => self.render(
                pack,
                "language_options",
                &[("options", &self.packs.options_list())],
            ),

            Command::Language(Some(code)) => {
                if self.packs.supports(&code) {
                    user_store::set_language(pool, &user.id, &code).await?;
                    let new_pack = self.packs.get_or_default(&code);
                    self.render(
                        new_pack,
                        "language_set",
                        &[("language", new_pack.display_name)],
                    )
                } else {
                    self.render(
                        pack,
                        "language_options",
                        &[("options", &self.packs.options_list())],
                    )
                }
            }

            Command::Stats => {
                let totals = analytics::get_analytics(pool).await?;
                let today = analytics::today_stats(pool).await?;
                self.render(
                    pack,
                    "stats",
                    &[
                        ("total_users", &totals.total_users.to_string()),
                        ("total_messages", &totals.total_messages.to_string()),
                        ("today_messages", &today.messages.to_string()),
                        ("today_users", &today.unique_users.to_string()),
                    ],
                )
            }

            Command::Users => {
                let users = user_store::recent_users(pool, 10).await?;
                let mut lines = vec![self.render(
                    pack,
                    "users_header",
                    &[("count", &users.len().to_string())],
                )];
                for u in &users {
                    let name = if u.name.is_empty() { "-" } else { u.name.as_str() };
                    lines.push(format!("{} {} ({} msg)", u.id, name, u.message_count));
                }
                lines.join("\n")
            }

            Command::Broadcast(text) => {
                // The issuing admin only hears their own broadcast if
                // they are also a regular user (have actually messaged).
                let recipients: Vec<String> = user_store::list_users(pool)
                    .await?
                    .into_iter()
                    .filter(|u| u.id != user.id || u.message_count > 0)
                    .map(|u| u.id)
                    .collect();
                let report = self.broadcaster.broadcast(&recipients, &text).await;
                self.render(
                    pack,
                    "broadcast_done",
                    &[
                        ("sent", &report.sent.to_string()),
                        ("failed", &report.failed.to_string()),
                    ],
                )
            }

            Command::Cleanup(days) => {
                let days = days.unwrap_or(self.config.retention_days);
                let removed = message::prune_older_than(pool, days).await?;
                self.render(
                    pack,
                    "cleanup_done",
                    &[
                        ("removed", &removed.to_string()),
                        ("days", &days.to_string()),
                    ],
                )
            }

            Command::Sessions => {
                let owners = self.sessions.owners().await;
                self.render(
                    pack,
                    "sessions_status",
                    &[
                        ("count", &owners.len().to_string()),
                        ("owners", &owners.join("\n")),
                    ],
                )
            }

            Command::ClearSession(target) => {
                if self.sessions.discard(&target).await {
                    self.render(pack, "session_cleared", &[("user", &target)])
                } else {
                    self.render(pack, "session_missing", &[("user", &target)])
                }
            }

            Command::ClearSessions => {
                let count = self.sessions.clear_all().await;
                self.render(pack, "sessions_cleared", &[("count", &count.to_string())])
            }

            Command::PruneSessions => {
                let count = self.sessions.prune_idle(self.config.session_idle).await;
                self.render(pack, "sessions_pruned", &[("count", &count.to_string())])
            }
        };

        Ok(reply)
    }

    /// Localized fallback for a failed turn, chosen at random among the
    /// pack's fallback templates.
    async fn fallback_reply(&self, sender_id: &str) -> String {
        let language = match user_store::find_user(self.db.pool(), sender_id).await {
            Ok(Some(user)) => user.language,
            _ => None,
        };
        let pack = self.pack_for(language.as_deref());

        let key = format!("fallback_{}", rand::thread_rng().gen_range(1..=3));
        self.render(pack, &key, &[])
    }

    fn pack_for(&self, language: Option<&str>) -> &LanguagePack {
        let code = language.unwrap_or(&self.config.default_language);
        self.packs.get_or_default(code)
    }

    fn render(&self, pack: &LanguagePack, key: &str, args: &[(&str, &str)]) -> String {
        pack.render(key, args).unwrap_or_else(|| {
            warn!("Missing template '{}' in language pack '{}'", key, pack.code);
            String::new()
        })
    }
}

fn to_turns(history: &[Message]) -> Vec<Turn> {
    history
        .iter()
        .map(|m| {
            if m.from_user {
                Turn::user(m.content.as_str())
            } else {
                Turn::assistant(m.content.as_str())
            }
        })
        .collect()
}

fn truncate_chars(text: String, max: usize) -> String {
    if text.chars().count() <= max {
        return text;
    }
    text.chars().take(max).collect()
}
