//! End-to-end conversation flow tests over mock providers.

use std::sync::Arc;
use std::time::{Duration, Instant};

use database::{message, user, Database};
use language::Packs;
use mock_provider::{
    DelayedProvider, EchoProvider, FailingProvider, ScriptedProvider, SessionEchoProvider,
};
use orchestrator::{CompanyInfo, Config, Orchestrator};
use provider_core::Adapter;
use transport::RecordingSender;

const USER: &str = "+628111";
const ADMIN: &str = "+628000";

async fn test_db() -> Database {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    db.migrate().await.unwrap();
    db
}

fn test_config() -> Config {
    Config {
        admin_ids: vec![ADMIN.to_string()],
        broadcast_delay: Duration::from_millis(20),
        company: CompanyInfo {
            name: "Toko Maju".to_string(),
            description: "Toko elektronik".to_string(),
            hours: "09:00-17:00".to_string(),
            contact: "+628123".to_string(),
        },
        ..Config::default()
    }
}

async fn orchestrator_with(adapter: Adapter) -> Orchestrator<RecordingSender> {
    Orchestrator::new(
        adapter,
        test_db().await,
        Arc::new(RecordingSender::new()),
        test_config(),
    )
}

fn echo_adapter() -> Adapter {
    Adapter::Stateless(Arc::new(EchoProvider::new()))
}

#[tokio::test]
async fn first_message_gets_localized_welcome() {
    let bot = orchestrator_with(echo_adapter()).await;

    let reply = bot.handle_message(USER, "Halo, apa kabar?").await;

    assert!(reply.contains("Selamat datang"), "got: {reply}");
    assert!(reply.contains("Toko Maju"));
}

#[tokio::test]
async fn welcome_persists_both_sides_and_detects_language() {
    let db = test_db().await;
    let bot = Orchestrator::new(
        echo_adapter(),
        db.clone(),
        Arc::new(RecordingSender::new()),
        test_config(),
    );

    bot.handle_message(USER, "Halo, apa kabar?").await;

    let stored = user::get_user(db.pool(), USER).await.unwrap();
    assert_eq!(stored.language.as_deref(), Some("id"));
    assert_eq!(stored.message_count, 1);

    let history = message::get_history(db.pool(), USER, 10).await.unwrap();
    assert_eq!(history.len(), 2);
    assert!(history[0].from_user);
    assert!(!history[1].from_user);
}

#[tokio::test]
async fn english_greeting_gets_english_welcome() {
    let bot = orchestrator_with(echo_adapter()).await;

    let reply = bot.handle_message(USER, "Hello, how are you today?").await;

    assert!(reply.contains("Welcome"), "got: {reply}");
}

#[tokio::test]
async fn second_message_dispatches_to_the_provider() {
    let adapter = Adapter::Stateless(Arc::new(ScriptedProvider::new(["Stok masih ada."])));
    let db = test_db().await;
    let bot = Orchestrator::new(
        adapter,
        db.clone(),
        Arc::new(RecordingSender::new()),
        test_config(),
    );

    bot.handle_message(USER, "Halo, apa kabar?").await;
    let reply = bot.handle_message(USER, "Apakah stok masih ada?").await;

    assert_eq!(reply, "Stok masih ada.");

    let history = message::get_history(db.pool(), USER, 10).await.unwrap();
    assert_eq!(history.len(), 4);
    assert_eq!(history[2].content, "Apakah stok masih ada?");
    assert_eq!(history[3].content, "Stok masih ada.");
}

#[tokio::test]
async fn status_command_replies_in_the_detected_language() {
    let bot = orchestrator_with(echo_adapter()).await;

    bot.handle_message(USER, "Halo, apa kabar?").await;
    let reply = bot.handle_message(USER, "/status").await;

    assert!(reply.contains("Status Anda"), "got: {reply}");
    assert!(reply.contains("Bahasa Indonesia"));
    assert!(reply.contains("echo"));
}

#[tokio::test]
async fn command_replies_are_not_persisted() {
    let db = test_db().await;
    let bot = Orchestrator::new(
        echo_adapter(),
        db.clone(),
        Arc::new(RecordingSender::new()),
        test_config(),
    );

    bot.handle_message(USER, "Halo, apa kabar?").await;
    bot.handle_message(USER, "/help").await;

    let history = message::get_history(db.pool(), USER, 10).await.unwrap();
    assert_eq!(history.len(), 2);
}

#[tokio::test]
async fn invalid_language_code_shows_options() {
    let bot = orchestrator_with(echo_adapter()).await;
    bot.handle_message(USER, "Halo, apa kabar?").await;

    let reply = bot.handle_message(USER, "/language xx").await;

    assert!(reply.contains("en - English"), "got: {reply}");
    assert!(reply.contains("id - Bahasa Indonesia"));
}

#[tokio::test]
async fn language_command_sets_and_is_idempotent() {
    let db = test_db().await;
    let bot = Orchestrator::new(
        echo_adapter(),
        db.clone(),
        Arc::new(RecordingSender::new()),
        test_config(),
    );
    bot.handle_message(USER, "Halo, apa kabar?").await;

    let first = bot.handle_message(USER, "/language en").await;
    let second = bot.handle_message(USER, "/language en").await;

    assert_eq!(first, "Language set to English.");
    assert_eq!(first, second);

    let stored = user::get_user(db.pool(), USER).await.unwrap();
    assert_eq!(stored.language.as_deref(), Some("en"));
}

#[tokio::test]
async fn admin_token_from_non_admin_goes_to_the_ai() {
    let bot = orchestrator_with(echo_adapter()).await;
    bot.handle_message(USER, "Halo, apa kabar?").await;

    let reply = bot.handle_message(USER, "/stats").await;

    // Not the stats template; the echo provider saw the raw text.
    assert_eq!(reply, "/stats");
}

#[tokio::test]
async fn help_includes_admin_section_only_for_admins() {
    let bot = orchestrator_with(echo_adapter()).await;

    bot.handle_message(USER, "Halo, apa kabar?").await;
    bot.handle_message(ADMIN, "Halo, apa kabar?").await;

    let plain = bot.handle_message(USER, "/help").await;
    let admin = bot.handle_message(ADMIN, "/help").await;

    assert!(!plain.contains("/broadcast"));
    assert!(admin.contains("/broadcast"));
}

#[tokio::test]
async fn provider_failure_gives_fallback_and_keeps_inbound() {
    let adapter = Adapter::Stateless(Arc::new(FailingProvider::new()));
    let db = test_db().await;
    let bot = Orchestrator::new(
        adapter,
        db.clone(),
        Arc::new(RecordingSender::new()),
        test_config(),
    );

    bot.handle_message(USER, "Halo, apa kabar?").await;
    let reply = bot.handle_message(USER, "Masih buka?").await;

    let packs = Packs::builtin();
    let pack = packs.get_or_default("id");
    let fallbacks: Vec<String> = (1..=3)
        .map(|n| pack.render(&format!("fallback_{n}"), &[]).unwrap())
        .collect();
    assert!(fallbacks.contains(&reply), "got: {reply}");

    // Inbound persisted, no assistant row for the failed call.
    let history = message::get_history(db.pool(), USER, 10).await.unwrap();
    assert_eq!(history.len(), 3);
    assert_eq!(history[2].content, "Masih buka?");
    assert!(history[2].from_user);

    let stored = user::get_user(db.pool(), USER).await.unwrap();
    assert_eq!(stored.message_count, 2);
}

#[tokio::test]
async fn store_failure_gives_fallback_not_the_reply() {
    let adapter = Adapter::Stateless(Arc::new(ScriptedProvider::new(["Stok masih ada."])));
    let db = test_db().await;
    let bot = Orchestrator::new(
        adapter,
        db.clone(),
        Arc::new(RecordingSender::new()),
        test_config(),
    );

    bot.handle_message(USER, "Halo, apa kabar?").await;

    // Every store operation fails from here on.
    db.close().await;

    let reply = bot.handle_message(USER, "Masih buka?").await;

    assert_ne!(reply, "Stok masih ada.");
    let packs = Packs::builtin();
    let pack = packs.get_or_default("id");
    let fallbacks: Vec<String> = (1..=3)
        .map(|n| pack.render(&format!("fallback_{n}"), &[]).unwrap())
        .collect();
    assert!(fallbacks.contains(&reply), "got: {reply}");
}

#[tokio::test]
async fn timed_out_call_falls_back_and_keeps_inbound() {
    let adapter = Adapter::Stateless(Arc::new(DelayedProvider::with_millis(
        EchoProvider::new(),
        500,
    )));
    let config = Config {
        provider_timeout: Duration::from_millis(50),
        ..test_config()
    };
    let db = test_db().await;
    let bot = Orchestrator::new(adapter, db.clone(), Arc::new(RecordingSender::new()), config);

    bot.handle_message(USER, "Halo, apa kabar?").await;
    let reply = bot.handle_message(USER, "Masih buka?").await;

    assert_ne!(reply, "Masih buka?"); // the echo never arrived

    // Inbound persisted, no assistant row for the timed-out call.
    let history = message::get_history(db.pool(), USER, 10).await.unwrap();
    assert_eq!(history.len(), 3);
    assert!(history[2].from_user);
}

#[tokio::test]
async fn broadcast_reaches_every_user_with_pacing() {
    let db = test_db().await;
    let sender = Arc::new(RecordingSender::new());
    let bot = Orchestrator::new(echo_adapter(), db.clone(), sender.clone(), test_config());

    for id in ["+628111", "+628222", "+628333"] {
        user::create_user(db.pool(), id, "").await.unwrap();
    }

    let start = Instant::now();
    let reply = bot.handle_message(ADMIN, "/broadcast Promo besar!").await;

    // Three stored users; the admin has never messaged, so they are
    // not their own recipient.
    assert!(reply.contains('3'), "got: {reply}");
    assert_eq!(sender.count().await, 3);
    assert!(start.elapsed() >= Duration::from_millis(40));

    let sent = sender.sent().await;
    assert!(sent.iter().all(|(_, text)| text == "Promo besar!"));
    assert!(sent.iter().all(|(recipient, _)| recipient != ADMIN));
}

#[tokio::test]
async fn continuation_is_reused_and_rebuilt_after_failure() {
    let provider = Arc::new(SessionEchoProvider::new());
    let adapter = Adapter::Stateful(provider.clone());
    let bot = orchestrator_with(adapter).await;

    bot.handle_message(USER, "Halo, apa kabar?").await;
    assert_eq!(provider.opens(), 0); // welcome short-circuits

    bot.handle_message(USER, "pesan kedua").await;
    assert_eq!(provider.opens(), 1);

    bot.handle_message(USER, "pesan ketiga").await;
    assert_eq!(provider.opens(), 1); // resumed, not reopened
    assert_eq!(bot.sessions().count().await, 1);

    provider.fail_next();
    bot.handle_message(USER, "pesan keempat").await;
    assert_eq!(bot.sessions().count().await, 0); // handle discarded

    bot.handle_message(USER, "pesan kelima").await;
    assert_eq!(provider.opens(), 2); // rebuilt from persisted history
    assert_eq!(bot.sessions().count().await, 1);
}

#[tokio::test]
async fn reset_clears_the_session_but_keeps_history() {
    let provider = Arc::new(SessionEchoProvider::new());
    let adapter = Adapter::Stateful(provider.clone());
    let db = test_db().await;
    let bot = Orchestrator::new(
        adapter,
        db.clone(),
        Arc::new(RecordingSender::new()),
        test_config(),
    );

    bot.handle_message(USER, "Halo, apa kabar?").await;
    bot.handle_message(USER, "pesan kedua").await;
    assert_eq!(bot.sessions().count().await, 1);

    let reply = bot.handle_message(USER, "/reset").await;
    assert!(reply.contains("Selesai"), "got: {reply}");
    assert_eq!(bot.sessions().count().await, 0);

    let history = message::get_history(db.pool(), USER, 10).await.unwrap();
    assert_eq!(history.len(), 4);

    bot.handle_message(USER, "pesan ketiga").await;
    assert_eq!(provider.opens(), 2);
}

#[tokio::test]
async fn replies_are_truncated_to_the_configured_limit() {
    let config = Config {
        max_response_chars: 5,
        ..test_config()
    };
    let bot = Orchestrator::new(
        echo_adapter(),
        test_db().await,
        Arc::new(RecordingSender::new()),
        config,
    );

    bot.handle_message(USER, "Halo, apa kabar?").await;
    let reply = bot.handle_message(USER, "panjang sekali pesannya").await;

    assert_eq!(reply.chars().count(), 5);
}

#[tokio::test]
async fn switching_the_adapter_clears_sessions() {
    let provider = Arc::new(SessionEchoProvider::new());
    let bot = orchestrator_with(Adapter::Stateful(provider.clone())).await;

    bot.handle_message(USER, "Halo, apa kabar?").await;
    bot.handle_message(USER, "pesan kedua").await;
    assert_eq!(bot.sessions().count().await, 1);

    bot.set_adapter(echo_adapter()).await;
    assert_eq!(bot.sessions().count().await, 0);

    let reply = bot.handle_message(USER, "pesan ketiga").await;
    assert_eq!(reply, "pesan ketiga");
}

#[tokio::test]
async fn admin_stats_reflect_the_store() {
    let db = test_db().await;
    let bot = Orchestrator::new(
        echo_adapter(),
        db.clone(),
        Arc::new(RecordingSender::new()),
        test_config(),
    );

    bot.handle_message(USER, "Halo, apa kabar?").await;
    bot.handle_message(ADMIN, "Halo juga").await;

    let reply = bot.handle_message(ADMIN, "/stats").await;

    // Two users; two inbound plus two welcomes persisted.
    assert!(reply.contains("2"), "got: {reply}");
    assert!(reply.contains("4"), "got: {reply}");
}

#[tokio::test]
async fn cleanup_command_reports_the_window() {
    let bot = orchestrator_with(echo_adapter()).await;
    bot.handle_message(ADMIN, "Halo, apa kabar?").await;

    let reply = bot.handle_message(ADMIN, "/cleanup 7").await;

    assert!(reply.contains('7'), "got: {reply}");
    assert!(reply.contains('0'), "got: {reply}"); // nothing old enough
}

#[tokio::test]
async fn clearsession_distinguishes_open_and_missing() {
    let provider = Arc::new(SessionEchoProvider::new());
    let bot = orchestrator_with(Adapter::Stateful(provider)).await;

    bot.handle_message(USER, "Halo, apa kabar?").await;
    bot.handle_message(USER, "pesan kedua").await;
    bot.handle_message(ADMIN, "Halo juga").await;

    let cleared = bot.handle_message(ADMIN, &format!("/clearsession {USER}")).await;
    let missing = bot.handle_message(ADMIN, &format!("/clearsession {USER}")).await;

    assert_ne!(cleared, missing);
    assert!(missing.contains(USER));
}
