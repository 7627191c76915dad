//! Language packs: per-language system prompts and message templates.

use std::collections::HashMap;

/// System-wide default language code when a user has no preference.
pub const DEFAULT_LANGUAGE: &str = "id";

/// One language's prompt and localized templates. Read-only at runtime.
#[derive(Debug, Clone)]
pub struct LanguagePack {
    /// Language code (e.g., "id").
    pub code: &'static str,
    /// Human-readable name shown to users (e.g., "Bahasa Indonesia").
    pub display_name: &'static str,
    /// Base system prompt for this language.
    pub system_prompt: &'static str,
    /// Named message templates with `{placeholder}` slots.
    templates: HashMap<&'static str, &'static str>,
}

impl LanguagePack {
    /// Render a template, substituting `{placeholder}` slots.
    ///
    /// Returns `None` when the template key is unknown.
    pub fn render(&self, key: &str, args: &[(&str, &str)]) -> Option<String> {
        let template = self.templates.get(key)?;
        let mut text = (*template).to_string();
        for (name, value) in args {
            text = text.replace(&format!("{{{}}}", name), value);
        }
        Some(text)
    }

    /// Whether the pack carries a template for `key`.
    pub fn has_template(&self, key: &str) -> bool {
        self.templates.contains_key(key)
    }
}

/// The registry of supported language packs.
#[derive(Debug, Clone)]
pub struct Packs {
    packs: HashMap<&'static str, LanguagePack>,
    fallback: LanguagePack,
}

impl Default for Packs {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Packs {
    /// Build the registry with the built-in packs (English, Indonesian).
    pub fn builtin() -> Self {
        let mut packs = HashMap::new();
        for pack in [english_pack(), indonesian_pack()] {
            packs.insert(pack.code, pack);
        }
        Self {
            packs,
            fallback: indonesian_pack(),
        }
    }

    /// Get the pack for a language code.
    pub fn get(&self, code: &str) -> Option<&LanguagePack> {
        self.packs.get(code)
    }

    /// Get the pack for a language code, falling back to the system
    /// default pack when the code is unknown.
    pub fn get_or_default(&self, code: &str) -> &LanguagePack {
        self.packs.get(code).unwrap_or(&self.fallback)
    }

    /// Whether `code` names a supported language.
    pub fn supports(&self, code: &str) -> bool {
        self.packs.contains_key(code)
    }

    /// Supported codes, sorted.
    pub fn codes(&self) -> Vec<&'static str> {
        let mut codes: Vec<_> = self.packs.keys().copied().collect();
        codes.sort_unstable();
        codes
    }

    /// The "code - name" listing used by the language-options message.
    pub fn options_list(&self) -> String {
        self.codes()
            .iter()
            .map(|code| {
                let pack = &self.packs[code];
                format!("{} - {}", pack.code, pack.display_name)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn english_pack() -> LanguagePack {
    let templates = HashMap::from([
        (
            "welcome",
            "Hello! Welcome to {company}. I'm an AI assistant and I'm happy \
             to help you. Type /help to see what I can do.",
        ),
        (
            "help",
            "Here's what I can do:\n\
             /help - show this message\n\
             /info - about {company}\n\
             /status - your account status\n\
             /provider - active AI backend\n\
             /language - choose your language\n\
             /reset - start a fresh conversation\n\n\
             Or just send me a message and I'll answer.",
        ),
        (
            "help_admin",
            "Admin commands:\n\
             /stats - usage statistics\n\
             /users - recent users\n\
             /broadcast <text> - message all users\n\
             /cleanup [days] - prune old messages\n\
             /sessions - open continuation sessions\n\
             /clearsession <user> - drop one session\n\
             /clearsessions - drop all sessions\n\
             /prunesessions - drop idle sessions",
        ),
        (
            "info",
            "{company}\n{description}\n\nHours: {hours}\nContact: {contact}",
        ),
        (
            "status",
            "Your status:\nName: {name}\nLanguage: {language}\n\
             Messages sent: {messages}\nMember since: {since}\nAI backend: {provider}",
        ),
        ("provider_info", "Active AI backend: {provider} ({model})"),
        (
            "reset_done",
            "Done - our conversation starts fresh from here.",
        ),
        (
            "language_options",
            "Available languages:\n{options}\n\nUse /language <code> to pick one.",
        ),
        ("language_set", "Language set to {language}."),
        (
            "fallback_1",
            "Sorry, I'm having trouble answering right now. Please try again in a moment.",
        ),
        (
            "fallback_2",
            "Apologies - something went wrong on my side. Could you try that again?",
        ),
        (
            "fallback_3",
            "I couldn't process that just now. Please send it again shortly.",
        ),
        (
            "stats",
            "Statistics:\nTotal users: {total_users}\nTotal messages: {total_messages}\n\
             Today: {today_messages} messages from {today_users} users",
        ),
        ("users_header", "Recent users ({count}):"),
        ("broadcast_done", "Broadcast sent to {sent} users ({failed} failed)."),
        ("cleanup_done", "Removed {removed} messages older than {days} days."),
        ("sessions_status", "Open sessions: {count}\n{owners}"),
        ("session_cleared", "Session for {user} cleared."),
        ("session_missing", "No open session for {user}."),
        ("sessions_cleared", "Cleared {count} sessions."),
        ("sessions_pruned", "Pruned {count} idle sessions."),
    ]);

    LanguagePack {
        code: "en",
        display_name: "English",
        system_prompt: "You are a friendly and professional customer assistant. \
             Answer briefly and helpfully, in English. If you do not know an \
             answer, say so instead of guessing.",
        templates,
    }
}

fn indonesian_pack() -> LanguagePack {
    let templates = HashMap::from([
        (
            "welcome",
            "Halo! Selamat datang di {company}. Saya asisten AI yang siap \
             membantu Anda. Ketik /help untuk melihat apa saja yang bisa saya lakukan.",
        ),
        (
            "help",
            "Berikut yang bisa saya lakukan:\n\
             /help - tampilkan pesan ini\n\
             /info - tentang {company}\n\
             /status - status akun Anda\n\
             /provider - backend AI yang aktif\n\
             /language - pilih bahasa\n\
             /reset - mulai percakapan baru\n\n\
             Atau langsung kirim pesan dan saya akan menjawab.",
        ),
        (
            "help_admin",
            "Perintah admin:\n\
             /stats - statistik penggunaan\n\
             /users - pengguna terbaru\n\
             /broadcast <teks> - kirim pesan ke semua pengguna\n\
             /cleanup [hari] - hapus pesan lama\n\
             /sessions - sesi lanjutan yang terbuka\n\
             /clearsession <user> - hapus satu sesi\n\
             /clearsessions - hapus semua sesi\n\
             /prunesessions - hapus sesi tidak aktif",
        ),
        (
            "info",
            "{company}\n{description}\n\nJam operasional: {hours}\nKontak: {contact}",
        ),
        (
            "status",
            "Status Anda:\nNama: {name}\nBahasa: {language}\n\
             Pesan terkirim: {messages}\nBergabung sejak: {since}\nBackend AI: {provider}",
        ),
        ("provider_info", "Backend AI aktif: {provider} ({model})"),
        (
            "reset_done",
            "Selesai - percakapan kita dimulai dari awal lagi.",
        ),
        (
            "language_options",
            "Bahasa yang tersedia:\n{options}\n\nGunakan /language <kode> untuk memilih.",
        ),
        ("language_set", "Bahasa diatur ke {language}."),
        (
            "fallback_1",
            "Maaf, saya sedang kesulitan menjawab. Silakan coba lagi sebentar lagi.",
        ),
        (
            "fallback_2",
            "Mohon maaf - ada gangguan di sistem saya. Bisa coba kirim lagi?",
        ),
        (
            "fallback_3",
            "Pesan Anda belum bisa saya proses. Silakan kirim ulang sebentar lagi.",
        ),
        (
            "stats",
            "Statistik:\nTotal pengguna: {total_users}\nTotal pesan: {total_messages}\n\
             Hari ini: {today_messages} pesan dari {today_users} pengguna",
        ),
        ("users_header", "Pengguna terbaru ({count}):"),
        (
            "broadcast_done",
            "Broadcast terkirim ke {sent} pengguna ({failed} gagal).",
        ),
        (
            "cleanup_done",
            "Menghapus {removed} pesan yang lebih lama dari {days} hari.",
        ),
        ("sessions_status", "Sesi terbuka: {count}\n{owners}"),
        ("session_cleared", "Sesi untuk {user} dihapus."),
        ("session_missing", "Tidak ada sesi terbuka untuk {user}."),
        ("sessions_cleared", "Menghapus {count} sesi."),
        ("sessions_pruned", "Menghapus {count} sesi tidak aktif."),
    ]);

    LanguagePack {
        code: "id",
        display_name: "Bahasa Indonesia",
        system_prompt: "Kamu adalah asisten pelanggan yang ramah dan profesional. \
             Jawab dengan singkat dan jelas dalam Bahasa Indonesia. Jika tidak \
             tahu jawabannya, katakan terus terang, jangan menebak.",
        templates,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_packs_cover_both_languages() {
        let packs = Packs::builtin();
        assert!(packs.supports("en"));
        assert!(packs.supports("id"));
        assert!(!packs.supports("xx"));
        assert_eq!(packs.codes(), vec!["en", "id"]);
    }

    #[test]
    fn render_substitutes_placeholders() {
        let packs = Packs::builtin();
        let pack = packs.get("en").unwrap();

        let text = pack
            .render("welcome", &[("company", "Toko Maju")])
            .unwrap();
        assert!(text.contains("Toko Maju"));
        assert!(!text.contains("{company}"));
    }

    #[test]
    fn unknown_template_is_none() {
        let packs = Packs::builtin();
        let pack = packs.get("id").unwrap();
        assert!(pack.render("no_such_key", &[]).is_none());
    }

    #[test]
    fn both_packs_carry_the_same_template_keys() {
        let packs = Packs::builtin();
        let en = packs.get("en").unwrap();
        let id = packs.get("id").unwrap();

        for key in [
            "welcome",
            "help",
            "help_admin",
            "info",
            "status",
            "provider_info",
            "reset_done",
            "language_options",
            "language_set",
            "fallback_1",
            "fallback_2",
            "fallback_3",
            "stats",
            "users_header",
            "broadcast_done",
            "cleanup_done",
            "sessions_status",
            "session_cleared",
            "session_missing",
            "sessions_cleared",
            "sessions_pruned",
        ] {
            assert!(en.has_template(key), "en missing {key}");
            assert!(id.has_template(key), "id missing {key}");
        }
    }

    #[test]
    fn unknown_code_falls_back_to_default_pack() {
        let packs = Packs::builtin();
        assert_eq!(packs.get_or_default("xx").code, DEFAULT_LANGUAGE);
        assert_eq!(packs.get_or_default("en").code, "en");
    }

    #[test]
    fn options_list_names_both_languages() {
        let packs = Packs::builtin();
        let options = packs.options_list();
        assert!(options.contains("en - English"));
        assert!(options.contains("id - Bahasa Indonesia"));
    }
}
