//! System prompt assembly.

use language::LanguagePack;

use crate::config::CompanyInfo;

/// Build the system prompt for one turn.
///
/// Starts from the language pack's base prompt (or the configured
/// override), then appends the company block and a note naming the user
/// when those are known. Empty company fields are skipped so an
/// unconfigured deployment still gets a clean prompt.
pub fn build_system_prompt(
    pack: &LanguagePack,
    base_override: Option<&str>,
    company: &CompanyInfo,
    user_name: &str,
) -> String {
    let mut prompt = base_override.unwrap_or(pack.system_prompt).to_string();

    let mut company_lines = Vec::new();
    if !company.name.is_empty() {
        company_lines.push(format!("Company: {}", company.name));
    }
    if !company.description.is_empty() {
        company_lines.push(format!("About: {}", company.description));
    }
    if !company.hours.is_empty() {
        company_lines.push(format!("Hours: {}", company.hours));
    }
    if !company.contact.is_empty() {
        company_lines.push(format!("Contact: {}", company.contact));
    }
    if !company_lines.is_empty() {
        prompt.push_str("\n\n");
        prompt.push_str(&company_lines.join("\n"));
    }

    if !user_name.is_empty() {
        prompt.push_str(&format!("\n\nYou are talking to {}.", user_name));
    }

    prompt
}
