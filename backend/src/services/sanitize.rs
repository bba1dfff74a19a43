use std::sync::OnceLock;

use regex::Regex;

use crate::models::SettingsChanges;

fn non_visible_ascii() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^\x21-\x7E]").expect("static pattern compiles"))
}

/// Strips everything outside visible ASCII from a pasted link: spaces,
/// control characters and invisible Unicode marks.
pub fn clean_link(raw: &str) -> String {
    non_visible_ascii().replace_all(raw, "").into_owned()
}

/// Cleans the link-typed settings fields. Free text such as the
/// announcement is left untouched.
pub fn clean_settings_links(changes: &mut SettingsChanges) {
    for link in [
        &mut changes.support_link,
        &mut changes.mediation_link,
        &mut changes.sell_account_link,
        &mut changes.buy_now_link,
        &mut changes.logo_url,
    ] {
        if let Some(value) = link.as_mut() {
            *value = clean_link(value);
        }
    }
}
