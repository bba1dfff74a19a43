use serde::Serialize;

use crate::models::{Account, Faq, Settings};

/// Data bag for the public landing page.
#[derive(Debug, Serialize)]
pub struct StorefrontPage {
    pub accounts: Vec<Account>,
    pub settings: Settings,
    pub faqs: Vec<Faq>,
}

#[derive(Debug, Serialize)]
pub struct AccountPage {
    pub account: Account,
    pub settings: Settings,
}

#[derive(Debug, Serialize)]
pub struct AdminPanel {
    pub admin: String,
    pub accounts: Vec<Account>,
    pub settings: Settings,
    pub faqs: Vec<Faq>,
}

#[derive(Debug, Serialize)]
pub struct Deleted {
    pub deleted: i64,
}

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Generic refusal page. Says nothing about why access was refused.
pub fn blocked_page(ip: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head><meta charset="utf-8"><title>Access denied</title></head>
<body>
<h1>Access denied</h1>
<p>This page is not available.</p>
<p><small>Your address: {}</small></p>
</body>
</html>"#,
        escape(ip)
    )
}

pub fn login_page(key: &str) -> String {
    let action = format!(
        "/auth-admin?key={}",
        url::form_urlencoded::byte_serialize(key.as_bytes()).collect::<String>()
    );
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head><meta charset="utf-8"><title>Sign in</title></head>
<body>
<form method="post" action="{}">
<label>Username <input name="username" autocomplete="username"></label>
<label>Password <input name="password" type="password" autocomplete="current-password"></label>
<button type="submit">Sign in</button>
</form>
</body>
</html>"#,
        escape(&action)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocked_page_escapes_ip() {
        let page = blocked_page("<script>1</script>");
        assert!(page.contains("&lt;script&gt;"));
        assert!(!page.contains("<script>"));
    }

    #[test]
    fn test_login_form_posts_key_back() {
        let page = login_page("a b&c");
        assert!(page.contains(r#"action="/auth-admin?key=a+b%26c""#));
        assert!(page.contains(r#"name="password""#));
    }
}
