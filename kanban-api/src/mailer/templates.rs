//! Bodies of the account emails

use super::Email;

/// Link to confirm the address; the token is an email-validation JWT
pub fn email_validation(to: &str, name: &str, link: &str) -> Email {
    Email {
        to: to.to_string(),
        subject: "Validate your email".to_string(),
        html: format!(
            "<h1>Welcome, {name}</h1>\
             <p>Click the link below to validate your email address.</p>\
             <p><a href=\"{link}\">Validate your email</a></p>\
             <p>The link expires in 24 hours.</p>",
            name = escape(name),
            link = link,
        ),
    }
}

/// Link to the new-password page; the token is a password-reset JWT
pub fn password_reset(to: &str, name: &str, link: &str) -> Email {
    Email {
        to: to.to_string(),
        subject: "Change your password".to_string(),
        html: format!(
            "<h1>Hi, {name}</h1>\
             <p>We received a request to change your password.</p>\
             <p><a href=\"{link}\">Choose a new password</a></p>\
             <p>The link expires in 1 hour. If you did not ask for this, ignore this email.</p>",
            name = escape(name),
            link = link,
        ),
    }
}

/// Minimal HTML escaping for user-supplied text
pub fn escape(raw: &str) -> String {
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
