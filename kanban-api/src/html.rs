//! Static landing pages for the emailed links

const EMAIL_VALIDATED: &str = include_str!("../html/email_validated.html");
const EXPIRED_TOKEN: &str = include_str!("../html/expired_token.html");
const CHANGE_PASSWORD: &str = include_str!("../html/change_password.html");
const PASSWORD_CHANGED: &str = include_str!("../html/password_changed.html");

pub fn email_validated() -> &'static str {
    EMAIL_VALIDATED
}

pub fn expired_token() -> &'static str {
    EXPIRED_TOKEN
}

pub fn password_changed() -> &'static str {
    PASSWORD_CHANGED
}

/// Reset form with the token embedded as a hidden field
pub fn change_password(token: &str) -> String {
    CHANGE_PASSWORD.replace("{{token}}", &crate::mailer::templates::escape(token))
}
