//! Attributes shared by every person record.

text_enum! {
    /// Channel used to reach a person.
    pub enum NotificationPreference {
        Email => "email",
        Sms => "sms",
        Whatsapp => "whatsapp",
    }
}

impl Default for NotificationPreference {
    fn default() -> Self {
        NotificationPreference::Email
    }
}

pub(crate) fn default_active() -> bool {
    true
}

/// Case-insensitive substring match used by the name filters.
pub(crate) fn name_contains(name: &str, needle: Option<&str>) -> bool {
    match needle.map(str::trim) {
        None | Some("") => true,
        Some(needle) => name.to_lowercase().contains(&needle.to_lowercase()),
    }
}
