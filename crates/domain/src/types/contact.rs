//! Contact model produced by the sync layer and consumed by the presentation
//! layer.
//!
//! Ordering inside every list follows the provider response; the first entry
//! of a list is treated as the primary value for display.

use serde::{Deserialize, Serialize};

/// A single person from the user's address book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    /// Provider resource name (e.g. `people/c123`), empty when unknown
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub emails: Vec<Email>,
    #[serde(default)]
    pub phone_numbers: Vec<PhoneNumber>,
    #[serde(default)]
    pub addresses: Vec<Address>,
    #[serde(default)]
    pub organizations: Vec<Organization>,
    #[serde(default)]
    pub urls: Vec<Url>,
    #[serde(default)]
    pub birthdays: Vec<Birthday>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Email {
    pub value: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneNumber {
    pub value: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub formatted_value: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Url {
    pub value: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

/// Birthday as rendered for display.
///
/// `date` is `month/day[/year]` when the provider supplied a structured date,
/// otherwise empty; `text` carries the provider's free-form value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Birthday {
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Contact {
    /// Create a contact with only an id and a name.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            emails: Vec::new(),
            phone_numbers: Vec::new(),
            addresses: Vec::new(),
            organizations: Vec::new(),
            urls: Vec::new(),
            birthdays: Vec::new(),
            photo_url: None,
        }
    }

    #[must_use]
    pub fn primary_email(&self) -> Option<&str> {
        self.emails.first().map(|email| email.value.as_str()).filter(|v| !v.is_empty())
    }

    #[must_use]
    pub fn primary_phone(&self) -> Option<&str> {
        self.phone_numbers.first().map(|phone| phone.value.as_str()).filter(|v| !v.is_empty())
    }

    /// One-line description shown next to the name in result lists.
    ///
    /// Prefers the primary organization (`"title at org"` or just `"org"`),
    /// followed by `" • "` and the primary email or phone when one exists.
    /// Without an organization it is just the primary email or phone.
    #[must_use]
    pub fn subtitle(&self) -> Option<String> {
        let contact = self.primary_email().or_else(|| self.primary_phone());

        let Some(org) = self.organizations.first().filter(|org| !org.name.is_empty()) else {
            return contact.map(str::to_string);
        };

        let mut subtitle = match org.title.as_deref().filter(|t| !t.is_empty()) {
            Some(title) => format!("{title} at {}", org.name),
            None => org.name.clone(),
        };
        if let Some(contact) = contact {
            subtitle.push_str(" • ");
            subtitle.push_str(contact);
        }
        Some(subtitle)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn sample() -> Contact {
        let mut contact = Contact::new("people/c1", "Ada Lovelace");
        contact.emails.push(Email { value: "ada@example.com".into(), kind: Some("work".into()) });
        contact
            .phone_numbers
            .push(PhoneNumber { value: "+44 20 7946 0000".into(), kind: Some("mobile".into()) });
        contact
    }

    #[test]
    fn subtitle_prefers_organization_with_title() {
        let mut contact = sample();
        contact.organizations.push(Organization {
            name: "Analytical Engines".into(),
            title: Some("Programmer".into()),
            kind: None,
        });

        assert_eq!(
            contact.subtitle().as_deref(),
            Some("Programmer at Analytical Engines • ada@example.com")
        );
    }

    #[test]
    fn subtitle_appends_phone_when_organization_has_no_title() {
        let mut contact = sample();
        contact.emails.clear();
        contact.organizations.push(Organization {
            name: "Analytical Engines".into(),
            title: None,
            kind: None,
        });

        assert_eq!(contact.subtitle().as_deref(), Some("Analytical Engines • +44 20 7946 0000"));

        contact.phone_numbers.clear();
        assert_eq!(contact.subtitle().as_deref(), Some("Analytical Engines"));
    }

    #[test]
    fn subtitle_falls_back_to_email_then_phone() {
        let contact = sample();
        assert_eq!(contact.subtitle().as_deref(), Some("ada@example.com"));

        let mut no_email = sample();
        no_email.emails.clear();
        assert_eq!(no_email.subtitle().as_deref(), Some("+44 20 7946 0000"));

        let bare = Contact::new("people/c2", "Nobody");
        assert_eq!(bare.subtitle(), None);
    }

    #[test]
    fn serializes_camel_case_with_type_fields() {
        let json = serde_json::to_value(sample()).unwrap();

        assert_eq!(json["id"], "people/c1");
        assert_eq!(json["phoneNumbers"][0]["type"], "mobile");
        assert_eq!(json["emails"][0]["type"], "work");
        assert!(json.get("photoUrl").is_none());
    }
}
