//! Local filtering over an already loaded contact list.

use gcontacts_domain::Contact;

/// Case-insensitive substring match on the name, any email or any phone
/// number. A blank query matches every contact.
#[must_use]
pub fn matches(contact: &Contact, query: &str) -> bool {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    matches_lowercase(contact, &needle)
}

fn matches_lowercase(contact: &Contact, needle: &str) -> bool {
    contact.name.to_lowercase().contains(needle)
        || contact.emails.iter().any(|e| e.value.to_lowercase().contains(needle))
        || contact.phone_numbers.iter().any(|p| p.value.to_lowercase().contains(needle))
}

/// Keep the contacts matching `query`, preserving order.
#[must_use]
pub fn filter_contacts(contacts: &[Contact], query: &str) -> Vec<Contact> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return contacts.to_vec();
    }
    contacts.iter().filter(|c| matches_lowercase(c, &needle)).cloned().collect()
}
