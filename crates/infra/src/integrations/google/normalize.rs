//! People API records → domain `Contact`

use gcontacts_domain::constants::{UNKNOWN_KIND, UNKNOWN_NAME};
use gcontacts_domain::{
    Address, Birthday, Contact, Email, Organization, PhoneNumber, Url as ContactUrl,
};

use super::types::{GoogleBirthday, GoogleDate, Person, TypedValue};

/// Normalize a batch of people, dropping records without any name.
pub fn normalize_people(people: impl IntoIterator<Item = Person>) -> Vec<Contact> {
    people.into_iter().filter_map(normalize_person).collect()
}

/// `None` when the record carries no names at all.
pub fn normalize_person(person: Person) -> Option<Contact> {
    let names = person.names.filter(|names| !names.is_empty())?;
    let name = names
        .into_iter()
        .next()
        .and_then(|n| non_empty(n.display_name))
        .unwrap_or_else(|| UNKNOWN_NAME.to_string());

    Some(Contact {
        id: person.resource_name.unwrap_or_default(),
        name,
        emails: typed(person.email_addresses, |value, kind| Email { value, kind }),
        phone_numbers: typed(person.phone_numbers, |value, kind| PhoneNumber { value, kind }),
        addresses: person
            .addresses
            .unwrap_or_default()
            .into_iter()
            .map(|a| Address {
                formatted_value: a.formatted_value.unwrap_or_default(),
                kind: Some(kind_or_unknown(a.kind)),
                street_address: non_empty(a.street_address),
                city: non_empty(a.city),
                region: non_empty(a.region),
                postal_code: non_empty(a.postal_code),
                country: non_empty(a.country),
            })
            .collect(),
        organizations: person
            .organizations
            .unwrap_or_default()
            .into_iter()
            .map(|o| Organization {
                name: o.name.unwrap_or_default(),
                title: o.title,
                kind: Some(kind_or_unknown(o.kind)),
            })
            .collect(),
        urls: typed(person.urls, |value, kind| ContactUrl { value, kind }),
        birthdays: person.birthdays.unwrap_or_default().into_iter().map(birthday).collect(),
        photo_url: person.photos.and_then(|photos| photos.into_iter().next()).and_then(|p| p.url),
    })
}

fn typed<T>(
    values: Option<Vec<TypedValue>>,
    build: impl Fn(String, Option<String>) -> T,
) -> Vec<T> {
    values
        .unwrap_or_default()
        .into_iter()
        .map(|v| build(v.value.unwrap_or_default(), Some(kind_or_unknown(v.kind))))
        .collect()
}

fn birthday(raw: GoogleBirthday) -> Birthday {
    Birthday { date: raw.date.map(format_date).unwrap_or_default(), text: raw.text }
}

/// `month/day[/year]`, or empty unless both month and day are set.
pub fn format_date(date: GoogleDate) -> String {
    match (date.month.filter(|m| *m > 0), date.day.filter(|d| *d > 0)) {
        (Some(month), Some(day)) => match date.year.filter(|y| *y > 0) {
            Some(year) => format!("{month}/{day}/{year}"),
            None => format!("{month}/{day}"),
        },
        _ => String::new(),
    }
}

fn kind_or_unknown(kind: Option<String>) -> String {
    non_empty(kind).unwrap_or_else(|| UNKNOWN_KIND.to_string())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
