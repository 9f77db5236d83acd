//! Common data types used throughout the application

pub mod contact;

pub use contact::{Address, Birthday, Contact, Email, Organization, PhoneNumber, Url};
