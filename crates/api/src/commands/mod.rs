//! Commands exposed to the presentation layer

mod contacts;

pub use contacts::{ContactsController, ContactsState};
