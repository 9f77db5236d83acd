//! Conversions from external infrastructure errors into domain errors.

use gcontacts_common::security::KeychainError;
use gcontacts_common::storage::StorageError;
use gcontacts_domain::ContactsError;
use reqwest::Error as HttpError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub ContactsError);

impl From<InfraError> for ContactsError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<ContactsError> for InfraError {
    fn from(value: ContactsError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoContactsError {
    fn into_contacts(self) -> ContactsError;
}

/* -------------------------------------------------------------------------- */
/* StorageError → ContactsError */
/* -------------------------------------------------------------------------- */

impl IntoContactsError for StorageError {
    fn into_contacts(self) -> ContactsError {
        match self {
            StorageError::Keychain(msg) => ContactsError::Security(msg),
            StorageError::InvalidKey(key) => {
                ContactsError::Internal(format!("invalid storage key: {key}"))
            }
            other => ContactsError::Storage(other.to_string()),
        }
    }
}

impl From<StorageError> for InfraError {
    fn from(value: StorageError) -> Self {
        InfraError(value.into_contacts())
    }
}

/* -------------------------------------------------------------------------- */
/* KeychainError → ContactsError */
/* -------------------------------------------------------------------------- */

impl IntoContactsError for KeychainError {
    fn into_contacts(self) -> ContactsError {
        match self {
            KeychainError::NotFound => ContactsError::Security("keychain entry not found".into()),
            KeychainError::AccessFailed(msg) => {
                ContactsError::Security(format!("unable to access secure storage: {msg}"))
            }
        }
    }
}

impl From<KeychainError> for InfraError {
    fn from(value: KeychainError) -> Self {
        InfraError(value.into_contacts())
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → ContactsError */
/* -------------------------------------------------------------------------- */

impl IntoContactsError for HttpError {
    fn into_contacts(self) -> ContactsError {
        if self.is_timeout() {
            return ContactsError::directory_transport("HTTP request timed out");
        }

        if self.is_connect() {
            return ContactsError::directory_transport("HTTP connection failure");
        }

        if let Some(status) = self.status() {
            let message = format!(
                "HTTP {} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("unknown status")
            );
            return ContactsError::directory_status(status.as_u16(), message);
        }

        if self.is_decode() {
            return ContactsError::directory_transport(format!("invalid response body: {self}"));
        }

        ContactsError::directory_transport(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_contacts())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use reqwest::{Client, StatusCode};
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[test]
    fn keychain_storage_failure_maps_to_security_error() {
        let mapped: ContactsError =
            InfraError::from(StorageError::Keychain("locked".into())).into();
        assert_eq!(mapped, ContactsError::Security("locked".into()));
    }

    #[test]
    fn io_failure_maps_to_storage_error() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let mapped: ContactsError = InfraError::from(StorageError::Io(io)).into();
        match mapped {
            ContactsError::Storage(msg) => assert!(msg.contains("denied")),
            other => panic!("expected storage error, got {other:?}"),
        }
    }

    #[test]
    fn keychain_not_found_maps_to_security_error() {
        let mapped: ContactsError = InfraError::from(KeychainError::NotFound).into();
        assert!(matches!(mapped, ContactsError::Security(_)));
    }

    #[tokio::test]
    async fn http_status_401_maps_to_unauthorized_directory_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(StatusCode::UNAUTHORIZED))
            .mount(&server)
            .await;

        let client = Client::builder().no_proxy().build().unwrap();
        let error = client.get(server.uri()).send().await.unwrap().error_for_status().unwrap_err();

        let mapped: ContactsError = InfraError::from(error).into();
        assert!(mapped.is_unauthorized());
        match mapped {
            ContactsError::DirectoryFetch { status, message, .. } => {
                assert_eq!(status, Some(401));
                assert!(message.contains("401"));
            }
            other => panic!("expected directory error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn connection_refused_maps_to_transport_error() {
        let client = Client::builder().no_proxy().build().unwrap();
        let error = client.get("http://127.0.0.1:9/unreachable").send().await.unwrap_err();

        let mapped: ContactsError = InfraError::from(error).into();
        assert!(matches!(mapped, ContactsError::DirectoryFetch { status: None, .. }));
        assert!(!mapped.is_unauthorized());
    }
}
