//! Client registry entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::ClientId;

use crate::error::PartyError;
use crate::validation::{validate_document_id, validate_full_name, validate_phone};

/// A borrower registered with the office
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    /// Unique identifier
    pub id: ClientId,
    /// Full display name
    pub full_name: String,
    /// Identity document number (cedula)
    pub document_id: String,
    /// Contact phone
    pub phone: Option<String>,
    /// Street address, free-form
    pub address: Option<String>,
    /// Whether the client can take new loans
    pub active: bool,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl Client {
    /// Registers a new client
    ///
    /// # Errors
    ///
    /// Returns a validation error naming the offending field.
    pub fn new(
        full_name: impl Into<String>,
        document_id: impl Into<String>,
    ) -> Result<Self, PartyError> {
        let full_name = full_name.into();
        let document_id = document_id.into();

        validate_full_name("full_name", &full_name)?;
        validate_document_id(&document_id)?;

        let now = Utc::now();
        Ok(Self {
            id: ClientId::new_v7(),
            full_name: full_name.trim().to_string(),
            document_id: document_id.trim().to_string(),
            phone: None,
            address: None,
            active: true,
            created_at: now,
            updated_at: now,
        })
    }

    /// Sets the contact phone
    pub fn with_phone(mut self, phone: impl Into<String>) -> Result<Self, PartyError> {
        let phone = phone.into();
        validate_phone(&phone)?;
        self.phone = Some(phone);
        Ok(self)
    }

    /// Sets the address
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Updates contact details
    pub fn update_contact(
        &mut self,
        phone: Option<String>,
        address: Option<String>,
    ) -> Result<(), PartyError> {
        if let Some(phone) = &phone {
            validate_phone(phone)?;
        }
        self.phone = phone;
        self.address = address;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Deactivates the client; existing loans keep collecting
    pub fn deactivate(&mut self) {
        self.active = false;
        self.updated_at = Utc::now();
    }

    /// Reactivates the client
    pub fn reactivate(&mut self) {
        self.active = true;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_client_is_active() {
        let client = Client::new("Maria Perez", "001-1234567-8").unwrap();
        assert!(client.active);
        assert_eq!(client.full_name, "Maria Perez");
    }

    #[test]
    fn test_blank_name_is_rejected() {
        let err = Client::new("  ", "001-1234567-8").unwrap_err();
        assert!(matches!(err, PartyError::Validation { field, .. } if field == "full_name"));
    }

    #[test]
    fn test_bad_phone_is_rejected() {
        let client = Client::new("Maria Perez", "001-1234567-8").unwrap();
        assert!(client.with_phone("nope").is_err());
    }

    #[test]
    fn test_deactivate_round_trip() {
        let mut client = Client::new("Maria Perez", "001-1234567-8").unwrap();
        client.deactivate();
        assert!(!client.active);
        client.reactivate();
        assert!(client.active);
    }
}
