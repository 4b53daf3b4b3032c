//! Collector (cobrador) management

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::CollectorId;

use crate::error::PartyError;
use crate::validation::{validate_full_name, validate_phone};

/// Collector status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollectorStatus {
    Active,
    Inactive,
    Suspended,
}

impl CollectorStatus {
    /// Returns the wire name used by the database
    pub fn as_str(&self) -> &'static str {
        match self {
            CollectorStatus::Active => "ACTIVE",
            CollectorStatus::Inactive => "INACTIVE",
            CollectorStatus::Suspended => "SUSPENDED",
        }
    }
}

impl std::str::FromStr for CollectorStatus {
    type Err = PartyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACTIVE" => Ok(CollectorStatus::Active),
            "INACTIVE" => Ok(CollectorStatus::Inactive),
            "SUSPENDED" => Ok(CollectorStatus::Suspended),
            other => Err(PartyError::validation(
                "status",
                format!("unknown collector status: {}", other),
            )),
        }
    }
}

/// A field collector responsible for a route of loans
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collector {
    pub id: CollectorId,
    pub full_name: String,
    pub phone: Option<String>,
    /// Neighborhood or route the collector covers
    pub zone: Option<String>,
    pub status: CollectorStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Collector {
    /// Registers a new collector
    pub fn new(full_name: impl Into<String>) -> Result<Self, PartyError> {
        let full_name = full_name.into();
        validate_full_name("full_name", &full_name)?;

        let now = Utc::now();
        Ok(Self {
            id: CollectorId::new_v7(),
            full_name: full_name.trim().to_string(),
            phone: None,
            zone: None,
            status: CollectorStatus::Active,
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

    /// Assigns the collector to a zone
    pub fn assign_zone(&mut self, zone: impl Into<String>) {
        self.zone = Some(zone.into());
        self.updated_at = Utc::now();
    }

    /// Changes the collector's status
    pub fn set_status(&mut self, status: CollectorStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }

    /// Whether the collector can be assigned new loans
    pub fn is_active(&self) -> bool {
        self.status == CollectorStatus::Active
    }
}
