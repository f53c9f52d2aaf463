//! Deletion policy: soft archive versus permanent removal.

use chrono::{DateTime, Utc};

/// Deployment tenancy, fixed for the life of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TenancyMode {
    SingleTenant,
    MultiTenant,
}

impl TenancyMode {
    pub fn from_multitenant(multitenant: bool) -> Self {
        if multitenant {
            TenancyMode::MultiTenant
        } else {
            TenancyMode::SingleTenant
        }
    }

    pub fn allows_permanent_deletion(&self) -> bool {
        matches!(self, TenancyMode::SingleTenant)
    }
}

/// Outcome of a delete request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deletion {
    /// Remove the template and everything it owns.
    Permanent,
    /// Stamp `archived_at`, re-stamping already archived templates.
    Archive { archived_at: DateTime<Utc> },
}

/// Decides how a delete request is carried out.
///
/// Permanent removal applies to archived templates as well as active ones.
#[derive(Debug, Clone, Copy)]
pub struct DeletionPolicy {
    tenancy: TenancyMode,
}

impl DeletionPolicy {
    pub fn new(tenancy: TenancyMode) -> Self {
        Self { tenancy }
    }

    pub fn decide(&self, permanently: bool, now: DateTime<Utc>) -> Deletion {
        if permanently && self.tenancy.allows_permanent_deletion() {
            Deletion::Permanent
        } else {
            Deletion::Archive { archived_at: now }
        }
    }
}
