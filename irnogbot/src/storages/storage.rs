use std::sync::Arc;

use crate::storages::{
    ApplicantStorage, ApplicantStorageTrait, AuditLogTrait, LogAuditLog,
};

/// Combined storage trait handing out the specific storages to the functions
/// that need only one of them
pub trait StorageTrait: Send + Sync {
    /// Convert to ApplicantStorageTrait trait object
    fn as_applicant_storage(self: Arc<Self>) -> Arc<dyn ApplicantStorageTrait>;

    /// Convert to AuditLogTrait trait object
    fn as_audit_log(self: Arc<Self>) -> Arc<dyn AuditLogTrait>;
}

/// Main storage structure that holds all bot data
#[derive(Clone)]
pub struct Storage {
    applicants: Arc<dyn ApplicantStorageTrait>,
    audit_log: Arc<dyn AuditLogTrait>,
}

impl Storage {
    /// Create a new storage keeping everything in memory
    pub fn new() -> Self {
        Self {
            applicants: Arc::new(ApplicantStorage::new()),
            audit_log: Arc::new(LogAuditLog),
        }
    }

    /// Builder-like method replacing the applicant storage
    pub fn applicants_storage(mut self, storage: impl ApplicantStorageTrait + 'static) -> Self {
        self.applicants = Arc::new(storage);
        self
    }

    /// Builder-like method replacing the audit log
    pub fn audit_log(mut self, audit_log: impl AuditLogTrait + 'static) -> Self {
        self.audit_log = Arc::new(audit_log);
        self
    }
}

impl Default for Storage {
    fn default() -> Self {
        Self::new()
    }
}

impl StorageTrait for Storage {
    fn as_applicant_storage(self: Arc<Self>) -> Arc<dyn ApplicantStorageTrait> {
        self.applicants.clone()
    }

    fn as_audit_log(self: Arc<Self>) -> Arc<dyn AuditLogTrait> {
        self.audit_log.clone()
    }
}
