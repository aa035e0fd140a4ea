mod applicant_storage;
mod audit_log;
mod storage;

pub use applicant_storage::{
    Applicant, ApplicantStorage, ApplicantStorageTrait, PersistentApplicantStorage,
};
pub use audit_log::{AuditEvent, AuditLogTrait, FileAuditLog, LogAuditLog};
pub use storage::{Storage, StorageTrait};
