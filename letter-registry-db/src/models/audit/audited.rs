use super::audit_log::AuditLogModel;
use crate::models::auditable::Auditable;

/// An entity write paired with the audit entry that must be stored with it,
/// in the same transaction.
#[derive(Debug, Clone)]
pub struct Audited<T: Auditable> {
    pub entity: T,
    pub audit_log: AuditLogModel,
}

impl<T: Auditable> Audited<T> {
    pub fn new(entity: T, audit_log: AuditLogModel) -> Self {
        Self { entity, audit_log }
    }
}
