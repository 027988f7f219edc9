use {
    crate::domain::{audit::NewAuditEntry, ports::AuditSink},
    std::sync::RwLock,
};

/// Keeps audit entries in process memory and mirrors them to `tracing`.
#[derive(Default)]
pub struct MemoryAuditLog {
    entries: RwLock<Vec<NewAuditEntry>>,
}

impl MemoryAuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<NewAuditEntry> {
        self.entries.read().expect("audit log lock poisoned").clone()
    }

    pub fn entries_titled(&self, title: &str) -> Vec<NewAuditEntry> {
        self.entries
            .read()
            .expect("audit log lock poisoned")
            .iter()
            .filter(|e| e.title == title)
            .cloned()
            .collect()
    }
}

impl AuditSink for MemoryAuditLog {
    fn record(&self, entry: NewAuditEntry) {
        tracing::debug!(
            audit_id = %entry.id,
            gateway = %entry.gateway_id,
            title = %entry.title,
            detail = %entry.detail,
            "audit entry"
        );
        self.entries
            .write()
            .expect("audit log lock poisoned")
            .push(entry);
    }
}
