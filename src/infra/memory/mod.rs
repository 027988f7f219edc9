pub mod audit_log;
pub mod ledger;

pub use audit_log::MemoryAuditLog;
pub use ledger::MemoryLedger;
