pub mod record_store;
pub use record_store::{MemoryRecordStore, RecordStore};
pub mod file_store;
pub use file_store::JsonFileStore;
pub mod pg_store;
pub use pg_store::PgRecordStore;
pub mod crm_repo;
pub use crm_repo::{CrmRepository, SharedCrmRepository};
