pub mod access;
pub mod api;
pub mod expiring;
pub mod storage;

pub use access::AccessControl;
pub use expiring::ExpiringStore;
pub use storage::Store;
