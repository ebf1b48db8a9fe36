pub mod init;
pub mod medicine_store;

pub use init::Database;
