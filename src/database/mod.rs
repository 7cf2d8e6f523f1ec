pub mod database;

pub use database::{ChatRecord, Database, DatabaseError};
