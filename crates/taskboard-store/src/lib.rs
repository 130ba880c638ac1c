pub mod database;
pub mod error;
pub mod port;
pub mod row_helpers;
pub mod schema;
pub mod seed;
pub mod tasks;

pub use database::Database;
pub use error::StoreError;
pub use port::TaskStore;
pub use tasks::TaskRepo;
