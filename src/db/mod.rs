pub mod export;
pub mod pool;
pub mod store;

pub use export::export_updates;
pub use pool::create_pool;
pub use store::PgLedgerStore;
