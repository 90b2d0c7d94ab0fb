//! PostgreSQL Repository Implementations

mod call_session;
mod schema;

pub use call_session::PgCallStore;
pub use schema::CallLogSchema;
