//! `fleetrecon-table` — ordered-column tabular model and the primitive
//! operations the report pipeline is built from.
//!
//! Pure model crate: receives in-memory tables, returns in-memory tables.
//! No IO, no network.

pub mod error;
pub mod ops;
pub mod table;
pub mod value;

pub use error::TableError;
pub use ops::CollisionPair;
pub use table::Table;
pub use value::Value;
