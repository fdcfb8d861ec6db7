pub mod ledger;

pub use ledger::{Ledger, CURRENT_SCHEMA_VERSION};
