pub mod filter;
pub mod flatten;
pub mod selection;
pub mod store;
