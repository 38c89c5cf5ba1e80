// Private modules
mod argument;
mod contract;
mod errors;
mod predicate;

// Public flattened exports
pub use argument::Argument;
pub use contract::{Contract, ParsedArguments};
pub use errors::Error;
pub use predicate::{Comparison, Condition, Predicate};
