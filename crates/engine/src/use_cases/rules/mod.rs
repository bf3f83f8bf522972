//! Rule corpus management and resolution.

mod registry;
mod resolver;

pub use registry::{CorpusSnapshot, RuleRegistry};
pub use resolver::RuleResolver;
