#[macro_use]
extern crate lazy_static;

pub mod dep;
pub mod error;
pub mod generate;
pub mod grammar;
pub mod lex;
pub mod policy;
pub mod recognize;
pub mod shift_reduce;
pub mod syntree;
pub mod transition;

pub use crate::dep::{Dependency, Item};
pub use crate::error::{Error, Result};
pub use crate::grammar::Grammar;
pub use crate::lex::{PosTagger, Tokenizer};
pub use crate::policy::{AlwaysShift, RulePolicy};
pub use crate::recognize::Derivation;
pub use crate::shift_reduce::{parse, DependencyParser, ParseOutcome};
pub use crate::syntree::SynTree;
pub use crate::transition::{Features, Transition, TransitionPolicy};
