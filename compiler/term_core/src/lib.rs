pub mod basic;
pub mod classes;
pub mod dots;
pub mod error;
pub mod print;
pub mod scheme;
pub mod subst;
pub mod term;
pub mod units;

pub use error::{Result, TypeError};
pub use scheme::{Qualified, Scheme};
pub use subst::{HasVariables, Substitute, TypeExpr};
pub use term::Term;
pub use term_common::{FreshVariableStream, Name, P};
