pub mod fresh;

pub use fresh::FreshVariableStream;
pub use ustr::{ustr, Ustr};

pub type P<T> = Box<T>;

/// An interned identifier for term and type variables, classes and primitives.
pub type Name = Ustr;
