//! Type inference by solving constraints in an ordered context.
//!
//! One machine, three languages: [`basic`] infers plain Hindley-Milner
//! types, [`classes`] adds type classes with instance resolution and
//! [`units`] adds float types indexed by units of measure.

pub mod basic;
pub mod classes;
mod context;
pub mod hm;
mod lang;
pub mod machine;
pub mod print;
mod state;
pub mod units;

pub use context::*;
pub use lang::*;
pub use machine::{FlexRigid, Solve, Step, TypeEq};
pub use state::*;

macro_rules! debug_println {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*);
    };
}
pub(crate) use debug_println;
