//! Sparse discrete factor algebra for exact inference in Probabilistic Graphical Models.
//!
//! A `Factor` maps assignments of a set of discrete `Variable`s to weights. The two operations
//! at the heart of variable elimination are `algebra::marginalize` (sum a variable out) and
//! `algebra::multiply` (join two factors on their shared variables). Factors are read and written
//! as delimited tables by the `table` module.

pub mod algebra;
pub mod factor;
pub mod inference;
pub mod init;
pub mod table;
pub mod util;
pub mod variable;

pub use algebra::{marginalize, multiply};
pub use factor::{Factor, FactorSource, Table};
pub use inference::{eliminate, query};
pub use init::Initialization;
pub use table::{TableFormat, TabularData};
pub use util::{Result, SumoutError};
pub use variable::{all_assignments, Assignment, Variable};
