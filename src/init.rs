//! Module containing initialization routines for the weights of a `Factor`.

use crate::factor::{Factor, Table};
use crate::util::{Result, SumoutError};
use crate::variable::{domains, Variable};

use ndarray_rand::rand_distr::Uniform as UniformDist;
use ndarray_rand::RandomExt;
use rand::rngs::StdRng;
use rand::SeedableRng;

use std::collections::HashSet;

/// Defines possible ways to initialize the weights of a complete `Factor`.
#[derive(Clone, Debug)]
pub enum Initialization {
    /// A uniform distribution over all assignments
    Uniform,

    /// Random weights, normalized to sum to one
    Random,

    /// Random weights from a generator seeded with the given value, normalized to sum to one
    Seeded(u64),

    /// User defined dense table. Axis `i` indexes the domain of the `i`th `Variable`.
    Table(Table)
}


impl Initialization {

    /// Construct a complete `Factor`, initialized based on ```self```
    ///
    /// # Args
    /// * `scope`: the `Variable`s over which to build the `Factor`. Every `Variable` needs an
    ///   explicit domain.
    ///
    /// # Returns
    /// a `Factor` holding one row for every assignment to `scope`, in row-major order
    ///
    /// # Errors
    /// * `SumoutError::InvalidInitialization` if the scope is empty or repeats a `Variable`, a
    ///   `Variable` has no explicit domain, or a user table has the wrong shape
    pub fn build_factor(self, scope: Vec<Variable>) -> Result<Factor> {
        ///////////////////////////////////////////////////////////////////////////////
        // Check for errors
        if scope.is_empty() {
            return Err(SumoutError::InvalidInitialization(String::from("scope may not be empty")));
        }

        let distinct: HashSet<&Variable> = scope.iter().collect();
        if distinct.len() != scope.len() {
            return Err(SumoutError::InvalidInitialization(String::from("scope repeats a variable")));
        }

        let shape: Vec<usize> = domains(&scope)
            .map_err(|e| SumoutError::InvalidInitialization(e.to_string()))?
            .iter()
            .map(|d| d.len())
            .collect();

        ///////////////////////////////////////////////////////////////////////////////
        // now, build the table
        let tbl = match self {
            Initialization::Uniform => {
                // normalizing constant is just the number of elements
                let z: usize = shape.iter().product();
                Table::from_elem(shape, 1. / (z as f64))
            },
            Initialization::Random => {
                normalized(Table::random(shape, UniformDist::new(1.0, 100.0)))
            },
            Initialization::Seeded(seed) => {
                let mut rng = StdRng::seed_from_u64(seed);
                normalized(Table::random_using(shape, UniformDist::new(1.0, 100.0), &mut rng))
            },
            Initialization::Table(tbl) => {
                if tbl.shape() != shape.as_slice() {
                    return Err(
                        SumoutError::InvalidInitialization(
                            format!("table shape {:?} does not match domains {:?}", tbl.shape(), shape)
                        )
                    );
                }
                tbl
            }
        };

        Factor::from_table(scope, tbl)
    }

}

fn normalized(mut tbl: Table) -> Table {
    let z = tbl.sum();
    tbl.mapv_inplace(|e| e / z);
    tbl
}
