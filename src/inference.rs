//! Sum-product variable elimination over a caller supplied elimination order.
//!
//! Implementation of Koller & Friedman Algorithm 9.1 - Sum-Product-VE. Choosing a good order is
//! left to the caller.

use crate::factor::Factor;
use crate::util::{Result, SumoutError};
use crate::variable::{Assignment, Variable};

use log::debug;

use std::collections::HashSet;


/// Eliminate each variable of `order` in turn, then multiply together whatever remains.
///
/// # Args
/// * `factors`: the bag of `Factor`s to eliminate over
/// * `order`: the `Variable`s to sum out, first to last
///
/// # Returns
/// the product of the remaining `Factor`s, over every variable not in `order`. Eliminating
/// every variable gives a zero-variable `Factor` holding the partition function.
///
/// # Errors
/// * `SumoutError::VariableNotInScope` if a `Variable` of `order` is in no remaining `Factor`
/// * any error of `Factor::product` or `Factor::marginalize`
pub fn eliminate(factors: Vec<Factor>, order: &[Variable]) -> Result<Factor> {
    let mut phis = factors;

    for var in order.iter() {
        // Split into the factors that mention var and those that don't
        let (with_var, without_var): (Vec<Factor>, Vec<Factor>) = phis.into_iter()
                                                                      .partition(|f| f.contains(var));

        if with_var.is_empty() {
            let scope: HashSet<String> = without_var.iter()
                                                    .flat_map(|f| f.scope().iter().map(|v| String::from(v.name())))
                                                    .collect();
            return Err(
                SumoutError::VariableNotInScope {
                    variable: String::from(var.name()),
                    scope: scope.into_iter().collect()
                }
            );
        }

        // product step - multiply factors with var
        let psi = product_of(&with_var)?;

        // sum step - marginalize psi over var
        let tau = psi.marginalize(var)?;
        debug!("eliminated '{}' from {} factors, {} rows remain", var, with_var.len(), tau.len());

        phis = without_var;
        phis.push(tau);
    }

    product_of(&phis)
}


/// Compute ```P(Y | evidence)``` over the variables `Y` that are neither eliminated nor observed.
///
/// Every `Factor` is first reduced by the evidence; variables of `order` that are observed are
/// skipped. The result is normalized.
pub fn query(factors: &[Factor], evidence: &Assignment, order: &[Variable]) -> Result<Factor> {
    let reduced: Vec<Factor> = factors.iter().map(|f| f.reduce(evidence)).collect();
    let order: Vec<Variable> = order.iter()
                                    .filter(|v| evidence.get(v).is_none())
                                    .cloned()
                                    .collect();

    eliminate(reduced, &order)?.normalize()
}


fn product_of(factors: &[Factor]) -> Result<Factor> {
    factors.iter().try_fold(Factor::unit(), |acc, phi| acc.product(phi))
}
