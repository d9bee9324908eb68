//! The two operations of discrete factor algebra: sum-out and join-multiply.
//!
//! Both are pure. They read their operands, allocate a new `Factor`, and either return it whole
//! or fail without producing anything.

use crate::factor::{Factor, Key};
use crate::util::{Result, SumoutError};
use crate::variable::Variable;

use indexmap::map::Entry;
use indexmap::IndexMap;
use itertools::Itertools;
use log::{debug, trace};

use std::collections::HashMap;


/// Marginalize `variable` out of `factor`.
///
/// Defined in Koller & Friedman 9.3.1
///
/// Rows are grouped by their values on the remaining scope and each group's weights are summed.
/// The result holds one row per group, in the order each group was first seen. Runs in time
/// linear in the number of rows. Only the rows the `Factor` holds are summed, so the result of a
/// sparse `Factor` is a sum over the values that appear.
///
/// # Args
/// factor: the `Factor` to marginalize
/// variable: the `Variable` to sum out
///
/// # Returns
/// a new `Factor` with scope `factor.scope() - {variable}`. Summing out the last variable gives
/// a zero-variable `Factor` holding the total weight, 0 if `factor` holds no rows.
///
/// # Errors
/// * `SumoutError::VariableNotInScope` if `variable` is not in the scope of `factor`
/// * `SumoutError::MalformedFactor` if a group's sum overflows
pub fn marginalize(factor: &Factor, variable: &Variable) -> Result<Factor> {
    let idx = match factor.position(variable) {
        Some(idx) => idx,
        None => {
            return Err(
                SumoutError::VariableNotInScope {
                    variable: String::from(variable.name()),
                    scope: factor.scope().iter().map(|v| String::from(v.name())).collect()
                }
            );
        }
    };

    let scope: Vec<Variable> = factor.scope()
                                     .iter()
                                     .filter(|&v| v != variable)
                                     .cloned()
                                     .collect();

    let mut rows: IndexMap<Key, f64> = IndexMap::new();
    for (key, &weight) in factor.table().iter() {
        let reduced: Key = key.iter()
                              .enumerate()
                              .filter(|&(i, _)| i != idx)
                              .map(|(_, val)| val.clone())
                              .collect();
        *rows.entry(reduced).or_insert(0.0) += weight;
    }

    // the grand total of a factor without rows is still a row
    if scope.is_empty() && rows.is_empty() {
        rows.insert(vec![], 0.0);
    }

    if let Some((key, _)) = rows.iter().find(|&(_, w)| ! w.is_finite()) {
        return Err(
            SumoutError::MalformedFactor {
                operand: format!("sum over '{}'", variable),
                key: key.clone()
            }
        );
    }

    debug!(
        "marginalized '{}': {} rows over {} variables -> {} rows",
        variable, factor.len(), factor.scope().len(), rows.len()
    );

    Ok(Factor::from_parts(scope, rows))
}


/// Multiply two `Factor`s, joining their rows on the variables they share.
///
/// Defined in Koller & Friedman Section 4.2.1
///
/// Every pair of rows that agree on the shared variables yields one row over the union of the
/// scopes, weighted by the product of the pair's weights. With no shared variables this is the
/// full cross product.
///
/// The rows of `right` are first indexed by their values on the shared variables; each row of
/// `left` then probes the index and is paired with every row it matches. This runs in time
/// linear in the sizes of the operands and the result.
///
/// # Args
/// left: the probe side. Its variables come first in the result's scope and its row order
///       drives the result's row order.
/// right: the build side. Its variables not shared with `left` follow in its own order.
///
/// A shared `Variable` keeps the explicit domain of whichever operand has one.
///
/// # Returns
/// A new `Factor` of scope union(left.scope(), right.scope())
///
/// # Errors
/// * `SumoutError::EmptyScope` if both scopes are empty and either operand does not hold exactly
///   one row
/// * `SumoutError::InvalidInput` if a shared `Variable` carries a different explicit domain in
///   each operand
/// * `SumoutError::MalformedFactor` if two pairs produce the same row, or a product overflows
pub fn multiply(left: &Factor, right: &Factor) -> Result<Factor> {
    if left.scope().is_empty() && right.scope().is_empty() && (left.len() != 1 || right.len() != 1) {
        return Err(SumoutError::EmptyScope { left: left.len(), right: right.len() });
    }

    let join = Join::new(left, right)?;

    // build side
    let index: HashMap<Vec<&str>, Vec<(&Key, f64)>> = right.table()
                                                           .iter()
                                                           .map(|(key, &w)| (join.right_projection(key), (key, w)))
                                                           .into_group_map();

    trace!("join index over {:?} holds {} keys", join.shared, index.len());

    // probe side
    let mut rows: IndexMap<Key, f64> = IndexMap::new();
    for (lkey, &lw) in left.table().iter() {
        let matches = match index.get(&join.left_projection(lkey)) {
            Some(m) => m,
            None => continue
        };

        for &(rkey, rw) in matches.iter() {
            let key = join.combine(lkey, rkey);
            let weight = lw * rw;

            if ! weight.is_finite() {
                return Err(SumoutError::MalformedFactor { operand: String::from("product"), key });
            }

            match rows.entry(key) {
                Entry::Occupied(e) => {
                    return Err(
                        SumoutError::MalformedFactor {
                            operand: String::from("product"),
                            key: e.key().clone()
                        }
                    );
                },
                Entry::Vacant(e) => {
                    e.insert(weight);
                }
            }
        }
    }

    debug!(
        "multiplied {} x {} rows sharing {} variables -> {} rows over {} variables",
        left.len(), right.len(), join.shared.len(), rows.len(), join.scope.len()
    );

    Ok(Factor::from_parts(join.scope, rows))
}


/// Column bookkeeping for a join of two scopes
struct Join {
    /// Positions of each shared variable, in `left` and in `right`
    shared: Vec<(usize, usize)>,

    /// Positions in `right` of the variables `left` lacks
    extra: Vec<usize>,

    /// The scope of the result
    scope: Vec<Variable>
}

impl Join {

    fn new(left: &Factor, right: &Factor) -> Result<Self> {
        let shared: Vec<(usize, usize)> = left.scope()
                                              .iter()
                                              .enumerate()
                                              .filter_map(|(i, v)| right.position(v).map(|j| (i, j)))
                                              .collect();

        let extra: Vec<usize> = (0..right.scope().len())
            .filter(|&j| ! shared.iter().any(|&(_, s)| s == j))
            .collect();

        let mut scope: Vec<Variable> = left.scope()
                                           .iter()
                                           .chain(extra.iter().map(|&j| &right.scope()[j]))
                                           .cloned()
                                           .collect();

        for &(i, j) in shared.iter() {
            let theirs = &right.scope()[j];
            let adopt = match (scope[i].domain(), theirs.domain()) {
                (Some(a), Some(b)) if a != b => {
                    return Err(
                        SumoutError::InvalidInput(
                            format!("variable '{}' has domains {:?} and {:?}", theirs, a, b)
                        )
                    );
                },
                (None, Some(_)) => true,
                _ => false
            };

            if adopt {
                scope[i] = theirs.clone();
            }
        }

        Ok(Join { shared, extra, scope })
    }

    fn left_projection<'a>(&self, key: &'a [String]) -> Vec<&'a str> {
        self.shared.iter().map(|&(i, _)| key[i].as_str()).collect()
    }

    fn right_projection<'a>(&self, key: &'a [String]) -> Vec<&'a str> {
        self.shared.iter().map(|&(_, j)| key[j].as_str()).collect()
    }

    fn combine(&self, left: &[String], right: &[String]) -> Key {
        left.iter()
            .cloned()
            .chain(self.extra.iter().map(|&j| right[j].clone()))
            .collect()
    }

}
