//! Definition of the factor module
//!
//! A `Factor` represents a relationship between some set of `Variable`s: a function from
//! assignments of its scope to a real valued weight, stored as a table of rows.

use crate::algebra;
use crate::table::{self, TableFormat, TabularData};
use crate::util::{Result, SumoutError};
use crate::variable::{domain_product, domains, Assignment, Variable};

use indexmap::IndexMap;
use itertools::Itertools;
use ndarray::{ArrayD, IxDyn};

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

/// The values of one row, in scope order
pub type Key = Vec<String>;

/// Alias f64 ndarray::ArrayD as Table
pub type Table = ArrayD<f64>;


/// The sources a `Factor` can be built from
#[derive(Clone, Debug)]
pub enum FactorSource {
    /// Named columns with the weight column last
    Tabular(TabularData),

    /// A scope and its rows, each row's values in scope order
    Explicit {
        scope: Vec<Variable>,
        rows: Vec<(Key, f64)>
    }
}

impl From<TabularData> for FactorSource {

    fn from(data: TabularData) -> Self {
        FactorSource::Tabular(data)
    }

}

impl From<(Vec<Variable>, Vec<(Key, f64)>)> for FactorSource {

    fn from((scope, rows): (Vec<Variable>, Vec<(Key, f64)>)) -> Self {
        FactorSource::Explicit { scope, rows }
    }

}


/// A `Factor` over some scope of variables, represented as a (possibly sparse) table of rows.
///
/// # Invariants
/// * the scope holds no `Variable` twice
/// * no two rows share an assignment
/// * every weight is finite
/// * every value lies in its `Variable`'s explicit domain, if it has one
///
/// Rows keep the order they were inserted in. Two `Factor`s compare equal if they have the same
/// scope in the same order and the same set of rows.
#[derive(Clone, Debug, PartialEq)]
pub struct Factor {
    /// The scope of the `Factor`, in column order
    scope: Vec<Variable>,

    /// The weight of each assignment, keyed by values in scope order
    rows: IndexMap<Key, f64>
}


impl Factor {

    /// Create a new `Factor` from a scope and its rows.
    ///
    /// # Errors
    /// * `SumoutError::InvalidInput` if a `Variable` appears twice in the scope, a row has the
    ///   wrong number of values, a value is outside its `Variable`'s domain, or a weight is not
    ///   finite
    /// * `SumoutError::MalformedFactor` if two rows share an assignment
    pub fn new<I, K, V>(scope: Vec<Variable>, rows: I) -> Result<Self>
        where I: IntoIterator<Item = (K, f64)>,
              K: IntoIterator<Item = V>,
              V: Into<String>
    {
        if let Some(dup) = scope.iter().duplicates().next() {
            return Err(
                SumoutError::InvalidInput(format!("variable '{}' appears twice in the scope", dup))
            );
        }

        let mut table = IndexMap::new();
        for (key, weight) in rows {
            let key: Key = key.into_iter().map(Into::<String>::into).collect();

            if key.len() != scope.len() {
                return Err(
                    SumoutError::InvalidInput(
                        format!("row {:?} has {} values for a scope of {}", key, key.len(), scope.len())
                    )
                );
            }

            if let Some((var, val)) = scope.iter().zip(key.iter()).find(|&(var, val)| ! var.admits(val)) {
                return Err(
                    SumoutError::InvalidInput(
                        format!("value '{}' is not in the domain of '{}'", val, var)
                    )
                );
            }

            if ! weight.is_finite() {
                return Err(
                    SumoutError::InvalidInput(format!("row {:?} has non-finite weight {}", key, weight))
                );
            }

            if table.contains_key(&key) {
                return Err(
                    SumoutError::MalformedFactor { operand: String::from("input"), key }
                );
            }
            table.insert(key, weight);
        }

        Ok(Factor { scope, rows: table })
    }


    /// Create a `Factor` from any recognized source.
    ///
    /// Tabular sources take every column but the last as a `Variable` with an implicit domain,
    /// and parse the last column as the weights.
    ///
    /// Only tabular data and explicit tables are sources; anything else is rejected when the
    /// program is compiled:
    ///
    /// ```compile_fail
    /// use sumout::Factor;
    /// let f = Factor::construct(true);
    /// ```
    ///
    /// # Errors
    /// * `SumoutError::InvalidInput` if the table has no columns, has a duplicated column, has a
    ///   record of the wrong width or a weight that is not a finite number, plus every error of
    ///   `Factor::new`
    pub fn construct<S: Into<FactorSource>>(source: S) -> Result<Self> {
        match source.into() {
            FactorSource::Explicit { scope, rows } => Factor::new(scope, rows),
            FactorSource::Tabular(data) => Factor::from_tabular(data)
        }
    }


    fn from_tabular(data: TabularData) -> Result<Self> {
        let TabularData { mut columns, records } = data;

        let weight_column = match columns.pop() {
            Some(c) => c,
            None => {
                return Err(SumoutError::InvalidInput(String::from("table has no columns")));
            }
        };

        if columns.contains(&weight_column) {
            return Err(
                SumoutError::InvalidInput(format!("column '{}' appears twice", weight_column))
            );
        }

        let scope: Vec<Variable> = columns.iter().map(|c| Variable::new(c)).collect();

        let mut rows = Vec::with_capacity(records.len());
        for mut record in records {
            if record.len() != scope.len() + 1 {
                return Err(
                    SumoutError::InvalidInput(
                        format!("record {:?} has {} fields, expected {}", record, record.len(), scope.len() + 1)
                    )
                );
            }

            let raw = record.pop().unwrap_or_default();
            let weight: f64 = raw.trim().parse().map_err(|_| {
                SumoutError::InvalidInput(format!("weight '{}' of row {:?} is not a number", raw, record))
            })?;

            rows.push((record, weight));
        }

        Factor::new(scope, rows)
    }


    /// Build a `Factor` from a dense table over the explicit domains of `scope`. Axis `i` of the
    /// table indexes the domain of `scope[i]`.
    ///
    /// # Errors
    /// * `SumoutError::InvalidInput` if a `Variable` has no explicit domain, or the shape of the
    ///   table does not match the domains
    pub fn from_table(scope: Vec<Variable>, table: Table) -> Result<Self> {
        let rows = {
            let domains = domains(&scope)?;
            let shape: Vec<usize> = domains.iter().map(|d| d.len()).collect();
            if table.shape() != shape.as_slice() {
                return Err(
                    SumoutError::InvalidInput(
                        format!("table shape {:?} does not match domains {:?}", table.shape(), shape)
                    )
                );
            }

            table.indexed_iter()
                 .map(|(idx, &w)| {
                     let key: Key = domains.iter()
                                           .enumerate()
                                           .map(|(axis, d)| d[idx[axis]].clone())
                                           .collect();
                     (key, w)
                 })
                 .collect::<Vec<_>>()
        };

        Factor::new(scope, rows)
    }


    /// Create a `Factor` without checking the invariants. Used by operations that maintain them.
    pub(crate) fn from_parts(scope: Vec<Variable>, rows: IndexMap<Key, f64>) -> Self {
        Factor { scope, rows }
    }


    /// The zero-variable `Factor` holding a single row of weight 1. It is the identity of
    /// `Factor::product`.
    pub fn unit() -> Self {
        Factor::scalar(1.0)
    }


    /// A zero-variable `Factor` holding a single row of weight `weight`
    pub fn scalar(weight: f64) -> Self {
        let mut rows = IndexMap::new();
        rows.insert(vec![], weight);
        Factor { scope: vec![], rows }
    }


    /// Retrieve the scope of the `Factor`, in column order
    pub fn scope(&self) -> &[Variable] {
        &self.scope
    }


    /// Check whether `var` is in the scope of the `Factor`
    pub fn contains(&self, var: &Variable) -> bool {
        self.position(var).is_some()
    }


    pub(crate) fn position(&self, var: &Variable) -> Option<usize> {
        self.scope.iter().position(|v| v == var)
    }


    /// The number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }


    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }


    /// Iterate over the rows of the `Factor` as `(Assignment, weight)` pairs, in row order.
    /// Each call starts a fresh iteration.
    pub fn rows(&self) -> impl Iterator<Item = (Assignment, f64)> + '_ {
        self.rows.iter().map(move |(key, &w)| (self.assignment(key), w))
    }


    /// Iterate over the rows as `(values, weight)` pairs, values in scope order
    pub fn entries(&self) -> impl Iterator<Item = (&[String], f64)> {
        self.rows.iter().map(|(key, &w)| (key.as_slice(), w))
    }


    pub(crate) fn table(&self) -> &IndexMap<Key, f64> {
        &self.rows
    }


    fn assignment(&self, key: &[String]) -> Assignment {
        self.scope.iter().map(|v| v.name()).zip(key.iter().map(|s| s.as_str())).collect()
    }


    /// Retrieve every row compatible with `partial`. Variables of `partial` outside of the scope
    /// are ignored, so an empty or unrelated assignment matches every row.
    pub fn lookup(&self, partial: &Assignment) -> impl Iterator<Item = (Assignment, f64)> + '_ {
        let constraints: Vec<(usize, String)> = self.scope
                                                    .iter()
                                                    .enumerate()
                                                    .filter_map(|(i, v)| partial.get(v).map(|val| (i, String::from(val))))
                                                    .collect();

        self.rows
            .iter()
            .filter(move |&(key, _)| constraints.iter().all(|&(i, ref val)| key[i] == *val))
            .map(move |(key, &w)| (self.assignment(key), w))
    }


    /// Retrieve the weight of a complete assignment over the scope of this `Factor`
    ///
    /// # Args
    /// assignment: a full assignment to the scope of a `Factor`. The assignment's scope may be a
    ///             superset of the `Factor`s scope.
    ///
    /// # Returns
    /// the weight of the matching row, or `None` if the `Factor` holds no such row
    ///
    /// # Errors
    /// * `SumoutError::IncompleteAssignment`, if assignment is not a complete assignment to the
    ///   scope of the `Factor`
    pub fn value(&self, assignment: &Assignment) -> Result<Option<f64>> {
        let missing: Vec<String> = self.scope
                                       .iter()
                                       .filter(|v| assignment.get(v).is_none())
                                       .map(|v| String::from(v.name()))
                                       .collect();
        if ! missing.is_empty() {
            return Err(SumoutError::IncompleteAssignment(missing));
        }

        let key: Key = self.scope
                           .iter()
                           .filter_map(|v| assignment.get(v).map(String::from))
                           .collect();
        Ok(self.rows.get(&key).cloned())
    }


    /// Reduce the `Factor` to the rows compatible with the given evidence, removing the
    /// evidence variables from the scope.
    ///
    /// Defined in Koller & Friedman 4.2.3
    ///
    /// # Args
    /// assignment: a partial assignment. Variables outside the scope are ignored.
    ///
    /// # Returns
    /// A new `Factor` reduced over the given assignment
    pub fn reduce(&self, assignment: &Assignment) -> Self {
        let (kept, fixed): (Vec<usize>, Vec<usize>) = (0..self.scope.len())
            .partition(|&i| assignment.get(&self.scope[i]).is_none());

        if fixed.is_empty() {
            return self.clone();
        }

        let scope = kept.iter().map(|&i| self.scope[i].clone()).collect();
        let rows = self.lookup(assignment)
                       .map(|(assn, w)| {
                           let key: Key = kept.iter()
                                              .filter_map(|&i| assn.get(&self.scope[i]).map(String::from))
                                              .collect();
                           (key, w)
                       })
                       .collect();

        Factor::from_parts(scope, rows)
    }


    /// The sum of all weights
    pub fn total(&self) -> f64 {
        self.rows.values().sum()
    }


    /// Scale the weights so they sum to one.
    ///
    /// # Errors
    /// * `SumoutError::InvalidInput` if the weights sum to zero
    pub fn normalize(&self) -> Result<Self> {
        let z = self.total();
        if z == 0.0 || ! z.is_finite() {
            return Err(
                SumoutError::InvalidInput(format!("cannot normalize a factor with total weight {}", z))
            );
        }

        let rows = self.rows.iter().map(|(k, &w)| (k.clone(), w / z)).collect();
        Ok(Factor::from_parts(self.scope.clone(), rows))
    }


    /// Check whether the rows cover the full cross product of the scope's domains. Always `false`
    /// if a `Variable` has only an implicit domain.
    pub fn is_complete(&self) -> bool {
        match domains(&self.scope) {
            Ok(d) => d.iter().map(|d| d.len()).product::<usize>() == self.rows.len(),
            Err(_) => false
        }
    }


    /// Materialize the `Factor` as a dense table over the explicit domains of its scope. Rows
    /// the `Factor` does not hold have weight 0.
    ///
    /// # Errors
    /// * `SumoutError::InvalidInput` if a `Variable` has no explicit domain
    pub fn to_table(&self) -> Result<Table> {
        let domains = domains(&self.scope)?;
        let shape: Vec<usize> = domains.iter().map(|d| d.len()).collect();
        let mut tbl = Table::zeros(IxDyn(&shape));

        for (key, &w) in self.rows.iter() {
            let mut idx = Vec::with_capacity(key.len());
            for (val, d) in key.iter().zip(domains.iter()) {
                match d.iter().position(|x| x == val) {
                    Some(i) => idx.push(i),
                    None => {
                        return Err(
                            SumoutError::InvalidInput(format!("value '{}' is outside its domain", val))
                        );
                    }
                }
            }
            tbl[&idx[..]] = w;
        }

        Ok(tbl)
    }


    /// Every assignment of the full cross product that the `Factor` does not hold.
    ///
    /// # Errors
    /// * `SumoutError::InvalidInput` if a `Variable` has no explicit domain
    pub fn missing(&self) -> Result<Vec<Assignment>> {
        Ok(
            domain_product(&self.scope)?
                .into_iter()
                .filter(|key| ! self.rows.contains_key(key))
                .map(|key| self.assignment(&key))
                .collect()
        )
    }


    /// Compare with `other` up to scope order, row order, and `epsilon` differences in weight.
    pub fn approx_eq(&self, other: &Factor, epsilon: f64) -> bool {
        let mine: HashSet<&Variable> = self.scope.iter().collect();
        let theirs: HashSet<&Variable> = other.scope.iter().collect();
        if mine != theirs || self.rows.len() != other.rows.len() {
            return false;
        }

        // column i of self is column perm[i] of other
        let perm: Vec<usize> = self.scope.iter().filter_map(|v| other.position(v)).collect();

        self.rows.iter().all(|(key, &w)| {
            let mut other_key = vec![String::new(); key.len()];
            for (i, &j) in perm.iter().enumerate() {
                other_key[j] = key[i].clone();
            }
            other.rows.get(&other_key).map_or(false, |&o| (o - w).abs() <= epsilon)
        })
    }


    /// Marginalize the `Factor` over the given `Variable`. See `algebra::marginalize`.
    pub fn marginalize(&self, var: &Variable) -> Result<Self> {
        algebra::marginalize(self, var)
    }


    /// Product of this `Factor` and another `Factor`. See `algebra::multiply`.
    pub fn product(&self, other: &Self) -> Result<Self> {
        algebra::multiply(self, other)
    }


    /// Convert to tabular data, weight column last, weights written in their shortest
    /// round-tripping form
    ///
    /// # Errors
    /// * `SumoutError::InvalidInput` if a `Variable` is named like the weight column of `format`,
    ///   since the table could not be loaded back
    pub fn to_tabular(&self, format: &TableFormat) -> Result<TabularData> {
        if let Some(var) = self.scope.iter().find(|v| v.name() == format.weight_column()) {
            return Err(
                SumoutError::InvalidInput(
                    format!("variable '{}' clashes with the weight column", var)
                )
            );
        }

        let columns = self.scope
                          .iter()
                          .map(|v| String::from(v.name()))
                          .chain(Some(String::from(format.weight_column())))
                          .collect();
        let records = self.rows
                          .iter()
                          .map(|(key, w)| key.iter().cloned().chain(Some(w.to_string())).collect())
                          .collect();

        Ok(TabularData::new(columns, records))
    }


    /// Load a `Factor` from a comma-separated file with a `Value` weight column
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        Factor::load_with(path, &TableFormat::default())
    }


    /// Load a `Factor` from a file.
    ///
    /// # Errors
    /// * `SumoutError::Io` if the file cannot be read
    /// * `SumoutError::Format` if the file is not a well formed table of weights
    /// * `SumoutError::MalformedFactor` if two records share an assignment
    pub fn load_with<P: AsRef<Path>>(path: P, format: &TableFormat) -> Result<Self> {
        let data = table::load_path(path, format)?;
        Factor::construct(data).map_err(|e| match e {
            SumoutError::InvalidInput(msg) => SumoutError::Format(msg),
            e => e
        })
    }


    /// Save the `Factor` as a comma-separated file with a `Value` weight column
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.save_with(path, &TableFormat::default())
    }


    /// Save the `Factor` in the given format. Nothing is written if the `Factor` cannot be
    /// converted, see `Factor::to_tabular`.
    pub fn save_with<P: AsRef<Path>>(&self, path: P, format: &TableFormat) -> Result<()> {
        table::save_path(&self.to_tabular(format)?, path, format)
    }


    /// Display the first `n` rows
    pub fn head(&self, n: usize) -> Head<'_> {
        Head { factor: self, rows: n, weight_column: table::DEFAULT_WEIGHT_COLUMN }
    }


    /// Display the first `format.preview_rows()` rows under `format`'s weight column name
    pub fn head_with<'a>(&'a self, format: &'a TableFormat) -> Head<'a> {
        Head { factor: self, rows: format.preview_rows(), weight_column: format.weight_column() }
    }

}


/// Displays the leading rows of a `Factor`
pub struct Head<'a> {
    factor: &'a Factor,
    rows: usize,
    weight_column: &'a str
}

impl<'a> fmt::Display for Head<'a> {

    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write_rows(f, self.factor, self.rows, self.weight_column)
    }

}

impl fmt::Display for Factor {

    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write_rows(f, self, self.rows.len(), table::DEFAULT_WEIGHT_COLUMN)
    }

}

fn write_line(f: &mut fmt::Formatter, cells: &[&str], widths: &[usize]) -> fmt::Result {
    let padded = cells.iter()
                      .zip(widths.iter())
                      .map(|(c, &w)| format!("{:<width$}", c, width = w))
                      .join("  ");
    writeln!(f, "{}", padded.trim_end())
}

fn write_rows(f: &mut fmt::Formatter, factor: &Factor, n: usize, weight_column: &str) -> fmt::Result {
    let weights: Vec<String> = factor.rows.values().take(n).map(|w| w.to_string()).collect();

    let header: Vec<&str> = factor.scope
                                  .iter()
                                  .map(|v| v.name())
                                  .chain(Some(weight_column))
                                  .collect();

    let mut widths: Vec<usize> = header.iter().map(|h| h.len()).collect();
    for (key, w) in factor.rows.keys().take(n).zip(weights.iter()) {
        for (i, val) in key.iter().chain(Some(w)).enumerate() {
            widths[i] = widths[i].max(val.len());
        }
    }

    write_line(f, &header, &widths)?;
    for (key, w) in factor.rows.keys().take(n).zip(weights.iter()) {
        let cells: Vec<&str> = key.iter().map(|s| s.as_str()).chain(Some(w.as_str())).collect();
        write_line(f, &cells, &widths)?;
    }

    Ok(())
}
