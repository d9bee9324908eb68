//! Definition of the variable module
//!
//! A `Variable` represents a discrete random variable in a Probabilistic Graphical Model. An
//! `Assignment` maps a set of `Variable`s to one value each.

use crate::util::{Result, SumoutError};

use indexmap::IndexMap;
use itertools::Itertools;

use std::fmt;
use std::hash::{Hash, Hasher};
use std::iter::FromIterator;

/// The values written for a boolean column by common dataframe tools
pub const BINARY_DOMAIN: [&str; 2] = ["False", "True"];

/// A discrete random variable.
///
/// `Variable`s are identified by their name: two `Variable`s with the same name are the same
/// variable, whether or not either carries an explicit domain.
#[derive(Clone, Debug)]
pub struct Variable {
    /// The name of the `Variable`
    name: String,

    /// The values the `Variable` may take, if known. Factors loaded from tabular data only know
    /// the values that actually appear in their rows, so the domain stays implicit.
    domain: Option<Vec<String>>
}

impl Variable {

    /// Construct a new `Variable` with an implicit domain
    pub fn new(name: &str) -> Variable {
        Variable {
            name: String::from(name),
            domain: None
        }
    }

    /// Construct a new `Variable` over the given values. Repeated values are dropped.
    pub fn with_domain<I, S>(name: &str, values: I) -> Variable
        where I: IntoIterator<Item = S>,
              S: Into<String>
    {
        Variable {
            name: String::from(name),
            domain: Some(values.into_iter().map(Into::<String>::into).unique().collect())
        }
    }

    /// Construct a new `Variable` over `False` and `True`
    pub fn binary(name: &str) -> Variable {
        Variable::with_domain(name, BINARY_DOMAIN.iter().cloned())
    }

    /// Get the name of the `Variable`
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the explicit domain of the `Variable`, if it has one
    pub fn domain(&self) -> Option<&[String]> {
        self.domain.as_ref().map(|d| d.as_slice())
    }

    /// The number of values in the explicit domain of the `Variable`
    pub fn cardinality(&self) -> Option<usize> {
        self.domain.as_ref().map(|d| d.len())
    }

    /// Check whether `value` may be assigned to this `Variable`. Always `true` for an implicit
    /// domain.
    pub fn admits(&self, value: &str) -> bool {
        match self.domain {
            Some(ref d) => d.iter().any(|v| v == value),
            None => true
        }
    }

}

impl PartialEq for Variable {

    fn eq(&self, other: &Variable) -> bool {
        self.name == other.name
    }

}

impl Eq for Variable {}

impl Hash for Variable {

    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }

}

impl fmt::Display for Variable {

    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)
    }

}


/// A mapping from `Variable` names to values.
///
/// Equality ignores the order in which values were set.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Assignment {
    values: IndexMap<String, String>
}

impl Assignment {

    /// Create an empty `Assignment`
    pub fn new() -> Self {
        Assignment { values: IndexMap::new() }
    }

    /// Assign `value` to `var`, replacing any previous value
    pub fn set<S: Into<String>>(&mut self, var: &Variable, value: S) {
        self.values.insert(var.name.clone(), value.into());
    }

    /// Get the value assigned to `var`
    pub fn get(&self, var: &Variable) -> Option<&str> {
        self.get_by_name(&var.name)
    }

    /// Get the value assigned to the variable called `name`
    pub fn get_by_name(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(|v| v.as_str())
    }

    /// The number of variables assigned
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over `(name, value)` pairs in the order they were set
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Two `Assignment`s are compatible if they agree on every variable they share
    pub fn is_compatible(&self, other: &Assignment) -> bool {
        self.values
            .iter()
            .all(|(k, v)| other.values.get(k).map_or(true, |o| o == v))
    }

}

impl<K, V> FromIterator<(K, V)> for Assignment
    where K: Into<String>,
          V: Into<String>
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Assignment {
            values: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect()
        }
    }
}


/// Collect the explicit domains of `scope`, failing if any `Variable` has none.
pub(crate) fn domains(scope: &[Variable]) -> Result<Vec<&[String]>> {
    scope.iter()
         .map(|v| {
             v.domain().ok_or_else(|| {
                 SumoutError::InvalidInput(format!("variable '{}' has no explicit domain", v.name))
             })
         })
         .collect()
}


/// Enumerate every `Assignment` to `scope` in row-major order (the last `Variable` varies
/// fastest). Every `Variable` must have an explicit domain.
///
/// An empty scope has exactly one (empty) `Assignment`.
pub fn all_assignments(scope: &[Variable]) -> Result<Vec<Assignment>> {
    let keys = domain_product(scope)?;
    Ok(
        keys.into_iter()
            .map(|key| scope.iter().map(|v| v.name.clone()).zip(key).collect())
            .collect()
    )
}


/// The cross product of the domains of `scope`, as value vectors in scope order
pub(crate) fn domain_product(scope: &[Variable]) -> Result<Vec<Vec<String>>> {
    let domains = domains(scope)?;
    if domains.is_empty() {
        return Ok(vec![vec![]]);
    }

    Ok(
        domains.into_iter()
               .map(|d| d.iter())
               .multi_cartesian_product()
               .map(|key| key.into_iter().cloned().collect())
               .collect()
    )
}


// Unit Tests for the Variable and Assignment structs.
#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn identity_by_name() {
        let a = Variable::new("Rain");
        let b = Variable::binary("Rain");
        let c = Variable::binary("Sprinkler");

        assert_eq!(a, b);
        assert_ne!(b, c);
        assert_eq!(a.cardinality(), None);
        assert_eq!(b.cardinality(), Some(2));
        assert_eq!(b.to_string(), "Rain");
    }

    #[test]
    fn domain() {
        let grade = Variable::with_domain("Grade", vec!["A", "B", "C", "B"]);
        assert_eq!(grade.cardinality(), Some(3));
        assert!(grade.admits("C"));
        assert!(! grade.admits("D"));
        assert!(Variable::new("Grade").admits("D"));
    }

    #[test]
    fn assignment() {
        let rain = Variable::binary("Rain");
        let wet = Variable::binary("Grass Wet");

        let mut assn = Assignment::new();
        assert!(assn.is_empty());
        assn.set(&rain, "True");
        assn.set(&wet, "False");
        assn.set(&rain, "False");

        assert_eq!(assn.len(), 2);
        assert_eq!(assn.get(&rain), Some("False"));
        assert_eq!(assn.get_by_name("Grass Wet"), Some("False"));
        assert_eq!(assn.get(&Variable::new("Cloudy")), None);

        let reordered: Assignment = vec![("Grass Wet", "False"), ("Rain", "False")].into_iter().collect();
        assert_eq!(assn, reordered);
    }

    #[test]
    fn compatibility() {
        let x: Assignment = vec![("Rain", "True"), ("Sprinkler", "False")].into_iter().collect();
        let y: Assignment = vec![("Rain", "True"), ("Cloudy", "False")].into_iter().collect();
        let z: Assignment = vec![("Rain", "False")].into_iter().collect();

        assert!(x.is_compatible(&y));
        assert!(y.is_compatible(&x));
        assert!(! x.is_compatible(&z));
        assert!(x.is_compatible(&Assignment::new()));
    }

    #[test]
    fn enumerate_assignments() {
        let a = Variable::with_domain("A", vec!["0", "1", "2"]);
        let b = Variable::binary("B");

        let all = all_assignments(&[a.clone(), b.clone()]).unwrap();
        assert_eq!(all.len(), 6);
        assert_eq!(all[0].get(&a), Some("0"));
        assert_eq!(all[0].get(&b), Some("False"));
        assert_eq!(all[1].get(&a), Some("0"));
        assert_eq!(all[1].get(&b), Some("True"));
        assert_eq!(all[5].get(&a), Some("2"));

        let empty = all_assignments(&[]).unwrap();
        assert_eq!(empty, vec![Assignment::new()]);
    }

    #[test]
    fn enumerate_implicit_domain_err() {
        let res = all_assignments(&[Variable::binary("A"), Variable::new("B")]);
        match res {
            Err(SumoutError::InvalidInput(_)) => (),
            _ => panic!("wrong result for implicit domain")
        };
    }
}
