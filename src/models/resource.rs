//! Fluent (state variable) and resource model.
//!
//! A fluent is a named state variable of the problem. Integer fluents with
//! a bounded domain model resource pools: the upper bound is the declared
//! capacity, and activities consume from the pool while they run.
//!
//! # Reference
//! Ghallab, Nau & Traverso (2016), "Automated Planning and Acting", Ch. 4

use serde::{Deserialize, Serialize};

/// Value domain of a fluent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FluentType {
    /// Bounded integer domain [lower, upper].
    Int { lower: i64, upper: i64 },
    /// Boolean domain.
    Bool,
}

/// A named state variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fluent {
    /// Unique fluent name.
    pub name: String,
    /// Value domain.
    pub fluent_type: FluentType,
}

impl Fluent {
    /// Creates a fluent with an explicit domain.
    pub fn new(name: impl Into<String>, fluent_type: FluentType) -> Self {
        Self {
            name: name.into(),
            fluent_type,
        }
    }

    /// Creates a resource pool with domain [0, capacity].
    pub fn resource(name: impl Into<String>, capacity: i64) -> Self {
        Self::new(
            name,
            FluentType::Int {
                lower: 0,
                upper: capacity,
            },
        )
    }

    /// Creates a boolean fluent.
    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, FluentType::Bool)
    }

    /// Whether this fluent is integer-typed (and therefore a resource).
    pub fn is_int(&self) -> bool {
        matches!(self.fluent_type, FluentType::Int { .. })
    }

    /// Declared capacity (domain upper bound) of an integer fluent.
    pub fn capacity(&self) -> Option<i64> {
        match self.fluent_type {
            FluentType::Int { upper, .. } => Some(upper),
            FluentType::Bool => None,
        }
    }

    /// Domain lower bound of an integer fluent.
    pub fn lower_bound(&self) -> Option<i64> {
        match self.fluent_type {
            FluentType::Int { lower, .. } => Some(lower),
            FluentType::Bool => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_fluent() {
        let r = Fluent::resource("machine_1", 3);
        assert_eq!(r.name, "machine_1");
        assert!(r.is_int());
        assert_eq!(r.capacity(), Some(3));
        assert_eq!(r.lower_bound(), Some(0));
    }

    #[test]
    fn test_bool_fluent_has_no_capacity() {
        let f = Fluent::boolean("door_open");
        assert!(!f.is_int());
        assert_eq!(f.capacity(), None);
    }
}
