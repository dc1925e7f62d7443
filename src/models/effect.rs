//! Effects on fluents.
//!
//! Effects change the value of a fluent at a given timing. Activities use
//! them to consume and release resources; problem-level base effects at
//! absolute times model resource calendars (maintenance, shifts).

use serde::{Deserialize, Serialize};

use super::Timing;

/// Kind of change applied to a fluent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectKind {
    /// Fluent value is incremented by the amount.
    Increase,
    /// Fluent value is decremented by the amount.
    Decrease,
    /// Fluent value is overwritten with the amount.
    Assign,
}

/// Bounds of an effect value.
///
/// Constant values have `lower == upper`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Amount {
    pub lower: i64,
    pub upper: i64,
}

impl Amount {
    /// A constant amount.
    pub fn constant(value: i64) -> Self {
        Self {
            lower: value,
            upper: value,
        }
    }

    /// A bounded (non-constant) amount.
    pub fn bounded(lower: i64, upper: i64) -> Self {
        Self { lower, upper }
    }

    /// The value, if constant.
    pub fn constant_value(&self) -> Option<i64> {
        (self.lower == self.upper).then_some(self.lower)
    }
}

/// A change to a fluent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Effect {
    /// Target fluent name.
    pub fluent: String,
    pub kind: EffectKind,
    pub amount: Amount,
}

impl Effect {
    /// Creates an effect.
    pub fn new(fluent: impl Into<String>, kind: EffectKind, amount: Amount) -> Self {
        Self {
            fluent: fluent.into(),
            kind,
            amount,
        }
    }

    /// Constant increase.
    pub fn increase(fluent: impl Into<String>, amount: i64) -> Self {
        Self::new(fluent, EffectKind::Increase, Amount::constant(amount))
    }

    /// Constant decrease.
    pub fn decrease(fluent: impl Into<String>, amount: i64) -> Self {
        Self::new(fluent, EffectKind::Decrease, Amount::constant(amount))
    }
}

/// An effect attached to a timing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimedEffect {
    pub timing: Timing,
    pub effect: Effect,
}

impl TimedEffect {
    /// Creates a timed effect.
    pub fn new(timing: Timing, effect: Effect) -> Self {
        Self { timing, effect }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_constant() {
        assert_eq!(Amount::constant(4).constant_value(), Some(4));
        assert_eq!(Amount::bounded(1, 4).constant_value(), None);
    }

    #[test]
    fn test_effect_factories() {
        let e = Effect::decrease("R", 2);
        assert_eq!(e.kind, EffectKind::Decrease);
        assert_eq!(e.amount.upper, 2);
        assert_eq!(Effect::increase("R", 1).kind, EffectKind::Increase);
    }
}
