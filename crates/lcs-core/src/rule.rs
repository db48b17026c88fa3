use serde::{Deserialize, Serialize};

/// A condition → action rule.
///
/// The condition is an ordered sequence of representation-specific predicate elements
/// (see [`Representation`](crate::Representation)). Equality is structural: two rules
/// are the same rule iff their conditions and actions compare equal element-wise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule<E, A> {
    condition: Vec<E>,
    action: A,
}

impl<E, A> Rule<E, A> {
    #[must_use]
    pub fn new(condition: Vec<E>, action: A) -> Self {
        Self { condition, action }
    }

    #[must_use]
    pub fn condition(&self) -> &[E] {
        &self.condition
    }

    pub fn condition_mut(&mut self) -> &mut [E] {
        &mut self.condition
    }

    #[must_use]
    pub fn action(&self) -> &A {
        &self.action
    }

    pub fn set_action(&mut self, action: A) {
        self.action = action;
    }

    /// Number of input features the condition ranges over.
    #[must_use]
    pub fn num_features(&self) -> usize {
        self.condition.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structural_equality() {
        let a = Rule::new(vec![0, 1, 2], 'x');
        let b = Rule::new(vec![0, 1, 2], 'x');
        let c = Rule::new(vec![0, 1, 2], 'y');
        let d = Rule::new(vec![0, 1, 3], 'x');
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, d);
        assert_eq!(a.num_features(), 3);
    }

    #[test]
    fn test_mutation_through_accessors() {
        let mut rule = Rule::new(vec![0, 0], false);
        rule.condition_mut()[1] = 7;
        rule.set_action(true);
        assert_eq!(rule.condition(), &[0, 7]);
        assert!(*rule.action());
    }
}
