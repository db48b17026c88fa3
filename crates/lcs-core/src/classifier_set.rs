use std::slice;

use crate::{Classifier, MemberNotFound, Population, Rule};

/// A transient, owned multiset of classifier copies: a match set or an action set.
///
/// Every classifier pushed into the set is cloned, so mutating the set never touches the
/// [`Population`] it was drawn from, and vice versa. Learned statistics are written back
/// explicitly with [`Population::commit`].
///
/// Unlike the population, both counts are derived on each read:
///
/// - [`num_macros`](Self::num_macros) - number of distinct entries
/// - [`num_micros`](Self::num_micros) - sum of the entries' numerosity
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifierSet<E, A> {
    classifiers: Vec<Classifier<E, A>>,
}

impl<E, A> Default for ClassifierSet<E, A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E, A> ClassifierSet<E, A> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            classifiers: Vec::new(),
        }
    }

    #[must_use]
    pub fn num_macros(&self) -> usize {
        self.classifiers.len()
    }

    #[must_use]
    pub fn num_micros(&self) -> u64 {
        self.classifiers
            .iter()
            .map(|cl| u64::from(cl.numerosity()))
            .sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classifiers.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<'_, Classifier<E, A>> {
        self.classifiers.iter()
    }

    pub fn iter_mut(&mut self) -> slice::IterMut<'_, Classifier<E, A>> {
        self.classifiers.iter_mut()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Classifier<E, A>] {
        &self.classifiers
    }
}

impl<E, A> ClassifierSet<E, A>
where
    E: Clone + PartialEq,
    A: Clone + PartialEq,
{
    /// Adds a copy of `classifier` to the end of the set.
    pub fn push(&mut self, classifier: &Classifier<E, A>) {
        self.classifiers.push(classifier.clone());
    }

    #[must_use]
    pub fn contains(&self, rule: &Rule<E, A>) -> bool {
        self.position(rule).is_some()
    }

    #[must_use]
    pub fn get(&self, rule: &Rule<E, A>) -> Option<&Classifier<E, A>> {
        self.position(rule).map(|i| &self.classifiers[i])
    }

    pub fn get_mut(&mut self, rule: &Rule<E, A>) -> Option<&mut Classifier<E, A>> {
        self.position(rule).map(|i| &mut self.classifiers[i])
    }

    /// Removes the entry holding `rule`, preserving the order of the others.
    pub fn remove(&mut self, rule: &Rule<E, A>) -> Result<Classifier<E, A>, MemberNotFound> {
        let index = self.position(rule).ok_or(MemberNotFound::ClassifierSet)?;
        Ok(self.classifiers.remove(index))
    }

    /// Re-reads every entry from `population`.
    ///
    /// Entries whose rule is no longer a population member are dropped; the rest are
    /// replaced with fresh copies, numerosity included. Used when a snapshot taken at an
    /// earlier timestep is about to be updated again.
    pub fn refresh_from(&mut self, population: &Population<E, A>) {
        self.classifiers.retain_mut(|cl| match population.get(cl.rule()) {
            Some(member) => {
                cl.clone_from(member);
                true
            }
            None => false,
        });
    }

    fn position(&self, rule: &Rule<E, A>) -> Option<usize> {
        self.classifiers.iter().position(|cl| cl.rule() == rule)
    }
}

impl<E, A> FromIterator<Classifier<E, A>> for ClassifierSet<E, A> {
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = Classifier<E, A>>,
    {
        Self {
            classifiers: iter.into_iter().collect(),
        }
    }
}

impl<'a, E, A> IntoIterator for &'a ClassifierSet<E, A> {
    type Item = &'a Classifier<E, A>;
    type IntoIter = slice::Iter<'a, Classifier<E, A>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, E, A> IntoIterator for &'a mut ClassifierSet<E, A> {
    type Item = &'a mut Classifier<E, A>;
    type IntoIter = slice::IterMut<'a, Classifier<E, A>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}
