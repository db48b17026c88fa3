use std::{collections::BTreeMap, num::NonZeroUsize, slice};

use serde::{Deserialize, Serialize};

use crate::{Classifier, ClassifierSet, MemberNotFound, Rule};

/// Kinds of structural change applied to a [`Population`].
///
/// Each mutating call names the operation it performs on behalf of, and the
/// [`OperationLedger`] counts the microclassifiers affected under that label.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    #[display("covering")]
    Covering,
    #[display("discovery")]
    Discovery,
    #[display("absorption")]
    Absorption,
    #[display("deletion")]
    Deletion,
    #[display("as_subsumption")]
    AsSubsumption,
    #[display("ga_subsumption")]
    GaSubsumption,
}

/// Write-only counters of microclassifiers affected per [`Operation`].
///
/// The ledger exists for observability; nothing in the learning loop reads it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationLedger {
    counts: BTreeMap<Operation, u64>,
}

impl OperationLedger {
    /// Microclassifiers recorded under `operation` so far (0 if never recorded).
    #[must_use]
    pub fn get(&self, operation: Operation) -> u64 {
        self.counts.get(&operation).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Operation, u64)> + '_ {
        self.counts.iter().map(|(op, count)| (*op, *count))
    }

    fn record(&mut self, operation: Operation, micros: u64) {
        *self.counts.entry(operation).or_default() += micros;
    }
}

/// Outcome of [`Population::insert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum Insertion {
    /// The classifier became a new entry.
    Added,
    /// A structurally equal rule already existed and took over the numerosity.
    Absorbed,
}

/// The canonical, capacity-bounded store of classifiers.
///
/// The population is the single owner of every long-lived classifier. Entries are kept
/// in creation order, which later serves as the tie-breaker wherever "first found" wins.
///
/// # Size Accounting
///
/// The population size is read on every timestep, so [`num_micros`](Self::num_micros)
/// is maintained incrementally by every mutating call instead of being recomputed from
/// the entries. [`num_macros`](Self::num_macros) is the entry count.
///
/// `num_micros` may temporarily exceed [`max_micros`](Self::max_micros) after
/// insertions; the deletion pass run at the end of each training step brings it back.
///
/// # Operations
///
/// | call          | effect on `num_micros`   | ledger label                |
/// |---------------|--------------------------|-----------------------------|
/// | [`add`]       | `+ numerosity`           | caller's                    |
/// | [`insert`]    | `+ numerosity`           | caller's, or `absorption`   |
/// | [`duplicate`] | `+ copies`               | caller's                    |
/// | [`replace`]   | unchanged                | caller's                    |
/// | [`delete`]    | `- 1`                    | `deletion`                  |
///
/// [`add`]: Self::add
/// [`insert`]: Self::insert
/// [`duplicate`]: Self::duplicate
/// [`replace`]: Self::replace
/// [`delete`]: Self::delete
#[derive(Debug, Clone)]
pub struct Population<E, A> {
    classifiers: Vec<Classifier<E, A>>,
    num_micros: u64,
    max_micros: NonZeroUsize,
    ledger: OperationLedger,
}

impl<E, A> Population<E, A> {
    /// Creates an empty population holding at most `max_micros` microclassifiers after
    /// each deletion pass.
    #[must_use]
    pub fn new(max_micros: NonZeroUsize) -> Self {
        Self {
            classifiers: Vec::new(),
            num_micros: 0,
            max_micros,
            ledger: OperationLedger::default(),
        }
    }

    #[must_use]
    pub fn num_macros(&self) -> usize {
        self.classifiers.len()
    }

    #[must_use]
    pub fn num_micros(&self) -> u64 {
        self.num_micros
    }

    #[must_use]
    pub fn max_micros(&self) -> NonZeroUsize {
        self.max_micros
    }

    /// Number of microclassifiers above capacity (0 when within capacity).
    #[must_use]
    pub fn excess_micros(&self) -> u64 {
        self.num_micros.saturating_sub(self.max_micros.get() as u64)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classifiers.is_empty()
    }

    #[must_use]
    pub fn ledger(&self) -> &OperationLedger {
        &self.ledger
    }

    pub fn iter(&self) -> slice::Iter<'_, Classifier<E, A>> {
        self.classifiers.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Classifier<E, A>] {
        &self.classifiers
    }

    /// Unconditionally appends `classifier` as a new entry.
    pub fn add(&mut self, classifier: Classifier<E, A>, operation: Operation) {
        let micros = u64::from(classifier.numerosity());
        self.classifiers.push(classifier);
        self.num_micros += micros;
        self.ledger.record(operation, micros);
    }

    /// Copies every member satisfying `predicate` into a fresh [`ClassifierSet`].
    pub fn snapshot<F>(&self, mut predicate: F) -> ClassifierSet<E, A>
    where
        F: FnMut(&Classifier<E, A>) -> bool,
        E: Clone,
        A: Clone,
    {
        self.classifiers
            .iter()
            .filter(|cl| predicate(cl))
            .cloned()
            .collect()
    }
}

impl<E, A> Population<E, A>
where
    E: PartialEq,
    A: PartialEq,
{
    #[must_use]
    pub fn contains(&self, rule: &Rule<E, A>) -> bool {
        self.position(rule).is_some()
    }

    #[must_use]
    pub fn get(&self, rule: &Rule<E, A>) -> Option<&Classifier<E, A>> {
        self.position(rule).map(|i| &self.classifiers[i])
    }

    /// Adds `classifier`, merging it into an existing entry with a structurally equal rule.
    ///
    /// When such an entry exists its numerosity grows by the incoming numerosity, the
    /// incoming statistics are discarded, and the change is recorded as
    /// [`Operation::Absorption`] (counting the merged entry's resulting numerosity)
    /// instead of `operation`. Otherwise this behaves like [`add`](Self::add).
    pub fn insert(&mut self, classifier: Classifier<E, A>, operation: Operation) -> Insertion {
        let Some(index) = self.position(classifier.rule()) else {
            self.add(classifier, operation);
            return Insertion::Added;
        };
        let incoming = classifier.numerosity();
        let existing = &mut self.classifiers[index];
        existing.add_numerosity(incoming);
        let merged = u64::from(existing.numerosity());
        self.num_micros += u64::from(incoming);
        self.ledger.record(Operation::Absorption, merged);
        Insertion::Absorbed
    }

    /// Grows the numerosity of the member holding `rule` by `copies`.
    pub fn duplicate(
        &mut self,
        rule: &Rule<E, A>,
        copies: u32,
        operation: Operation,
    ) -> Result<(), MemberNotFound> {
        let index = self.position(rule).ok_or(MemberNotFound::Population)?;
        self.classifiers[index].add_numerosity(copies);
        self.num_micros += u64::from(copies);
        self.ledger.record(operation, u64::from(copies));
        Ok(())
    }

    /// Removes `replacee` entirely and hands its numerosity to `replacer`.
    ///
    /// The population size is unchanged. Both rules must be members; replacing a rule
    /// with itself is a no-op.
    pub fn replace(
        &mut self,
        replacee: &Rule<E, A>,
        replacer: &Rule<E, A>,
        operation: Operation,
    ) -> Result<(), MemberNotFound> {
        let replacee_index = self.position(replacee).ok_or(MemberNotFound::Population)?;
        let replacer_index = self.position(replacer).ok_or(MemberNotFound::Population)?;
        if replacee_index == replacer_index {
            return Ok(());
        }
        let removed = self.classifiers.remove(replacee_index);
        let replacer_index = if replacer_index > replacee_index {
            replacer_index - 1
        } else {
            replacer_index
        };
        self.classifiers[replacer_index].add_numerosity(removed.numerosity());
        self.ledger
            .record(operation, u64::from(removed.numerosity()));
        Ok(())
    }

    /// Removes one logical copy of the member holding `rule`, dropping the entry once
    /// its last copy is gone.
    pub fn delete(&mut self, rule: &Rule<E, A>) -> Result<(), MemberNotFound> {
        let index = self.position(rule).ok_or(MemberNotFound::Population)?;
        let classifier = &mut self.classifiers[index];
        if classifier.numerosity() > 1 {
            classifier.set_numerosity(classifier.numerosity() - 1);
        } else {
            self.classifiers.remove(index);
        }
        self.num_micros -= 1;
        self.ledger.record(Operation::Deletion, 1);
        Ok(())
    }

    /// Writes the learned statistics of every snapshot entry back to the matching member.
    ///
    /// Numerosity is owned by the population and is never copied back. Entries whose
    /// rule is no longer a member are skipped. Returns the number of members updated.
    pub fn commit(&mut self, set: &ClassifierSet<E, A>) -> usize {
        let mut updated = 0;
        for cl in set {
            if let Some(index) = self.position(cl.rule()) {
                self.classifiers[index].copy_statistics_from(cl);
                updated += 1;
            }
        }
        updated
    }

    fn position(&self, rule: &Rule<E, A>) -> Option<usize> {
        self.classifiers.iter().position(|cl| cl.rule() == rule)
    }
}

impl<'a, E, A> IntoIterator for &'a Population<E, A> {
    type Item = &'a Classifier<E, A>;
    type IntoIter = slice::Iter<'a, Classifier<E, A>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use rand::{Rng as _, SeedableRng as _};
    use rand_pcg::Pcg32;

    use super::*;
    use crate::InitialEstimates;

    const ESTIMATES: InitialEstimates = InitialEstimates {
        prediction: 10.0,
        error: 0.0,
        fitness: 0.01,
    };

    type Cl = Classifier<u8, bool>;

    fn classifier(bits: &[u8], action: bool, numerosity: u32) -> Cl {
        let mut cl = Classifier::new(Rule::new(bits.to_vec(), action), ESTIMATES, 0);
        cl.set_numerosity(numerosity);
        cl
    }

    fn population(max_micros: usize) -> Population<u8, bool> {
        Population::new(NonZeroUsize::new(max_micros).unwrap())
    }

    fn sum_numerosity(population: &Population<u8, bool>) -> u64 {
        population.iter().map(|cl| u64::from(cl.numerosity())).sum()
    }

    #[test]
    fn test_add_keeps_duplicates_separate() {
        let mut pop = population(10);
        pop.add(classifier(&[0, 1], true, 2), Operation::Covering);
        pop.add(classifier(&[0, 1], true, 1), Operation::Covering);
        assert_eq!(pop.num_macros(), 2);
        assert_eq!(pop.num_micros(), 3);
        assert_eq!(pop.ledger().get(Operation::Covering), 3);
    }

    #[test]
    fn test_insert_absorbs_structural_duplicate() {
        let mut pop = population(2);
        let a = classifier(&[0, 2], true, 1);
        let b = classifier(&[0, 2], true, 2);

        assert!(pop.insert(a, Operation::Discovery).is_added());
        assert!(pop.insert(b.clone(), Operation::Discovery).is_absorbed());

        assert_eq!(pop.num_macros(), 1);
        assert_eq!(pop.num_micros(), 3);
        assert_eq!(pop.get(b.rule()).unwrap().numerosity(), 3);
        assert_eq!(pop.ledger().get(Operation::Absorption), 3);
        assert_eq!(pop.ledger().get(Operation::Discovery), 1);
        assert_eq!(pop.ledger().get(Operation::Covering), 0);
        assert_eq!(pop.excess_micros(), 1);

        pop.delete(b.rule()).unwrap();
        assert_eq!(pop.num_micros(), 2);
        assert_eq!(pop.excess_micros(), 0);
        assert_eq!(pop.ledger().get(Operation::Deletion), 1);
    }

    #[test]
    fn test_ledger_serializes_with_operation_labels() {
        let mut pop = population(10);
        pop.add(classifier(&[0, 1], true, 2), Operation::Covering);
        pop.insert(classifier(&[0, 1], true, 1), Operation::Discovery);
        let json = serde_json::to_string(pop.ledger()).unwrap();
        assert_eq!(json, r#"{"counts":{"covering":2,"absorption":3}}"#);

        for op in [Operation::AsSubsumption, Operation::GaSubsumption] {
            assert_eq!(serde_json::to_string(&op).unwrap(), format!("\"{op}\""));
        }
        let parsed: OperationLedger = serde_json::from_str(&json).unwrap();
        assert_eq!(&parsed, pop.ledger());
    }

    #[test]
    fn test_insert_distinguishes_actions() {
        let mut pop = population(10);
        pop.insert(classifier(&[0, 2], true, 1), Operation::Discovery);
        pop.insert(classifier(&[0, 2], false, 1), Operation::Discovery);
        assert_eq!(pop.num_macros(), 2);
        assert_eq!(pop.ledger().get(Operation::Absorption), 0);
    }

    #[test]
    fn test_duplicate_requires_membership() {
        let mut pop = population(10);
        let a = classifier(&[1, 1], false, 1);
        assert_eq!(
            pop.duplicate(a.rule(), 1, Operation::GaSubsumption),
            Err(MemberNotFound::Population)
        );
        pop.add(a.clone(), Operation::Covering);
        pop.duplicate(a.rule(), 4, Operation::GaSubsumption).unwrap();
        assert_eq!(pop.get(a.rule()).unwrap().numerosity(), 5);
        assert_eq!(pop.num_micros(), 5);
        assert_eq!(pop.ledger().get(Operation::GaSubsumption), 4);
    }

    #[test]
    fn test_replace_is_size_neutral() {
        let mut pop = population(10);
        let general = classifier(&[2, 2], true, 2);
        let specific = classifier(&[0, 1], true, 3);
        pop.add(specific.clone(), Operation::Covering);
        pop.add(general.clone(), Operation::Covering);

        pop.replace(specific.rule(), general.rule(), Operation::AsSubsumption)
            .unwrap();

        assert_eq!(pop.num_micros(), 5);
        assert_eq!(pop.num_macros(), 1);
        assert!(!pop.contains(specific.rule()));
        assert_eq!(pop.get(general.rule()).unwrap().numerosity(), 5);
        assert_eq!(pop.ledger().get(Operation::AsSubsumption), 3);
    }

    #[test]
    fn test_replace_requires_both_members() {
        let mut pop = population(10);
        let a = classifier(&[2, 2], true, 1);
        let b = classifier(&[0, 1], true, 1);
        pop.add(a.clone(), Operation::Covering);
        assert_eq!(
            pop.replace(b.rule(), a.rule(), Operation::AsSubsumption),
            Err(MemberNotFound::Population)
        );
        assert_eq!(
            pop.replace(a.rule(), b.rule(), Operation::AsSubsumption),
            Err(MemberNotFound::Population)
        );
        assert_eq!(pop.num_micros(), 1);
        assert!(pop.contains(a.rule()));
    }

    #[test]
    fn test_delete_removes_entry_at_last_copy() {
        let mut pop = population(10);
        let a = classifier(&[1, 0], true, 2);
        pop.add(a.clone(), Operation::Covering);
        pop.delete(a.rule()).unwrap();
        assert_eq!(pop.num_macros(), 1);
        pop.delete(a.rule()).unwrap();
        assert!(pop.is_empty());
        assert_eq!(pop.num_micros(), 0);
        assert_eq!(pop.delete(a.rule()), Err(MemberNotFound::Population));
    }

    #[test]
    fn test_commit_keeps_population_numerosity() {
        let mut pop = population(10);
        let a = classifier(&[1, 0], true, 2);
        pop.add(a.clone(), Operation::Covering);

        let mut set = pop.snapshot(|_| true);
        for cl in &mut set {
            cl.set_prediction(42.0);
            cl.set_numerosity(1);
        }
        pop.duplicate(a.rule(), 1, Operation::Discovery).unwrap();

        assert_eq!(pop.commit(&set), 1);
        let member = pop.get(a.rule()).unwrap();
        assert!((member.prediction() - 42.0).abs() < f64::EPSILON);
        assert_eq!(member.numerosity(), 3);
    }

    #[test]
    fn test_random_operations_keep_micro_count_consistent() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut pop = population(50);
        for _ in 0..2000 {
            let bits = [rng.random_range(0..3), rng.random_range(0..3)];
            let action = rng.random_bool(0.5);
            let cl = classifier(&bits, action, rng.random_range(1..4));
            match rng.random_range(0..5) {
                0 => pop.add(cl, Operation::Covering),
                1 => {
                    pop.insert(cl, Operation::Discovery);
                }
                2 => {
                    let _ = pop.duplicate(cl.rule(), 2, Operation::GaSubsumption);
                }
                3 => {
                    if let Some(other) = pop.iter().next().map(|c| c.rule().clone()) {
                        let _ = pop.replace(cl.rule(), &other, Operation::AsSubsumption);
                    }
                }
                _ => {
                    let _ = pop.delete(cl.rule());
                }
            }
            assert_eq!(pop.num_micros(), sum_numerosity(&pop));
        }
    }
}
