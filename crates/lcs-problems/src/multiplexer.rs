//! Boolean and real multiplexer classification problems.
//!
//! A multiplexer with `k` address bits reads `k + 2^k` inputs: the address bits select
//! one of the `2^k` data bits, and the correct action is the value of that bit. With
//! `k = 2` this is the 6-multiplexer, with `k = 3` the 11-multiplexer.
//!
//! Every situation is drawn uniformly at random and answered once; a correct answer
//! earns [`CORRECT_REWARD`], a wrong one nothing.

use lcs_core::{EnvResponse, Environment, EnvironmentError, StepType};
use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg64;

pub const CORRECT_REWARD: f64 = 1000.0;

const ACTIONS: [bool; 2] = [false, true];

/// Value of the data bit selected by the address bits.
///
/// `bit(i)` reads input `i`; inputs `0..address_bits` are the address, most significant
/// first.
#[must_use]
pub fn multiplex<F>(address_bits: usize, bit: F) -> bool
where
    F: Fn(usize) -> bool,
{
    let address = (0..address_bits).fold(0, |address, i| (address << 1) | usize::from(bit(i)));
    bit(address_bits + address)
}

/// Counts answered situations against an optional epoch length.
#[derive(Debug, Clone, Copy)]
struct Epoch {
    len: Option<u64>,
    answered: u64,
}

impl Epoch {
    fn check(&self) -> Result<(), EnvironmentError> {
        match self.len {
            Some(len) if self.answered >= len => Err(EnvironmentError::EpochExhausted),
            _ => Ok(()),
        }
    }
}

fn respond(answer: bool, correct: bool) -> EnvResponse {
    let was_correct = answer == correct;
    EnvResponse {
        reward: if was_correct { CORRECT_REWARD } else { 0.0 },
        is_terminal: true,
        was_correct: Some(was_correct),
    }
}

fn assert_address_bits(address_bits: usize) {
    assert!(
        (1..=5).contains(&address_bits),
        "address_bits must be within 1..=5"
    );
}

/// The boolean multiplexer.
///
/// ```
/// use lcs_core::Environment as _;
/// use lcs_problems::multiplexer::Multiplexer;
///
/// let mut env = Multiplexer::new(2, 0);
/// let situation = env.observe()?;
/// assert_eq!(situation.len(), 6);
/// let response = env.act(Multiplexer::answer(2, &situation))?;
/// assert_eq!(response.was_correct, Some(true));
/// # Ok::<(), lcs_core::EnvironmentError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Multiplexer {
    address_bits: usize,
    rng: Pcg64,
    current: Vec<bool>,
    epoch: Epoch,
}

impl Multiplexer {
    /// # Panics
    ///
    /// Panics if `address_bits` is not within `1..=5`.
    #[must_use]
    pub fn new(address_bits: usize, seed: u64) -> Self {
        assert_address_bits(address_bits);
        let mut rng = Pcg64::seed_from_u64(seed);
        let current = Self::draw(address_bits, &mut rng);
        Self {
            address_bits,
            rng,
            current,
            epoch: Epoch {
                len: None,
                answered: 0,
            },
        }
    }

    /// Limits an epoch to `len` answered situations.
    #[must_use]
    pub fn with_epoch_len(mut self, len: u64) -> Self {
        self.epoch.len = Some(len);
        self
    }

    #[must_use]
    pub fn num_inputs(&self) -> usize {
        self.address_bits + (1 << self.address_bits)
    }

    /// The correct action for `situation`.
    #[must_use]
    pub fn answer(address_bits: usize, situation: &[bool]) -> bool {
        multiplex(address_bits, |i| situation[i])
    }

    fn draw(address_bits: usize, rng: &mut Pcg64) -> Vec<bool> {
        (0..address_bits + (1 << address_bits))
            .map(|_| rng.random())
            .collect()
    }
}

impl Environment for Multiplexer {
    type Situation = Vec<bool>;
    type Action = bool;

    fn action_set(&self) -> &[bool] {
        &ACTIONS
    }

    fn step_type(&self) -> StepType {
        StepType::SingleStep
    }

    fn observe(&mut self) -> Result<Vec<bool>, EnvironmentError> {
        self.epoch.check()?;
        Ok(self.current.clone())
    }

    fn act(&mut self, action: bool) -> Result<EnvResponse, EnvironmentError> {
        self.epoch.check()?;
        let response = respond(action, Self::answer(self.address_bits, &self.current));
        self.epoch.answered += 1;
        self.current = Self::draw(self.address_bits, &mut self.rng);
        Ok(response)
    }

    fn reset(&mut self) {
        self.epoch.answered = 0;
    }
}

/// The real multiplexer: inputs are drawn from `[0, 1)` and read as `1` from 0.5 up.
#[derive(Debug, Clone)]
pub struct RealMultiplexer {
    address_bits: usize,
    rng: Pcg64,
    current: Vec<f64>,
    epoch: Epoch,
}

impl RealMultiplexer {
    pub const THRESHOLD: f64 = 0.5;

    /// # Panics
    ///
    /// Panics if `address_bits` is not within `1..=5`.
    #[must_use]
    pub fn new(address_bits: usize, seed: u64) -> Self {
        assert_address_bits(address_bits);
        let mut rng = Pcg64::seed_from_u64(seed);
        let current = Self::draw(address_bits, &mut rng);
        Self {
            address_bits,
            rng,
            current,
            epoch: Epoch {
                len: None,
                answered: 0,
            },
        }
    }

    #[must_use]
    pub fn with_epoch_len(mut self, len: u64) -> Self {
        self.epoch.len = Some(len);
        self
    }

    #[must_use]
    pub fn num_inputs(&self) -> usize {
        self.address_bits + (1 << self.address_bits)
    }

    #[must_use]
    pub fn answer(address_bits: usize, situation: &[f64]) -> bool {
        multiplex(address_bits, |i| situation[i] >= Self::THRESHOLD)
    }

    fn draw(address_bits: usize, rng: &mut Pcg64) -> Vec<f64> {
        (0..address_bits + (1 << address_bits))
            .map(|_| rng.random())
            .collect()
    }
}

impl Environment for RealMultiplexer {
    type Situation = Vec<f64>;
    type Action = bool;

    fn action_set(&self) -> &[bool] {
        &ACTIONS
    }

    fn step_type(&self) -> StepType {
        StepType::SingleStep
    }

    fn observe(&mut self) -> Result<Vec<f64>, EnvironmentError> {
        self.epoch.check()?;
        Ok(self.current.clone())
    }

    fn act(&mut self, action: bool) -> Result<EnvResponse, EnvironmentError> {
        self.epoch.check()?;
        let response = respond(action, Self::answer(self.address_bits, &self.current));
        self.epoch.answered += 1;
        self.current = Self::draw(self.address_bits, &mut self.rng);
        Ok(response)
    }

    fn reset(&mut self) {
        self.epoch.answered = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bits(s: &str) -> Vec<bool> {
        s.chars().map(|c| c == '1').collect()
    }

    #[test]
    fn test_six_multiplexer() {
        // address 00 selects data bit 0, address 11 selects data bit 3
        assert!(Multiplexer::answer(2, &bits("001000")));
        assert!(!Multiplexer::answer(2, &bits("000111")));
        assert!(Multiplexer::answer(2, &bits("110001")));
        assert!(!Multiplexer::answer(2, &bits("101101")));
    }

    #[test]
    fn test_eleven_multiplexer() {
        let mut situation = vec![false; 11];
        situation[0] = true;
        situation[2] = true;
        // address 101 = 5 selects input 3 + 5
        assert!(!Multiplexer::answer(3, &situation));
        situation[8] = true;
        assert!(Multiplexer::answer(3, &situation));
    }

    #[test]
    fn test_rewards() {
        let mut env = Multiplexer::new(2, 5);
        for _ in 0..20 {
            let situation = env.observe().unwrap();
            let correct = Multiplexer::answer(2, &situation);
            let response = env.act(!correct).unwrap();
            assert_eq!(response.reward, 0.0);
            assert_eq!(response.was_correct, Some(false));
            assert!(response.is_terminal);

            let situation = env.observe().unwrap();
            let response = env.act(Multiplexer::answer(2, &situation)).unwrap();
            assert_eq!(response.reward, CORRECT_REWARD);
        }
    }

    #[test]
    fn test_epoch_exhaustion() {
        let mut env = Multiplexer::new(2, 5).with_epoch_len(2);
        env.observe().unwrap();
        env.act(true).unwrap();
        env.act(true).unwrap();
        assert_eq!(env.observe(), Err(EnvironmentError::EpochExhausted));
        assert_eq!(env.act(true), Err(EnvironmentError::EpochExhausted));
        env.reset();
        assert!(env.observe().is_ok());
    }

    #[test]
    fn test_same_seed_same_situations() {
        let mut a = Multiplexer::new(3, 9);
        let mut b = Multiplexer::new(3, 9);
        for _ in 0..10 {
            assert_eq!(a.observe().unwrap(), b.observe().unwrap());
            a.act(true).unwrap();
            b.act(true).unwrap();
        }
    }

    #[test]
    fn test_real_multiplexer_thresholds() {
        let situation = [0.2, 0.7, 0.1, 0.9, 0.3, 0.4];
        // address 01 selects input 3
        assert!(RealMultiplexer::answer(2, &situation));
        let mut env = RealMultiplexer::new(2, 1);
        let situation = env.observe().unwrap();
        assert_eq!(situation.len(), env.num_inputs());
        assert!(situation.iter().all(|x| (0.0..1.0).contains(x)));
    }
}
