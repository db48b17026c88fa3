//! A one-dimensional corridor, the simplest multi-step problem.
//!
//! The agent stands on one of `length` cells and moves left or right. Reaching the
//! rightmost cell earns [`GOAL_REWARD`] and ends the episode; running out of steps ends
//! it with nothing. Every other move is rewarded 0, so the goal's reward has to be
//! propagated back along the corridor by discounting.
//!
//! The situation is the agent's cell, binary encoded with the most significant bit first.
//! After a terminal step the next episode starts at once from a random non-goal cell.

use lcs_core::{EnvResponse, Environment, EnvironmentError, StepType};
use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg64;
use serde::{Deserialize, Serialize};

pub const GOAL_REWARD: f64 = 1000.0;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Move {
    Left,
    Right,
}

const ACTIONS: [Move; 2] = [Move::Left, Move::Right];

#[derive(Debug, Clone)]
pub struct Corridor {
    length: usize,
    max_steps: u64,
    position: usize,
    steps: u64,
    rng: Pcg64,
}

impl Corridor {
    /// # Panics
    ///
    /// Panics if `length` is less than 2 or `max_steps` is 0.
    #[must_use]
    pub fn new(length: usize, max_steps: u64, seed: u64) -> Self {
        assert!(length >= 2, "corridor needs at least two cells");
        assert!(max_steps > 0, "max_steps must be positive");
        let mut corridor = Self {
            length,
            max_steps,
            position: 0,
            steps: 0,
            rng: Pcg64::seed_from_u64(seed),
        };
        corridor.start_episode();
        corridor
    }

    #[must_use]
    pub fn length(&self) -> usize {
        self.length
    }

    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    #[must_use]
    pub fn goal(&self) -> usize {
        self.length - 1
    }

    /// Steps taken in the current episode.
    #[must_use]
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Number of bits in a situation.
    #[must_use]
    pub fn num_inputs(&self) -> usize {
        (usize::BITS - (self.length - 1).leading_zeros()).max(1) as usize
    }

    /// The situation seen at `position`.
    #[must_use]
    pub fn encode(&self, position: usize) -> Vec<bool> {
        let width = self.num_inputs();
        (0..width)
            .rev()
            .map(|bit| (position >> bit) & 1 == 1)
            .collect()
    }

    fn start_episode(&mut self) {
        self.position = self.rng.random_range(0..self.goal());
        self.steps = 0;
    }
}

impl Environment for Corridor {
    type Situation = Vec<bool>;
    type Action = Move;

    fn action_set(&self) -> &[Move] {
        &ACTIONS
    }

    fn step_type(&self) -> StepType {
        StepType::MultiStep
    }

    fn observe(&mut self) -> Result<Vec<bool>, EnvironmentError> {
        Ok(self.encode(self.position))
    }

    fn act(&mut self, action: Move) -> Result<EnvResponse, EnvironmentError> {
        self.position = match action {
            Move::Left => self.position.saturating_sub(1),
            Move::Right => (self.position + 1).min(self.goal()),
        };
        self.steps += 1;

        let reached_goal = self.position == self.goal();
        let response = EnvResponse {
            reward: if reached_goal { GOAL_REWARD } else { 0.0 },
            is_terminal: reached_goal || self.steps >= self.max_steps,
            was_correct: None,
        };
        if response.is_terminal {
            self.start_episode();
        }
        Ok(response)
    }

    fn reset(&mut self) {
        self.start_episode();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoding() {
        let corridor = Corridor::new(8, 20, 0);
        assert_eq!(corridor.num_inputs(), 3);
        assert_eq!(corridor.encode(5), [true, false, true]);
        assert_eq!(Corridor::new(2, 20, 0).num_inputs(), 1);
        assert_eq!(Corridor::new(9, 20, 0).num_inputs(), 4);
    }

    #[test]
    fn test_walk_to_goal() {
        let mut corridor = Corridor::new(6, 100, 1);
        let start = corridor.position();
        assert!(start < corridor.goal());
        for _ in start..corridor.goal() - 1 {
            let response = corridor.act(Move::Right).unwrap();
            assert_eq!(response.reward, 0.0);
            assert!(!response.is_terminal);
        }
        let response = corridor.act(Move::Right).unwrap();
        assert_eq!(response.reward, GOAL_REWARD);
        assert!(response.is_terminal);
        // a new episode has started
        assert!(corridor.position() < corridor.goal());
        assert_eq!(corridor.steps(), 0);
    }

    #[test]
    fn test_step_limit_ends_episode() {
        let mut corridor = Corridor::new(6, 3, 2);
        assert!(!corridor.act(Move::Left).unwrap().is_terminal);
        assert!(!corridor.act(Move::Left).unwrap().is_terminal);
        let response = corridor.act(Move::Left).unwrap();
        assert!(response.is_terminal);
        assert_eq!(response.reward, 0.0);
    }

    #[test]
    fn test_left_wall() {
        let mut corridor = Corridor::new(4, 100, 3);
        for _ in 0..5 {
            corridor.act(Move::Left).unwrap();
        }
        assert_eq!(corridor.position(), 0);
        assert_eq!(corridor.observe().unwrap(), [false, false]);
    }
}
