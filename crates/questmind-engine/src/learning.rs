//! Exponential-moving-average update for the optimization weights.

use questmind_types::OptimizationWeights;

/// Step size of every update.
pub const LEARNING_RATE: f64 = 0.1;

/// Observed metrics from one completed action.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Outcome {
    /// 1.0 for a successful action, 0.0 for a failed one.
    pub success_rate: f64,
    /// Fraction of the expected value obtained, in `[0, 1]`.
    pub reward_efficiency: f64,
}

/// Move `quest_success_rate` and `reward_efficiency` toward `outcome`.
///
/// `w <- w + 0.1 * (observed - w)`. The other two weights are untouched.
#[must_use]
pub fn apply(weights: OptimizationWeights, outcome: Outcome) -> OptimizationWeights {
    OptimizationWeights {
        quest_success_rate: step(weights.quest_success_rate, outcome.success_rate),
        reward_efficiency: step(weights.reward_efficiency, outcome.reward_efficiency),
        ..weights
    }
}

fn step(current: f64, observed: f64) -> f64 {
    LEARNING_RATE.mul_add(observed - current, current)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_step() {
        let out = apply(
            OptimizationWeights::default(),
            Outcome {
                success_rate: 1.0,
                reward_efficiency: 0.0,
            },
        );
        assert!((out.quest_success_rate - 0.46).abs() < 1e-12);
        assert!((out.reward_efficiency - 0.27).abs() < 1e-12);
        assert!((out.stamina_management - 0.2).abs() < f64::EPSILON);
        assert!((out.time_efficiency - 0.1).abs() < f64::EPSILON);
    }

    #[test]
    fn converges_monotonically() {
        let target = Outcome {
            success_rate: 0.9,
            reward_efficiency: 0.05,
        };
        let mut weights = OptimizationWeights::default();
        let mut gap_success = (target.success_rate - weights.quest_success_rate).abs();
        let mut gap_reward = (target.reward_efficiency - weights.reward_efficiency).abs();
        for _ in 0..200 {
            weights = apply(weights, target);
            let next_success = (target.success_rate - weights.quest_success_rate).abs();
            let next_reward = (target.reward_efficiency - weights.reward_efficiency).abs();
            assert!(next_success <= gap_success);
            assert!(next_reward <= gap_reward);
            assert!(weights.quest_success_rate <= target.success_rate);
            assert!(weights.reward_efficiency >= target.reward_efficiency);
            gap_success = next_success;
            gap_reward = next_reward;
        }
        assert!(gap_success < 1e-6);
        assert!(gap_reward < 1e-6);
    }
}
