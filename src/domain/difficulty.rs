/// Difficulty escalation: every goal makes the keeper permanently faster.
/// No ceiling; the keeper's clamp keeps it between the posts at any speed.

use super::entity::Goalkeeper;

pub const DEFAULT_SPEED_INCREMENT: f32 = 0.5;

/// Apply one escalation step. Returns the new speed.
/// Negative increments are ignored so speed never decreases.
pub fn escalate(keeper: &mut Goalkeeper, increment: f32) -> f32 {
    keeper.speed += increment.max(0.0);
    keeper.speed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::{Field, Goal};

    fn keeper(speed: f32) -> Goalkeeper {
        let field = Field { width: 800.0, height: 400.0, baseline_offset: 50.0 };
        let goal = Goal::centered(&field, 400.0, 100.0, 50.0);
        Goalkeeper::on_line(&goal, 100.0, 100.0, speed)
    }

    #[test]
    fn adds_fixed_increment() {
        let mut k = keeper(3.0);
        assert_eq!(escalate(&mut k, DEFAULT_SPEED_INCREMENT), 3.5);
        assert_eq!(escalate(&mut k, DEFAULT_SPEED_INCREMENT), 4.0);
        assert_eq!(k.speed, 4.0);
    }

    #[test]
    fn negative_increment_is_ignored() {
        let mut k = keeper(3.0);
        assert_eq!(escalate(&mut k, -1.0), 3.0);
    }

    #[test]
    fn unbounded() {
        let mut k = keeper(3.0);
        for _ in 0..1000 {
            escalate(&mut k, DEFAULT_SPEED_INCREMENT);
        }
        assert_eq!(k.speed, 503.0);
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn speed_never_decreases(
                start in 0.0f32..50.0,
                steps in proptest::collection::vec(-2.0f32..2.0, 1..100),
            ) {
                let mut k = keeper(start);
                for inc in steps {
                    let before = k.speed;
                    let after = escalate(&mut k, inc);
                    prop_assert!(after >= before);
                }
            }
        }
    }
}
