/// Goalkeeper motion: a bounded, deterministic oscillator.
///
/// Each tick:
///   1. If the leading edge (the side the keeper is moving toward) is at
///      or past its post, turn around.
///   2. Move `speed` pixels along the heading.
///   3. Clamp so the whole body stays between the posts, whatever `speed`
///      escalation has reached.

use super::entity::{Goal, Goalkeeper, Heading};

/// Advance the keeper by one tick. Returns true if the heading flipped.
pub fn advance(keeper: &mut Goalkeeper, goal: &Goal) -> bool {
    let at_post = match keeper.heading {
        Heading::Left => keeper.left_edge() <= goal.left(),
        Heading::Right => keeper.right_edge() >= goal.right(),
    };
    if at_post {
        keeper.heading = keeper.heading.flipped();
    }

    keeper.x += keeper.speed * keeper.heading.sign();
    keeper.x = clamp_center(keeper, goal);

    at_post
}

/// Legal range for the keeper's center.
/// A keeper wider than the goal is pinned to the goal center.
fn clamp_center(keeper: &Goalkeeper, goal: &Goal) -> f32 {
    let half = keeper.half_width();
    let lo = goal.left() + half;
    let hi = goal.right() - half;
    if lo > hi || lo.is_nan() || hi.is_nan() {
        goal.center_x()
    } else {
        keeper.x.clamp(lo, hi)
    }
}
