/// Entities: Player, Ball, Goalkeeper, Goal, Field.
/// Plain records. Behaviour lives in keeper / shot / difficulty.
///
/// All coordinates are field pixels: origin top-left, y grows downward.
/// The goal sits near the top edge, the kick spot near the bottom.

/// Shot direction chosen by the player.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ShotDirection {
    Left,
    Center,
    Right,
}

impl ShotDirection {
    pub fn label(self) -> &'static str {
        match self {
            ShotDirection::Left => "left",
            ShotDirection::Center => "center",
            ShotDirection::Right => "right",
        }
    }
}

/// Per-shot state machine, derived from the player record.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ShotPhase {
    /// No direction pending.
    Idle,
    /// Direction pending, ball still at rest.
    Aimed(ShotDirection),
    /// Ball moving.
    InFlight(ShotDirection),
}

/// Horizontal heading of the goalkeeper.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Heading {
    Left,
    Right,
}

impl Heading {
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Heading::Left => -1.0,
            Heading::Right => 1.0,
        }
    }

    #[inline]
    pub fn flipped(self) -> Heading {
        match self {
            Heading::Left => Heading::Right,
            Heading::Right => Heading::Left,
        }
    }
}

/// Play-area bounds.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Field {
    pub width: f32,
    pub height: f32,
    /// Distance from the bottom edge to the player's baseline.
    pub baseline_offset: f32,
}

impl Field {
    /// Where the player stands and the ball rests between shots.
    pub fn kick_spot(&self) -> (f32, f32) {
        (self.width / 2.0, self.height - self.baseline_offset)
    }

    /// Has a point left the play area? The bottom edge is never reached
    /// by a shot, so only top / left / right count.
    pub fn is_outside(&self, x: f32, y: f32) -> bool {
        y < 0.0 || x < 0.0 || x > self.width
    }
}

/// The goal mouth. Immutable for a session.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Goal {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Goal {
    /// Goal of the given size, horizontally centered in the field.
    pub fn centered(field: &Field, width: f32, height: f32, y: f32) -> Self {
        Goal { x: (field.width - width) / 2.0, y, width, height }
    }

    pub fn left(&self) -> f32 { self.x }
    pub fn right(&self) -> f32 { self.x + self.width }
    pub fn center_x(&self) -> f32 { self.x + self.width / 2.0 }

    /// y of the scoring plane (lower edge of the goal rectangle).
    pub fn line_y(&self) -> f32 { self.y + self.height }

    /// Has the ball crossed the goal line between the posts?
    pub fn contains_crossing(&self, x: f32, y: f32) -> bool {
        y < self.line_y() && x > self.left() && x < self.right()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub x: f32,
    pub y: f32,
    pub pending: Option<ShotDirection>,
    pub in_flight: bool,
}

impl Player {
    pub fn new(x: f32, y: f32) -> Self {
        Player { x, y, pending: None, in_flight: false }
    }

    /// Aim a shot. Rejected while the ball is in flight.
    /// Re-aiming before the kick replaces the previous direction.
    pub fn aim(&mut self, dir: ShotDirection) -> bool {
        if self.in_flight {
            return false;
        }
        self.pending = Some(dir);
        true
    }

    pub fn shot_phase(&self) -> ShotPhase {
        match (self.pending, self.in_flight) {
            (Some(d), true) => ShotPhase::InFlight(d),
            (Some(d), false) => ShotPhase::Aimed(d),
            (None, _) => ShotPhase::Idle,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Ball {
    pub x: f32,
    pub y: f32,
    pub dx: f32,
    pub dy: f32,
    pub radius: f32,
}

impl Ball {
    pub fn new(x: f32, y: f32, radius: f32) -> Self {
        Ball { x, y, dx: 0.0, dy: 0.0, radius }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Goalkeeper {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub speed: f32,
    pub heading: Heading,
}

impl Goalkeeper {
    /// Keeper standing on the goal line, centered between the posts.
    pub fn on_line(goal: &Goal, width: f32, height: f32, speed: f32) -> Self {
        Goalkeeper {
            x: goal.center_x(),
            y: goal.line_y(),
            width,
            height,
            speed,
            heading: Heading::Right,
        }
    }

    pub fn half_width(&self) -> f32 { self.width / 2.0 }
    pub fn left_edge(&self) -> f32 { self.x - self.half_width() }
    pub fn right_edge(&self) -> f32 { self.x + self.half_width() }

    /// Strictly inside the keeper's horizontal reach.
    pub fn covers(&self, x: f32) -> bool {
        x > self.left_edge() && x < self.right_edge()
    }
}
