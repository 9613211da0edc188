use std::fmt;

/// Unique identifier for any unit tracked in the state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitId(pub u32);

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identifier of the team a unit fights for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TeamId(pub u8);

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "team {}", self.0)
    }
}

/// Discrete grid position expressed in cell coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Manhattan distance: `|dx| + |dy|`.
    pub fn manhattan(self, other: Position) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// Chebyshev distance: `max(|dx|, |dy|)`.
    pub fn chebyshev(self, other: Position) -> u32 {
        self.x.abs_diff(other.x).max(self.y.abs_diff(other.y))
    }

    /// Returns `true` if `other` is exactly one orthogonal step away.
    pub fn is_adjacent(self, other: Position) -> bool {
        self.manhattan(other) == 1
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::ORIGIN
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Discrete time unit: one scheduler step processing one unit's command.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Self = Self(0);

    pub fn new(value: u64) -> Self {
        Self(value)
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Integer resource meter (hit points, action points) tracked per unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourceMeter {
    pub current: u32,
    pub maximum: u32,
}

impl ResourceMeter {
    pub fn new(current: u32, maximum: u32) -> Self {
        Self { current, maximum }
    }

    /// Creates a meter filled to its maximum.
    pub fn full(maximum: u32) -> Self {
        Self {
            current: maximum,
            maximum,
        }
    }

    pub fn is_empty(self) -> bool {
        self.current == 0
    }

    /// Subtracts `amount`, flooring at zero.
    pub fn deplete(&mut self, amount: u32) {
        self.current = self.current.saturating_sub(amount);
    }

    /// Adds `amount`, capping at the maximum.
    pub fn restore(&mut self, amount: u32) {
        self.current = (self.current + amount).min(self.maximum);
    }
}

/// One of the four cardinal directions a unit can face.
///
/// Coordinate system: Y-axis increases upward (north), X-axis increases
/// rightward (east).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Facing {
    North,
    South,
    East,
    West,
}

/// Which arc of the defender an attack lands on.
///
/// Rear and flank attacks bypass the defender's guard and earn flat damage
/// bonuses in the combat formula.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AttackArc {
    Front,
    Flank,
    Rear,
}

impl Facing {
    /// Returns the offset (dx, dy) for this direction.
    pub fn offset(self) -> (i32, i32) {
        match self {
            Facing::North => (0, 1),
            Facing::South => (0, -1),
            Facing::East => (1, 0),
            Facing::West => (-1, 0),
        }
    }

    /// Returns all four directions in a fixed order.
    pub fn all() -> [Facing; 4] {
        [Facing::North, Facing::South, Facing::East, Facing::West]
    }

    pub fn opposite(self) -> Facing {
        match self {
            Facing::North => Facing::South,
            Facing::South => Facing::North,
            Facing::East => Facing::West,
            Facing::West => Facing::East,
        }
    }

    /// Dominant-axis direction from `from` toward `to`.
    ///
    /// Ties between the axes resolve toward the X axis, so a perfect diagonal
    /// reads as East/West. `from == to` reads as East; callers reject
    /// self-targeting before this matters.
    pub fn between(from: Position, to: Position) -> Facing {
        let dx = to.x - from.x;
        let dy = to.y - from.y;
        if dx.abs() >= dy.abs() {
            if dx >= 0 { Facing::East } else { Facing::West }
        } else if dy > 0 {
            Facing::North
        } else {
            Facing::South
        }
    }

    /// Classifies which arc of a defender facing `self` an attack from
    /// `attack_dir` lands on.
    ///
    /// `attack_dir` is the direction from the defender toward the attacker:
    /// attacker in front of the defender means `attack_dir == self`.
    pub fn arc_from(self, attack_dir: Facing) -> AttackArc {
        if attack_dir == self {
            AttackArc::Front
        } else if attack_dir == self.opposite() {
            AttackArc::Rear
        } else {
            AttackArc::Flank
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn facing_between_prefers_dominant_axis() {
        let origin = Position::ORIGIN;
        assert_eq!(Facing::between(origin, Position::new(3, 1)), Facing::East);
        assert_eq!(Facing::between(origin, Position::new(-3, 1)), Facing::West);
        assert_eq!(Facing::between(origin, Position::new(1, 4)), Facing::North);
        assert_eq!(Facing::between(origin, Position::new(1, -4)), Facing::South);
        // Perfect diagonal resolves toward the X axis.
        assert_eq!(Facing::between(origin, Position::new(2, 2)), Facing::East);
    }

    #[test]
    fn arc_classification() {
        // Defender faces north; attacker due north is frontal.
        assert_eq!(Facing::North.arc_from(Facing::North), AttackArc::Front);
        // Attacker due south strikes the rear.
        assert_eq!(Facing::North.arc_from(Facing::South), AttackArc::Rear);
        // East/west are flanks.
        assert_eq!(Facing::North.arc_from(Facing::East), AttackArc::Flank);
        assert_eq!(Facing::North.arc_from(Facing::West), AttackArc::Flank);
    }

    #[test]
    fn meter_floors_and_caps() {
        let mut meter = ResourceMeter::new(3, 10);
        meter.deplete(5);
        assert_eq!(meter.current, 0);
        meter.restore(15);
        assert_eq!(meter.current, 10);
    }

    #[test]
    fn distances() {
        let a = Position::new(0, 0);
        let b = Position::new(3, -4);
        assert_eq!(a.manhattan(b), 7);
        assert_eq!(a.chebyshev(b), 4);
        assert!(a.is_adjacent(Position::new(0, 1)));
        assert!(!a.is_adjacent(Position::new(1, 1)));
    }
}
