//! Ready-to-use behavior trees for unit archetypes.
//!
//! Each preset composes the [`AiNode`] vocabulary under a top-level selector
//! ending in `Pass`, so every evaluation decides something and a unit out of
//! options simply ends its turn. Personalities differ by composition and
//! thresholds, never by new node types.

use behavior_tree::{Tree, TreeBuilder};

use super::AiNode;

/// Aggressive melee: attack when adjacent, otherwise close the distance.
///
/// ```text
/// Selector
///   ├─ Sequence [EnemyInRange(melee), AttackNearestEnemy]
///   ├─ MoveTowardNearestEnemy
///   └─ Pass
/// ```
pub fn aggressive() -> Tree<AiNode> {
    let mut b = TreeBuilder::new();
    let in_reach = b.leaf(AiNode::EnemyInRange { range: 1 });
    let attack = b.leaf(AiNode::AttackNearestEnemy);
    let engage = b.sequence(vec![in_reach, attack]);
    let advance = b.leaf(AiNode::MoveTowardNearestEnemy);
    let pass = b.leaf(AiNode::Pass);
    let root = b.selector(vec![engage, advance, pass]);
    b.build(root)
}

/// Cautious melee: breaks off to open distance when wounded.
///
/// # Arguments
///
/// * `flee_percent` - Hit-point percentage below which the unit retreats.
///   Lower values fight longer; typical range 20-40.
pub fn cautious(flee_percent: u32) -> Tree<AiNode> {
    let mut b = TreeBuilder::new();
    let wounded = b.leaf(AiNode::HpBelow {
        percent: flee_percent,
    });
    let fall_back = b.leaf(AiNode::Retreat { distance: 4 });
    let flee = b.sequence(vec![wounded, fall_back]);

    let in_reach = b.leaf(AiNode::EnemyInRange { range: 1 });
    let attack = b.leaf(AiNode::AttackNearestEnemy);
    let engage = b.sequence(vec![in_reach, attack]);

    let advance = b.leaf(AiNode::MoveTowardNearestEnemy);
    let pass = b.leaf(AiNode::Pass);
    let root = b.selector(vec![flee, engage, advance, pass]);
    b.build(root)
}

/// Skirmisher: poisons at reach, falls back on melee, then closes in.
///
/// # Arguments
///
/// * `poison_range` - Chebyshev reach for the poison attempt (capped by the
///   rules engine's status range).
pub fn skirmisher(poison_range: u32) -> Tree<AiNode> {
    let mut b = TreeBuilder::new();
    let in_poison_reach = b.leaf(AiNode::EnemyInRange {
        range: poison_range,
    });
    let poison = b.leaf(AiNode::PoisonNearestEnemy {
        range: poison_range,
        duration: 3,
        magnitude: 1,
    });
    let harass = b.sequence(vec![in_poison_reach, poison]);

    let in_reach = b.leaf(AiNode::EnemyInRange { range: 1 });
    let attack = b.leaf(AiNode::AttackNearestEnemy);
    let engage = b.sequence(vec![in_reach, attack]);

    let advance = b.leaf(AiNode::MoveTowardNearestEnemy);
    let pass = b.leaf(AiNode::Pass);
    let root = b.selector(vec![harass, engage, advance, pass]);
    b.build(root)
}

/// Stationary target that never acts. Safe default for scripted scenes and
/// tests.
pub fn dummy() -> Tree<AiNode> {
    let mut b = TreeBuilder::new();
    let pass = b.leaf(AiNode::Pass);
    b.build(pass)
}
