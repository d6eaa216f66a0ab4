//! Run map: the floor-by-floor node choices between combats.
//!
//! Each floor offers three distinct node types drawn from a fixed pool with
//! the shared xorshift generator keyed by `seed ^ floor * 9973`, so the same
//! seed always offers the same map.

use serde::{Deserialize, Serialize};

use crate::core::{DeterministicRng, GameRng};

/// Choices offered per floor.
pub const CHOICES_PER_FLOOR: usize = 3;

/// Visited nodes kept in history.
pub const HISTORY_LIMIT: usize = 20;

/// Kind of run node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeType {
    /// Regular fight.
    Battle,
    /// Choice event.
    Event,
    /// Shop.
    Shop,
    /// Rest site.
    Rest,
    /// Elite fight.
    Elite,
    /// Boss fight; never offered by the random pool.
    Boss,
}

impl NodeType {
    /// Types the random pool draws from, in draw order.
    pub const POOL: [NodeType; 5] = [
        NodeType::Battle,
        NodeType::Event,
        NodeType::Shop,
        NodeType::Rest,
        NodeType::Elite,
    ];

    /// Display title.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            NodeType::Battle => "Battle",
            NodeType::Event => "Event",
            NodeType::Shop => "Shop",
            NodeType::Rest => "Rest",
            NodeType::Elite => "Elite",
            NodeType::Boss => "Boss",
        }
    }

    /// Display description.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            NodeType::Battle => "A regular fight. May reward cards or coin.",
            NodeType::Event => "A choice event. High risk, high return.",
            NodeType::Shop => "Buy cards or items, trim the deck.",
            NodeType::Rest => "Recover or upgrade.",
            NodeType::Elite => "A harder fight with better rewards.",
            NodeType::Boss => "The floor guardian.",
        }
    }
}

/// One node on the map.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunNode {
    /// Floor the node sits on.
    pub floor: u32,
    /// Node kind.
    #[serde(rename = "type")]
    pub node_type: NodeType,
    /// Display title.
    pub title: String,
    /// Display description.
    pub desc: String,
}

impl RunNode {
    fn new(floor: u32, node_type: NodeType) -> Self {
        Self {
            floor,
            node_type,
            title: node_type.title().to_string(),
            desc: node_type.description().to_string(),
        }
    }
}

/// Three distinct nodes for `floor` of the run seeded with `seed`.
#[must_use]
pub fn make_choices(floor: u32, seed: u64) -> Vec<RunNode> {
    let mut rng = GameRng::new(seed ^ (u64::from(floor) * 9973));
    let mut out: Vec<RunNode> = Vec::with_capacity(CHOICES_PER_FLOOR);
    while out.len() < CHOICES_PER_FLOOR {
        let index = (rng.unit_f64() * NodeType::POOL.len() as f64) as usize;
        let node_type = NodeType::POOL[index.min(NodeType::POOL.len() - 1)];
        if out.iter().all(|n| n.node_type != node_type) {
            out.push(RunNode::new(floor, node_type));
        }
    }
    out
}

/// Persisted run progress.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunState {
    /// Map seed.
    pub seed: u64,
    /// Current floor (starts at 1).
    pub floor: u32,
    /// Visited nodes, newest first.
    #[serde(default)]
    pub history: Vec<RunNode>,
    /// Nodes offered on the current floor.
    #[serde(default)]
    pub choices: Vec<RunNode>,
}

impl RunState {
    /// Fresh run at floor 1.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            floor: 1,
            history: Vec::new(),
            choices: make_choices(1, seed),
        }
    }

    /// Regenerate choices if a restored run has none.
    pub fn ensure_choices(&mut self) {
        if self.choices.is_empty() {
            self.choices = make_choices(self.floor, self.seed);
        }
    }

    /// Take choice `index`: record it, advance a floor and offer new
    /// choices. Returns the picked node, or `None` for a bad index.
    pub fn pick(&mut self, index: usize) -> Option<RunNode> {
        let node = self.choices.get(index)?.clone();
        self.floor += 1;
        self.history.insert(0, node.clone());
        self.history.truncate(HISTORY_LIMIT);
        self.choices = make_choices(self.floor, self.seed);
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_choices_are_distinct_and_stable() {
        for floor in 1..30 {
            let a = make_choices(floor, 123_456);
            let b = make_choices(floor, 123_456);
            assert_eq!(a, b);
            assert_eq!(a.len(), CHOICES_PER_FLOOR);
            assert!(a.iter().all(|n| n.floor == floor && n.node_type != NodeType::Boss));
            assert_ne!(a[0].node_type, a[1].node_type);
            assert_ne!(a[0].node_type, a[2].node_type);
            assert_ne!(a[1].node_type, a[2].node_type);
        }
    }

    #[test]
    fn test_pick_advances() {
        let mut run = RunState::new(42);
        let offered = run.choices[1].clone();

        assert_eq!(run.pick(1), Some(offered.clone()));
        assert_eq!(run.floor, 2);
        assert_eq!(run.history, vec![offered]);
        assert!(run.choices.iter().all(|n| n.floor == 2));
        assert_eq!(run.pick(9), None);
        assert_eq!(run.floor, 2);
    }

    #[test]
    fn test_history_is_capped() {
        let mut run = RunState::new(7);
        for _ in 0..25 {
            run.pick(0).unwrap();
        }
        assert_eq!(run.history.len(), HISTORY_LIMIT);
        assert_eq!(run.history[0].floor, 25);
        assert_eq!(run.floor, 26);
    }

    #[test]
    fn test_restored_run_regains_choices() {
        let mut run: RunState =
            serde_json::from_str(r#"{"seed": 9, "floor": 4, "history": []}"#).unwrap();
        run.ensure_choices();
        assert_eq!(run.choices, make_choices(4, 9));
    }
}
