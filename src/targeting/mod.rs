//! Targeting strategies.
//!
//! Each strategy picks the next node to remove from the live network. The
//! fourteen strategies are identified by the numeric tags used in the
//! experiment configuration. Tags 6 and 9 to 13 repeat the selection rule of
//! another strategy but run without adaptation.

pub mod cutset;
pub mod flow;

use std::fmt;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::analysis::centralization::betweenness_centrality;
use crate::network::{AttributeTable, Network, NodeId, Resource};
use crate::simulation::SimulationError;

pub use cutset::{cutset_target, Cutset};

/// Fraction of the original network that must still be alive for the hybrid
/// strategies to keep using cutset targeting.
pub const DEFAULT_SWITCH_FRACTION: f64 = 0.5;

/// Relative tolerance under which two betweenness scores count as tied.
const BETWEENNESS_TIE_TOLERANCE: f64 = 1e-9;

/// Node removal strategy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Strategy {
    CutSet,
    MaxDegree,
    MaxBetweenness,
    Money,
    Random,
    Precursors,
    MaxDegreeNoAdapt,
    /// Cutset targeting while more than `switch_fraction` of the original
    /// nodes survive, max-degree targeting afterwards.
    CutSetThenMaxDegree { switch_fraction: f64 },
    /// Cutset targeting, then max-betweenness targeting.
    CutSetThenBetweenness { switch_fraction: f64 },
    MaxBetweennessNoAdapt,
    CutSetNoAdapt,
    MoneyNoAdapt,
    PrecursorsNoAdapt,
    RandomNoAdapt,
}

impl Strategy {
    pub const COUNT: u8 = 14;

    /// All strategies in tag order
    pub fn all() -> Vec<Strategy> {
        (0..Self::COUNT).filter_map(|tag| Strategy::try_from(tag).ok()).collect()
    }

    pub fn tag(&self) -> u8 {
        match self {
            Strategy::CutSet => 0,
            Strategy::MaxDegree => 1,
            Strategy::MaxBetweenness => 2,
            Strategy::Money => 3,
            Strategy::Random => 4,
            Strategy::Precursors => 5,
            Strategy::MaxDegreeNoAdapt => 6,
            Strategy::CutSetThenMaxDegree { .. } => 7,
            Strategy::CutSetThenBetweenness { .. } => 8,
            Strategy::MaxBetweennessNoAdapt => 9,
            Strategy::CutSetNoAdapt => 10,
            Strategy::MoneyNoAdapt => 11,
            Strategy::PrecursorsNoAdapt => 12,
            Strategy::RandomNoAdapt => 13,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Strategy::CutSet => "CutSet",
            Strategy::MaxDegree => "MaxDegree",
            Strategy::MaxBetweenness => "MaxBetweenness",
            Strategy::Money => "Money",
            Strategy::Random => "Random",
            Strategy::Precursors => "Precursors",
            Strategy::MaxDegreeNoAdapt => "MaxDegree_No_Adapt",
            Strategy::CutSetThenMaxDegree { .. } => "CutSetThenMaxDegree",
            Strategy::CutSetThenBetweenness { .. } => "CutSetThenBetweenness",
            Strategy::MaxBetweennessNoAdapt => "MaxBetweenness_No_Adapt",
            Strategy::CutSetNoAdapt => "CutSet_No_Adapt",
            Strategy::MoneyNoAdapt => "Money_No_Adapt",
            Strategy::PrecursorsNoAdapt => "Precursors_No_Adapt",
            Strategy::RandomNoAdapt => "Random_No_Adapt",
        }
    }

    /// Whether the network is allowed to repair itself under this strategy
    pub fn allows_adaptation(&self) -> bool {
        !matches!(
            self,
            Strategy::MaxDegreeNoAdapt
                | Strategy::MaxBetweennessNoAdapt
                | Strategy::CutSetNoAdapt
                | Strategy::MoneyNoAdapt
                | Strategy::PrecursorsNoAdapt
                | Strategy::RandomNoAdapt
        )
    }

    /// Whether this strategy may carry a cutset between steps
    pub fn uses_cutset(&self) -> bool {
        matches!(
            self,
            Strategy::CutSet
                | Strategy::CutSetNoAdapt
                | Strategy::CutSetThenMaxDegree { .. }
                | Strategy::CutSetThenBetweenness { .. }
        )
    }

    /// Override the phase switch point of the hybrid strategies.
    pub fn with_switch_fraction(self, fraction: f64) -> Strategy {
        match self {
            Strategy::CutSetThenMaxDegree { .. } => {
                Strategy::CutSetThenMaxDegree { switch_fraction: fraction }
            }
            Strategy::CutSetThenBetweenness { .. } => {
                Strategy::CutSetThenBetweenness { switch_fraction: fraction }
            }
            other => other,
        }
    }
}

impl TryFrom<u8> for Strategy {
    type Error = String;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        let strategy = match tag {
            0 => Strategy::CutSet,
            1 => Strategy::MaxDegree,
            2 => Strategy::MaxBetweenness,
            3 => Strategy::Money,
            4 => Strategy::Random,
            5 => Strategy::Precursors,
            6 => Strategy::MaxDegreeNoAdapt,
            7 => Strategy::CutSetThenMaxDegree { switch_fraction: DEFAULT_SWITCH_FRACTION },
            8 => Strategy::CutSetThenBetweenness { switch_fraction: DEFAULT_SWITCH_FRACTION },
            9 => Strategy::MaxBetweennessNoAdapt,
            10 => Strategy::CutSetNoAdapt,
            11 => Strategy::MoneyNoAdapt,
            12 => Strategy::PrecursorsNoAdapt,
            13 => Strategy::RandomNoAdapt,
            other => return Err(format!("unknown strategy tag {}", other)),
        };
        Ok(strategy)
    }
}

impl From<Strategy> for u8 {
    fn from(strategy: Strategy) -> u8 {
        strategy.tag()
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}) {}", self.tag(), self.name())
    }
}

/// Everything a strategy may consult besides the network itself
pub struct TargetingContext<'a> {
    pub attributes: &'a AttributeTable,
    pub ignore_equipment: bool,
    /// Node count of the intact network, for the hybrid phase switch
    pub original_size: usize,
}

/// Choose the next node to remove.
///
/// `cutset` carries the unconsumed part of the current cut between calls.
pub fn select_target<R: Rng + ?Sized>(
    strategy: &Strategy,
    network: &Network,
    context: &TargetingContext<'_>,
    cutset: &mut Cutset,
    rng: &mut R,
) -> Result<NodeId, SimulationError> {
    if network.is_empty() {
        return Err(SimulationError::EmptyGraph);
    }

    match *strategy {
        Strategy::CutSet | Strategy::CutSetNoAdapt => cutset_target(network, cutset, rng),
        Strategy::MaxDegree | Strategy::MaxDegreeNoAdapt => max_degree_target(network, rng),
        Strategy::MaxBetweenness | Strategy::MaxBetweennessNoAdapt => {
            max_betweenness_target(network, rng)
        }
        Strategy::Money | Strategy::MoneyNoAdapt => {
            resource_target(network, Resource::Money, context, rng)
        }
        Strategy::Precursors | Strategy::PrecursorsNoAdapt => {
            resource_target(network, Resource::Precursors, context, rng)
        }
        Strategy::Random | Strategy::RandomNoAdapt => random_target(network, rng),
        Strategy::CutSetThenMaxDegree { switch_fraction } => {
            if above_switch(network, context, switch_fraction) {
                cutset_target(network, cutset, rng)
            } else {
                max_degree_target(network, rng)
            }
        }
        Strategy::CutSetThenBetweenness { switch_fraction } => {
            if above_switch(network, context, switch_fraction) {
                cutset_target(network, cutset, rng)
            } else {
                max_betweenness_target(network, rng)
            }
        }
    }
}

fn above_switch(network: &Network, context: &TargetingContext<'_>, fraction: f64) -> bool {
    network.node_count() as f64 > context.original_size as f64 * fraction
}

/// Uniformly random node among those of maximum degree.
pub fn max_degree_target<R: Rng + ?Sized>(network: &Network, rng: &mut R) -> Result<NodeId, SimulationError> {
    let scored: Vec<(NodeId, usize)> = network.nodes().map(|id| (id, network.degree(id))).collect();
    choose_maximal(&scored, rng)
}

/// Uniformly random node among those of maximum betweenness.
pub fn max_betweenness_target<R: Rng + ?Sized>(
    network: &Network,
    rng: &mut R,
) -> Result<NodeId, SimulationError> {
    let scored = betweenness_centrality(network);
    let max = scored
        .iter()
        .map(|&(_, b)| b)
        .fold(f64::NEG_INFINITY, f64::max);
    // Brandes sums accumulate in node-specific order, so equal scores can
    // differ in the last bits.
    let tolerance = BETWEENNESS_TIE_TOLERANCE * max.abs().max(1.0);
    let top: Vec<NodeId> = scored
        .into_iter()
        .filter(|&(_, b)| (max - b).abs() <= tolerance)
        .map(|(id, _)| id)
        .collect();
    top.choose(rng).copied().ok_or(SimulationError::EmptyGraph)
}

/// Highest-degree holder of `resource`, or a random node once none is left.
pub fn resource_target<R: Rng + ?Sized>(
    network: &Network,
    resource: Resource,
    context: &TargetingContext<'_>,
    rng: &mut R,
) -> Result<NodeId, SimulationError> {
    let holders: Vec<(NodeId, usize)> = network
        .nodes()
        .filter(|&id| {
            context
                .attributes
                .node_resources(id, context.ignore_equipment)
                .contains(resource)
        })
        .map(|id| (id, network.degree(id)))
        .collect();

    if holders.is_empty() {
        random_target(network, rng)
    } else {
        choose_maximal(&holders, rng)
    }
}

/// Uniformly random live node.
pub fn random_target<R: Rng + ?Sized>(network: &Network, rng: &mut R) -> Result<NodeId, SimulationError> {
    let nodes: Vec<NodeId> = network.nodes().collect();
    nodes.choose(rng).copied().ok_or(SimulationError::EmptyGraph)
}

fn choose_maximal<R: Rng + ?Sized>(scored: &[(NodeId, usize)], rng: &mut R) -> Result<NodeId, SimulationError> {
    let max = scored.iter().map(|&(_, s)| s).max().ok_or(SimulationError::EmptyGraph)?;
    let top: Vec<NodeId> = scored
        .iter()
        .filter(|&&(_, s)| s == max)
        .map(|&(id, _)| id)
        .collect();
    top.choose(rng).copied().ok_or(SimulationError::EmptyGraph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::AttributeVector;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::BTreeSet;

    fn attributes(n: usize, holders: &[(NodeId, Resource)]) -> AttributeTable {
        let mut rows = vec![[false; 8]; n];
        for &(id, resource) in holders {
            rows[(id - 1) as usize][(resource.index() - 1) as usize] = true;
        }
        AttributeTable::new(rows.into_iter().map(AttributeVector::new).collect())
    }

    /// 1 - 2 - 3 - 4 - 5 - 6
    fn path6() -> Network {
        Network::from_edge_lists(6, &[1, 2, 3, 4, 5], &[2, 3, 4, 5, 6]).unwrap()
    }

    #[test]
    fn test_tag_round_trip() {
        for tag in 0..Strategy::COUNT {
            assert_eq!(Strategy::try_from(tag).unwrap().tag(), tag);
        }
        assert!(Strategy::try_from(14).is_err());
        assert_eq!(Strategy::all().len(), 14);
    }

    #[test]
    fn test_adaptation_flags() {
        let no_adapt: Vec<u8> = Strategy::all()
            .into_iter()
            .filter(|s| !s.allows_adaptation())
            .map(|s| s.tag())
            .collect();
        assert_eq!(no_adapt, vec![6, 9, 10, 11, 12, 13]);
    }

    #[test]
    fn test_strategy_serde_uses_tags() {
        let strategies: Vec<Strategy> = serde_yaml::from_str("[0, 7, 13]").unwrap();
        assert_eq!(strategies[1].tag(), 7);
        assert_eq!(serde_json::to_string(&strategies).unwrap(), "[0,7,13]");
        assert!(serde_yaml::from_str::<Vec<Strategy>>("[99]").is_err());
    }

    #[test]
    fn test_max_degree_breaks_ties_randomly() {
        let network = path6();
        let mut rng = StdRng::seed_from_u64(17);
        let mut seen = BTreeSet::new();
        for _ in 0..200 {
            seen.insert(max_degree_target(&network, &mut rng).unwrap());
        }
        assert_eq!(seen, BTreeSet::from([2, 3, 4, 5]));
    }

    #[test]
    fn test_max_betweenness_picks_center() {
        let network = path6();
        let mut rng = StdRng::seed_from_u64(3);
        let mut seen = BTreeSet::new();
        for _ in 0..100 {
            seen.insert(max_betweenness_target(&network, &mut rng).unwrap());
        }
        assert_eq!(seen, BTreeSet::from([3, 4]));
    }

    #[test]
    fn test_max_betweenness_ties_on_symmetric_graph() {
        // Circulant C(12; 1, 3): every node has the same betweenness
        let sources: Vec<NodeId> = (0..12).flat_map(|i| [i + 1, i + 1]).collect();
        let targets: Vec<NodeId> = (0..12).flat_map(|i| [(i + 1) % 12 + 1, (i + 3) % 12 + 1]).collect();
        let network = Network::from_edge_lists(12, &sources, &targets).unwrap();
        assert_eq!(network.edge_count(), 24);

        let mut rng = StdRng::seed_from_u64(12);
        let mut counts = [0usize; 12];
        for _ in 0..1200 {
            let target = max_betweenness_target(&network, &mut rng).unwrap();
            counts[(target - 1) as usize] += 1;
        }
        for (index, count) in counts.iter().enumerate() {
            assert!(*count > 50, "node {} picked {} times", index + 1, count);
        }
    }

    #[test]
    fn test_resource_targeting() {
        let network = path6();
        let table = attributes(6, &[(1, Resource::Money), (4, Resource::Money), (6, Resource::Precursors)]);
        let context = TargetingContext { attributes: &table, ignore_equipment: false, original_size: 6 };
        let mut rng = StdRng::seed_from_u64(8);

        assert_eq!(resource_target(&network, Resource::Money, &context, &mut rng).unwrap(), 4);
        assert_eq!(resource_target(&network, Resource::Precursors, &context, &mut rng).unwrap(), 6);

        // Nobody holds labour: any node may be chosen
        let chosen = resource_target(&network, Resource::Labour, &context, &mut rng).unwrap();
        assert!(network.contains_node(chosen));
    }

    #[test]
    fn test_hybrid_switches_below_half() {
        let table = attributes(6, &[]);
        let context = TargetingContext { attributes: &table, ignore_equipment: false, original_size: 12 };
        let strategy = Strategy::try_from(7).unwrap();
        let mut rng = StdRng::seed_from_u64(21);
        let mut cutset = Cutset::from([1]);

        // 6 of 12 alive is not above half: max-degree, carried cutset untouched
        let target = select_target(&strategy, &path6(), &context, &mut cutset, &mut rng).unwrap();
        assert!((2..=5).contains(&target));
        assert_eq!(cutset, Cutset::from([1]));

        let context = TargetingContext { original_size: 11, ..context };
        let target = select_target(&strategy, &path6(), &context, &mut cutset, &mut rng).unwrap();
        assert_eq!(target, 1);
        assert!(cutset.is_empty());
    }

    #[test]
    fn test_empty_graph_is_rejected_by_every_strategy() {
        let table = AttributeTable::default();
        let context = TargetingContext { attributes: &table, ignore_equipment: false, original_size: 0 };
        let mut rng = StdRng::seed_from_u64(0);
        for strategy in Strategy::all() {
            let mut cutset = Cutset::new();
            assert_eq!(
                select_target(&strategy, &Network::new(), &context, &mut cutset, &mut rng),
                Err(SimulationError::EmptyGraph)
            );
        }
    }
}
