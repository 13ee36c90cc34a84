//! Resource attributes carried by network actors.
//!
//! Every node owns a fixed vector of eight boolean resources. A group of
//! nodes can operate only while the union of its resources covers all eight
//! categories, optionally ignoring equipment.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::graph::{NetworkError, NodeId};

/// The eight resource categories, numbered 1..=8 in spreadsheet order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    Money = 1,
    Drugs = 2,
    Premises = 3,
    Equipment = 4,
    Precursors = 5,
    Information = 6,
    Skills = 7,
    Labour = 8,
}

impl Resource {
    pub const ALL: [Resource; 8] = [
        Resource::Money,
        Resource::Drugs,
        Resource::Premises,
        Resource::Equipment,
        Resource::Precursors,
        Resource::Information,
        Resource::Skills,
        Resource::Labour,
    ];

    /// Category index in 1..=8
    pub fn index(self) -> u8 {
        self as u8
    }

    fn bit(self) -> u8 {
        1 << (self.index() - 1)
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Resource::Money => "money",
            Resource::Drugs => "drugs",
            Resource::Premises => "premises",
            Resource::Equipment => "equipment",
            Resource::Precursors => "precursors",
            Resource::Information => "information",
            Resource::Skills => "skills",
            Resource::Labour => "labour",
        };
        f.write_str(name)
    }
}

/// Set of resource categories, stored as a bitmask.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ResourceSet(u8);

impl ResourceSet {
    pub const EMPTY: ResourceSet = ResourceSet(0);

    pub fn contains(self, resource: Resource) -> bool {
        self.0 & resource.bit() != 0
    }

    pub fn insert(&mut self, resource: Resource) {
        self.0 |= resource.bit();
    }

    pub fn remove(&mut self, resource: Resource) {
        self.0 &= !resource.bit();
    }

    pub fn union(self, other: ResourceSet) -> ResourceSet {
        ResourceSet(self.0 | other.0)
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = Resource> {
        Resource::ALL.into_iter().filter(move |r| self.contains(*r))
    }

    /// Category indices (1..=8) present in the set, ascending.
    pub fn indices(self) -> Vec<u8> {
        self.iter().map(Resource::index).collect()
    }

    /// Whether the set covers every category. When equipment is ignored it is
    /// never counted, and seven categories suffice.
    pub fn is_complete(self, ignore_equipment: bool) -> bool {
        self.len() + usize::from(ignore_equipment) == Resource::ALL.len()
    }

    /// Drop equipment when it is not being counted.
    pub fn counted(mut self, ignore_equipment: bool) -> ResourceSet {
        if ignore_equipment {
            self.remove(Resource::Equipment);
        }
        self
    }
}

impl FromIterator<Resource> for ResourceSet {
    fn from_iter<I: IntoIterator<Item = Resource>>(iter: I) -> Self {
        let mut set = ResourceSet::EMPTY;
        for resource in iter {
            set.insert(resource);
        }
        set
    }
}

/// Immutable per-node resource vector
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AttributeVector([bool; 8]);

impl AttributeVector {
    pub fn new(flags: [bool; 8]) -> Self {
        Self(flags)
    }

    pub fn has(&self, resource: Resource) -> bool {
        self.0[(resource.index() - 1) as usize]
    }

    pub fn resources(&self) -> ResourceSet {
        Resource::ALL.into_iter().filter(|r| self.has(*r)).collect()
    }
}

/// One attribute row as it appears in the input file: either `[id, b1..b8]`
/// or just `[b1..b8]`, with booleans written as `true/false` or `0/1`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(transparent)]
pub struct AttributeRow(pub Vec<AttributeCell>);

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(untagged)]
pub enum AttributeCell {
    Flag(bool),
    Number(i64),
}

impl AttributeCell {
    fn as_number(self) -> i64 {
        match self {
            AttributeCell::Flag(flag) => i64::from(flag),
            AttributeCell::Number(n) => n,
        }
    }
}

/// Attribute vectors for nodes `1..=N`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeTable {
    rows: Vec<AttributeVector>,
}

impl AttributeTable {
    pub fn new(rows: Vec<AttributeVector>) -> Self {
        Self { rows }
    }

    /// Parse input rows. A nine-cell row carries its node id first and must
    /// match its position; an eight-cell row takes its id from its position.
    pub fn from_rows(rows: &[AttributeRow]) -> Result<Self, NetworkError> {
        let mut vectors = Vec::with_capacity(rows.len());

        for (position, AttributeRow(cells)) in rows.iter().enumerate() {
            let row = position + 1;
            let flags = match cells.len() {
                9 => {
                    let id = cells[0].as_number();
                    if id != row as i64 {
                        return Err(NetworkError::MalformedAttributes {
                            row,
                            reason: format!("node id {} does not match row position", id),
                        });
                    }
                    &cells[1..]
                }
                8 => &cells[..],
                n => {
                    return Err(NetworkError::MalformedAttributes {
                        row,
                        reason: format!("expected 8 or 9 entries, found {}", n),
                    })
                }
            };

            let mut vector = [false; 8];
            for (index, (slot, cell)) in vector.iter_mut().zip(flags).enumerate() {
                *slot = match cell.as_number() {
                    0 => false,
                    1 => true,
                    other => {
                        return Err(NetworkError::MalformedAttributes {
                            row,
                            reason: format!(
                                "{} has value {}, expected 0 or 1",
                                Resource::ALL[index],
                                other
                            ),
                        })
                    }
                };
            }
            vectors.push(AttributeVector(vector));
        }

        Ok(Self::new(vectors))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Attribute vector of a node; nodes outside the table have none.
    pub fn get(&self, id: NodeId) -> AttributeVector {
        (id as usize)
            .checked_sub(1)
            .and_then(|i| self.rows.get(i))
            .copied()
            .unwrap_or_default()
    }

    /// Resources a single node contributes, with equipment dropped if ignored.
    pub fn node_resources(&self, id: NodeId, ignore_equipment: bool) -> ResourceSet {
        self.get(id).resources().counted(ignore_equipment)
    }

    /// Categories jointly present across `nodes`.
    pub fn attributes_present<I>(&self, nodes: I, ignore_equipment: bool) -> ResourceSet
    where
        I: IntoIterator<Item = NodeId>,
    {
        nodes
            .into_iter()
            .fold(ResourceSet::EMPTY, |acc, id| acc.union(self.get(id).resources()))
            .counted(ignore_equipment)
    }

    /// Whether `nodes` jointly hold every counted category.
    pub fn is_fully_resourced<I>(&self, nodes: I, ignore_equipment: bool) -> bool
    where
        I: IntoIterator<Item = NodeId>,
    {
        self.attributes_present(nodes, ignore_equipment)
            .is_complete(ignore_equipment)
    }
}
