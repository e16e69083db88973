use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    Input,
    Hidden,
    Output,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NodeGene {
    pub id: u32,
    pub kind: NodeKind,
    pub bias: f64,
}

impl NodeGene {
    pub fn new(id: u32, kind: NodeKind, bias: f64) -> Self {
        Self { id, kind, bias }
    }
}

/// A weighted directed link between two nodes. The innovation number is the
/// historical marker that lets crossover align genes across genomes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConnectionGene {
    pub innovation: u64,
    pub in_node: u32,
    pub out_node: u32,
    pub weight: f64,
    pub enabled: bool,
}

impl ConnectionGene {
    pub fn new(innovation: u64, in_node: u32, out_node: u32, weight: f64) -> Self {
        Self {
            innovation,
            in_node,
            out_node,
            weight,
            enabled: true,
        }
    }
}
