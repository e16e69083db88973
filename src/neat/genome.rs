use super::genes::{ConnectionGene, NodeGene, NodeKind};
use crate::genome::Genome;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Graph genome: node genes plus innovation-keyed connection genes.
///
/// The genome stays feed-forward by construction; every structural change
/// goes through a cycle check before a connection is admitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NeatGenome {
    nodes: BTreeMap<u32, NodeGene>,
    connections: BTreeMap<u64, ConnectionGene>,
    inputs: Vec<u32>,
    outputs: Vec<u32>,
}

impl NeatGenome {
    pub fn new(inputs: Vec<NodeGene>, outputs: Vec<NodeGene>) -> Self {
        let input_ids = inputs.iter().map(|n| n.id).collect();
        let output_ids = outputs.iter().map(|n| n.id).collect();
        let mut nodes = BTreeMap::new();
        for node in inputs.into_iter().chain(outputs) {
            nodes.insert(node.id, node);
        }
        Self {
            nodes,
            connections: BTreeMap::new(),
            inputs: input_ids,
            outputs: output_ids,
        }
    }

    pub fn inputs(&self) -> &[u32] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[u32] {
        &self.outputs
    }

    pub fn nodes(&self) -> &BTreeMap<u32, NodeGene> {
        &self.nodes
    }

    pub fn connections(&self) -> &BTreeMap<u64, ConnectionGene> {
        &self.connections
    }

    pub fn node(&self, id: u32) -> Option<&NodeGene> {
        self.nodes.get(&id)
    }

    pub fn connection(&self, innovation: u64) -> Option<&ConnectionGene> {
        self.connections.get(&innovation)
    }

    pub fn connection_mut(&mut self, innovation: u64) -> Option<&mut ConnectionGene> {
        self.connections.get_mut(&innovation)
    }

    pub fn hidden_ids(&self) -> Vec<u32> {
        self.nodes
            .values()
            .filter(|n| n.kind == NodeKind::Hidden)
            .map(|n| n.id)
            .collect()
    }

    pub fn has_node(&self, id: u32) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn add_node(&mut self, node: NodeGene) {
        self.nodes.insert(node.id, node);
    }

    /// Remove a hidden node together with its incident connections.
    /// Input and output nodes are part of the interface and stay.
    pub fn remove_hidden_node(&mut self, id: u32) -> bool {
        match self.nodes.get(&id) {
            Some(node) if node.kind == NodeKind::Hidden => {}
            _ => return false,
        }
        self.nodes.remove(&id);
        self.connections
            .retain(|_, conn| conn.in_node != id && conn.out_node != id);
        true
    }

    pub fn has_connection_between(&self, in_node: u32, out_node: u32) -> bool {
        self.connections
            .values()
            .any(|conn| conn.in_node == in_node && conn.out_node == out_node)
    }

    /// Insert or replace a connection gene keyed by its innovation number.
    pub fn insert_connection(&mut self, connection: ConnectionGene) {
        self.connections.insert(connection.innovation, connection);
    }

    pub fn remove_connection(&mut self, innovation: u64) -> bool {
        self.connections.remove(&innovation).is_some()
    }

    pub fn enabled_connections(&self) -> impl Iterator<Item = &ConnectionGene> {
        self.connections.values().filter(|conn| conn.enabled)
    }

    /// Would adding `in -> out` close a cycle? Assumes the present graph is
    /// acyclic; disabled connections count because they can be re-enabled.
    pub fn would_create_cycle(&self, in_node: u32, out_node: u32) -> bool {
        if in_node == out_node {
            return true;
        }
        let mut visited: HashSet<u32> = HashSet::new();
        visited.insert(out_node);
        loop {
            let mut added = 0;
            for conn in self.connections.values() {
                if visited.contains(&conn.in_node) && !visited.contains(&conn.out_node) {
                    if conn.out_node == in_node {
                        return true;
                    }
                    visited.insert(conn.out_node);
                    added += 1;
                }
            }
            if added == 0 {
                return false;
            }
        }
    }
}

impl Genome for NeatGenome {
    fn len(&self) -> usize {
        self.nodes.len() + self.connections.len()
    }

    fn signature(&self) -> String {
        let nodes: Vec<String> = self
            .nodes
            .values()
            .map(|n| format!("{}:{:.4}", n.id, n.bias))
            .collect();
        let connections: Vec<String> = self
            .connections
            .values()
            .map(|c| {
                format!(
                    "{}:{}>{}:{:.4}:{}",
                    c.innovation,
                    c.in_node,
                    c.out_node,
                    c.weight,
                    u8::from(c.enabled)
                )
            })
            .collect();
        format!("n[{}]c[{}]", nodes.join(","), connections.join(","))
    }

    fn describe(&self) -> String {
        let enabled = self.enabled_connections().count();
        format!(
            "{} nodes, {} connections ({} enabled)",
            self.nodes.len(),
            self.connections.len(),
            enabled
        )
    }
}
