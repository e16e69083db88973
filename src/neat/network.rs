use super::genome::NeatGenome;
use std::collections::{HashMap, HashSet};

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-4.9 * x).exp())
}

struct NodeEval {
    node: u32,
    bias: f64,
    incoming: Vec<(u32, f64)>,
}

/// Feed-forward phenotype built from a genome's enabled connections.
/// Nodes are evaluated in topological layers.
pub struct Network {
    inputs: Vec<u32>,
    outputs: Vec<u32>,
    evals: Vec<NodeEval>,
}

/// Nodes whose state is needed to compute the outputs.
fn required_for_output(
    inputs: &[u32],
    outputs: &[u32],
    connections: &[(u32, u32)],
) -> HashSet<u32> {
    let input_set: HashSet<u32> = inputs.iter().copied().collect();
    let mut required: HashSet<u32> = outputs.iter().copied().collect();
    let mut frontier: HashSet<u32> = required.clone();
    loop {
        let feeders: HashSet<u32> = connections
            .iter()
            .filter(|(_, out)| frontier.contains(out))
            .map(|(input, _)| *input)
            .filter(|node| !frontier.contains(node))
            .collect();
        if feeders.is_empty() {
            break;
        }
        for node in &feeders {
            if !input_set.contains(node) {
                required.insert(*node);
            }
        }
        frontier.extend(feeders);
    }
    required
}

/// Group the required nodes into layers where each layer only depends on
/// earlier layers and the inputs.
fn feed_forward_layers(
    inputs: &[u32],
    outputs: &[u32],
    connections: &[(u32, u32)],
) -> Vec<Vec<u32>> {
    let required = required_for_output(inputs, outputs, connections);
    let mut layers: Vec<Vec<u32>> = Vec::new();
    let mut known: HashSet<u32> = inputs.iter().copied().collect();
    loop {
        let candidates: HashSet<u32> = connections
            .iter()
            .filter(|(input, output)| known.contains(input) && !known.contains(output))
            .map(|(_, output)| *output)
            .collect();

        let mut layer: Vec<u32> = candidates
            .into_iter()
            .filter(|node| {
                required.contains(node)
                    && connections
                        .iter()
                        .filter(|(_, output)| output == node)
                        .all(|(input, _)| known.contains(input))
            })
            .collect();
        if layer.is_empty() {
            break;
        }
        layer.sort_unstable();
        known.extend(layer.iter().copied());
        layers.push(layer);
    }
    layers
}

impl Network {
    pub fn from_genome(genome: &NeatGenome) -> Self {
        let connections: Vec<(u32, u32)> = genome
            .enabled_connections()
            .map(|conn| (conn.in_node, conn.out_node))
            .collect();
        let layers = feed_forward_layers(genome.inputs(), genome.outputs(), &connections);

        let mut evals = Vec::new();
        for layer in layers {
            for node in layer {
                let incoming: Vec<(u32, f64)> = genome
                    .enabled_connections()
                    .filter(|conn| conn.out_node == node)
                    .map(|conn| (conn.in_node, conn.weight))
                    .collect();
                let bias = genome.node(node).map(|n| n.bias).unwrap_or(0.0);
                evals.push(NodeEval {
                    node,
                    bias,
                    incoming,
                });
            }
        }

        Self {
            inputs: genome.inputs().to_vec(),
            outputs: genome.outputs().to_vec(),
            evals,
        }
    }

    /// Push inputs through the network. Outputs that no enabled connection
    /// reaches read as 0.
    pub fn activate(&self, inputs: &[f64]) -> anyhow::Result<Vec<f64>> {
        if inputs.len() != self.inputs.len() {
            anyhow::bail!(
                "expected {} inputs, got {}",
                self.inputs.len(),
                inputs.len()
            );
        }
        let mut values: HashMap<u32, f64> = HashMap::new();
        for (node, value) in self.inputs.iter().zip(inputs) {
            values.insert(*node, *value);
        }
        for eval in &self.evals {
            let sum: f64 = eval
                .incoming
                .iter()
                .map(|(node, weight)| values.get(node).copied().unwrap_or(0.0) * weight)
                .sum();
            values.insert(eval.node, sigmoid(eval.bias + sum));
        }
        Ok(self
            .outputs
            .iter()
            .map(|node| values.get(node).copied().unwrap_or(0.0))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::neat::genes::{ConnectionGene, NodeGene, NodeKind};

    fn two_input_network(w0: f64, w1: f64, bias: f64) -> Network {
        let inputs = vec![
            NodeGene::new(0, NodeKind::Input, 0.0),
            NodeGene::new(1, NodeKind::Input, 0.0),
        ];
        let outputs = vec![NodeGene::new(2, NodeKind::Output, bias)];
        let mut genome = NeatGenome::new(inputs, outputs);
        genome.insert_connection(ConnectionGene::new(0, 0, 2, w0));
        genome.insert_connection(ConnectionGene::new(1, 1, 2, w1));
        Network::from_genome(&genome)
    }

    #[test]
    fn wrong_input_arity_is_rejected() {
        let network = two_input_network(1.0, 1.0, 0.0);
        assert!(network.activate(&[1.0]).is_err());
    }

    #[test]
    fn strongly_positive_sum_saturates_high() {
        let network = two_input_network(5.0, 5.0, 0.0);
        let out = network.activate(&[1.0, 1.0]).unwrap();
        assert!(out[0] > 0.99);
    }

    #[test]
    fn disabled_connections_do_not_contribute() {
        let inputs = vec![NodeGene::new(0, NodeKind::Input, 0.0)];
        let outputs = vec![NodeGene::new(1, NodeKind::Output, 0.0)];
        let mut genome = NeatGenome::new(inputs, outputs);
        let mut conn = ConnectionGene::new(0, 0, 1, 10.0);
        conn.enabled = false;
        genome.insert_connection(conn);
        let network = Network::from_genome(&genome);
        let out = network.activate(&[1.0]).unwrap();
        // No enabled path to the output, so it reads 0.
        assert_eq!(out[0], 0.0);
    }

    #[test]
    fn hidden_layer_is_evaluated_before_output() {
        let inputs = vec![NodeGene::new(0, NodeKind::Input, 0.0)];
        let outputs = vec![NodeGene::new(1, NodeKind::Output, 0.0)];
        let mut genome = NeatGenome::new(inputs, outputs);
        genome.add_node(NodeGene::new(2, NodeKind::Hidden, 0.0));
        genome.insert_connection(ConnectionGene::new(0, 0, 2, 3.0));
        genome.insert_connection(ConnectionGene::new(1, 2, 1, 3.0));
        let network = Network::from_genome(&genome);
        let high = network.activate(&[1.0]).unwrap()[0];
        let low = network.activate(&[-1.0]).unwrap()[0];
        assert!(high > low);
    }
}
