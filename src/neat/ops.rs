use super::genes::{ConnectionGene, NodeGene, NodeKind};
use super::genome::NeatGenome;
use super::innovation::InnovationTracker;
use crate::config::{NeatConfig, OptimizationDirection};
use crate::genome::Sampler;
use crate::ops::{Crossover, Mutation};
use crate::population::Individual;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use rand_distr::{Distribution, Normal};
use std::sync::{Arc, Mutex};

/// Seeds fully connected input/output genomes and owns the run's shared
/// innovation tracker.
pub struct NeatSampler {
    input_count: usize,
    output_count: usize,
    config: NeatConfig,
    weight_dist: Normal<f64>,
    tracker: Arc<Mutex<InnovationTracker>>,
}

impl NeatSampler {
    pub fn new(input_count: usize, output_count: usize, config: NeatConfig) -> Self {
        let weight_dist =
            Normal::new(0.0, config.weight_init_std).expect("weight_init_std is validated finite");
        let tracker = InnovationTracker::new((input_count + output_count) as u32);
        Self {
            input_count,
            output_count,
            config,
            weight_dist,
            tracker: Arc::new(Mutex::new(tracker)),
        }
    }

    /// The tracker shared with the mutation operator of the same run.
    pub fn tracker(&self) -> Arc<Mutex<InnovationTracker>> {
        Arc::clone(&self.tracker)
    }
}

impl Sampler<NeatGenome> for NeatSampler {
    fn sample(&self, rng: &mut StdRng) -> NeatGenome {
        let inputs: Vec<NodeGene> = (0..self.input_count)
            .map(|id| NodeGene::new(id as u32, NodeKind::Input, 0.0))
            .collect();
        let outputs: Vec<NodeGene> = (0..self.output_count)
            .map(|idx| {
                let id = (self.input_count + idx) as u32;
                let bias = self.weight_dist.sample(rng);
                NodeGene::new(id, NodeKind::Output, bias)
            })
            .collect();

        let mut genome = NeatGenome::new(inputs, outputs);
        let mut tracker = self.tracker.lock().expect("innovation tracker poisoned");
        for in_id in 0..self.input_count as u32 {
            for out_idx in 0..self.output_count {
                let out_id = (self.input_count + out_idx) as u32;
                let innovation = tracker.connection_id(in_id, out_id);
                let weight = self
                    .weight_dist
                    .sample(rng)
                    .clamp(self.config.weight_min, self.config.weight_max);
                genome.insert_connection(ConnectionGene::new(innovation, in_id, out_id, weight));
            }
        }
        genome
    }
}

/// Successive structural and weight mutations, each tried with its own
/// probability on every pass.
pub struct NeatMutation {
    config: NeatConfig,
    perturb_dist: Normal<f64>,
    weight_dist: Normal<f64>,
    tracker: Arc<Mutex<InnovationTracker>>,
}

impl NeatMutation {
    pub fn new(config: NeatConfig, tracker: Arc<Mutex<InnovationTracker>>) -> Self {
        let perturb_dist = Normal::new(0.0, config.weight_mutation_power)
            .expect("weight_mutation_power is validated finite");
        let weight_dist =
            Normal::new(0.0, config.weight_init_std).expect("weight_init_std is validated finite");
        Self {
            config,
            perturb_dist,
            weight_dist,
            tracker,
        }
    }

    fn mutate_weights(&self, genome: &mut NeatGenome, rng: &mut StdRng) -> bool {
        let innovations: Vec<u64> = genome.connections().keys().copied().collect();
        if innovations.is_empty() {
            return false;
        }
        for innovation in innovations {
            let perturb = self.perturb_dist.sample(rng);
            let reset = rng.gen::<f64>() < self.config.reset_weight_prob;
            if let Some(conn) = genome.connection_mut(innovation) {
                if reset {
                    conn.weight = 0.0;
                } else {
                    conn.weight = (conn.weight + perturb)
                        .clamp(self.config.weight_min, self.config.weight_max);
                }
            }
        }
        true
    }

    fn add_connection(&self, genome: &mut NeatGenome, rng: &mut StdRng) -> bool {
        let node_ids: Vec<u32> = genome.nodes().keys().copied().collect();
        let Some(&in_node) = node_ids.choose(rng) else {
            return false;
        };
        let Some(&out_node) = node_ids.choose(rng) else {
            return false;
        };
        let in_kind = genome.node(in_node).map(|n| n.kind);
        let out_kind = genome.node(out_node).map(|n| n.kind);
        if in_kind == Some(NodeKind::Output) || out_kind == Some(NodeKind::Input) {
            return false;
        }
        if genome.has_connection_between(in_node, out_node)
            || genome.would_create_cycle(in_node, out_node)
        {
            return false;
        }
        let innovation = self
            .tracker
            .lock()
            .expect("innovation tracker poisoned")
            .connection_id(in_node, out_node);
        let weight = self
            .weight_dist
            .sample(rng)
            .clamp(self.config.weight_min, self.config.weight_max);
        genome.insert_connection(ConnectionGene::new(innovation, in_node, out_node, weight));
        true
    }

    fn del_connection(&self, genome: &mut NeatGenome, rng: &mut StdRng) -> bool {
        let innovations: Vec<u64> = genome.connections().keys().copied().collect();
        let Some(&innovation) = innovations.choose(rng) else {
            return false;
        };
        genome.remove_connection(innovation)
    }

    /// Split a random enabled connection: the original is disabled, the new
    /// node keeps the signal shape by feeding in with weight 1 and out with
    /// the original weight.
    fn add_node(&self, genome: &mut NeatGenome, rng: &mut StdRng) -> bool {
        let enabled: Vec<ConnectionGene> = genome.enabled_connections().copied().collect();
        let Some(conn) = enabled.choose(rng).copied() else {
            return false;
        };
        let node_id = {
            let mut tracker = self.tracker.lock().expect("innovation tracker poisoned");
            tracker.split_node_id(conn.in_node, conn.out_node)
        };
        if genome.has_node(node_id) {
            // This exact split already happened somewhere in this lineage.
            return false;
        }
        if let Some(existing) = genome.connection_mut(conn.innovation) {
            existing.enabled = false;
        }
        genome.add_node(NodeGene::new(node_id, NodeKind::Hidden, 0.0));
        let (first, second) = {
            let mut tracker = self.tracker.lock().expect("innovation tracker poisoned");
            (
                tracker.connection_id(conn.in_node, node_id),
                tracker.connection_id(node_id, conn.out_node),
            )
        };
        genome.insert_connection(ConnectionGene::new(first, conn.in_node, node_id, 1.0));
        genome.insert_connection(ConnectionGene::new(second, node_id, conn.out_node, conn.weight));
        true
    }

    fn del_node(&self, genome: &mut NeatGenome, rng: &mut StdRng) -> bool {
        let hidden = genome.hidden_ids();
        let Some(&node) = hidden.choose(rng) else {
            return false;
        };
        genome.remove_hidden_node(node)
    }

    fn toggle_connection(&self, genome: &mut NeatGenome, rng: &mut StdRng) -> bool {
        let innovations: Vec<u64> = genome.connections().keys().copied().collect();
        let Some(&innovation) = innovations.choose(rng) else {
            return false;
        };
        if let Some(conn) = genome.connection_mut(innovation) {
            conn.enabled = !conn.enabled;
            true
        } else {
            false
        }
    }
}

impl Mutation<NeatGenome> for NeatMutation {
    fn apply(&mut self, genome: &mut NeatGenome, rng: &mut StdRng) -> bool {
        let mut changed = false;
        if rng.gen::<f64>() < self.config.weight_mutation_prob {
            changed |= self.mutate_weights(genome, rng);
        }
        if rng.gen::<f64>() < self.config.add_connection_prob {
            changed |= self.add_connection(genome, rng);
        }
        if rng.gen::<f64>() < self.config.del_connection_prob {
            changed |= self.del_connection(genome, rng);
        }
        if rng.gen::<f64>() < self.config.add_node_prob {
            changed |= self.add_node(genome, rng);
        }
        if rng.gen::<f64>() < self.config.del_node_prob {
            changed |= self.del_node(genome, rng);
        }
        if rng.gen::<f64>() < self.config.toggle_connection_prob {
            changed |= self.toggle_connection(genome, rng);
        }
        changed
    }

    fn name(&self) -> &'static str {
        "neat"
    }
}

/// Innovation-aligned crossover. Matching genes pick a random parent,
/// disjoint and excess genes come from the fitter parent, and a gene
/// disabled in either parent is inherited disabled with a configured
/// probability.
pub struct NeatCrossover {
    config: NeatConfig,
    direction: OptimizationDirection,
}

impl NeatCrossover {
    pub fn new(config: NeatConfig, direction: OptimizationDirection) -> Self {
        Self { config, direction }
    }

    fn fitter_first<'a>(
        &self,
        a: &'a Individual<NeatGenome>,
        b: &'a Individual<NeatGenome>,
        rng: &mut StdRng,
    ) -> (&'a Individual<NeatGenome>, &'a Individual<NeatGenome>, bool) {
        let fa = a.fitness_or_worst(self.direction);
        let fb = b.fitness_or_worst(self.direction);
        if fa == fb {
            if rng.gen::<bool>() {
                (a, b, true)
            } else {
                (b, a, true)
            }
        } else if self.direction.is_better(fa, fb) {
            (a, b, false)
        } else {
            (b, a, false)
        }
    }
}

impl Crossover<NeatGenome> for NeatCrossover {
    fn offspring(
        &self,
        a: &Individual<NeatGenome>,
        b: &Individual<NeatGenome>,
        rng: &mut StdRng,
    ) -> NeatGenome {
        let (fitter, weaker, tie) = self.fitter_first(a, b, rng);
        let mut child = fitter.genome().clone();

        for (innovation, weaker_conn) in weaker.genome().connections() {
            match child.connection(*innovation).copied() {
                Some(fitter_conn) => {
                    // Matching gene: random parent's version wins.
                    let mut merged = if rng.gen::<bool>() {
                        *weaker_conn
                    } else {
                        fitter_conn
                    };
                    if (!fitter_conn.enabled || !weaker_conn.enabled)
                        && rng.gen::<f64>() < self.config.disable_inheritance_prob
                    {
                        merged.enabled = false;
                    }
                    child.insert_connection(merged);
                }
                None if tie => {
                    // On a fitness tie the weaker parent's disjoint and
                    // excess genes join too, cycle permitting.
                    for endpoint in [weaker_conn.in_node, weaker_conn.out_node] {
                        if !child.has_node(endpoint) {
                            if let Some(node) = weaker.genome().node(endpoint) {
                                child.add_node(*node);
                            }
                        }
                    }
                    if !child.has_connection_between(weaker_conn.in_node, weaker_conn.out_node)
                        && !child.would_create_cycle(weaker_conn.in_node, weaker_conn.out_node)
                    {
                        child.insert_connection(*weaker_conn);
                    }
                }
                None => {}
            }
        }
        child
    }

    fn name(&self) -> &'static str {
        "neat"
    }
}
