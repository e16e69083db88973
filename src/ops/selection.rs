use crate::config::{SelectionConfig, SelectionMethod, WheelWeighting};
use crate::error::{MendelError, Result};
use crate::genome::Genome;
use crate::population::{Individual, Population};
use log::warn;
use rand::rngs::StdRng;
use rand::Rng;
use std::collections::HashSet;

/// Picks the survivors of a generation. The engine replaces the population
/// with the returned list.
pub trait Selector<G: Genome>: Send {
    fn select(&mut self, population: &Population<G>, rng: &mut StdRng)
        -> Result<Vec<Individual<G>>>;

    /// Live-tunable survivor fraction.
    fn set_selection_ratio(&mut self, ratio: f64);

    fn name(&self) -> &'static str;
}

pub fn selector_from_config<G: Genome>(config: &SelectionConfig) -> Box<dyn Selector<G>> {
    match config.method {
        SelectionMethod::Elite => Box::new(EliteSelector::new(config)),
        SelectionMethod::Tournament => Box::new(TournamentSelector::new(config)),
        SelectionMethod::Roulette => Box::new(RouletteSelector::new(config)),
    }
}

/// Settings and draw plumbing shared by every selector.
#[derive(Clone)]
struct SelectionCore {
    ratio: f64,
    keep_best: bool,
    allow_invalid: bool,
    allow_duplicates: bool,
    max_retries: usize,
}

impl SelectionCore {
    fn new(config: &SelectionConfig) -> Self {
        Self {
            ratio: config.selection_ratio,
            keep_best: config.keep_best,
            allow_invalid: config.allow_invalid,
            allow_duplicates: config.allow_duplicates,
            max_retries: config.max_retries,
        }
    }

    fn target_count(&self, population: &Population<impl Genome>) -> usize {
        ((self.ratio * population.target_size() as f64).ceil() as usize).max(1)
    }

    /// Fill `count` slots from repeated single draws, enforcing validity
    /// and duplicate rules with a capped retry loop per slot.
    fn draw_many<G: Genome>(
        &self,
        population: &Population<G>,
        count: usize,
        rng: &mut StdRng,
        draw: &mut dyn FnMut(&mut StdRng) -> Option<usize>,
    ) -> Vec<Individual<G>> {
        let mut selected = Vec::with_capacity(count);
        let mut taken: HashSet<u64> = HashSet::new();
        for _ in 0..count {
            let mut accepted = false;
            for _ in 0..self.max_retries {
                let Some(idx) = draw(rng) else { continue };
                let candidate = population.get(idx);
                if !self.allow_invalid && !candidate.is_valid() {
                    continue;
                }
                if !self.allow_duplicates && !taken.insert(candidate.id()) {
                    continue;
                }
                selected.push(candidate.clone());
                accepted = true;
                break;
            }
            if !accepted {
                warn!(
                    "selection slot abandoned after {} failed draws",
                    self.max_retries
                );
            }
        }
        selected
    }

    /// Re-insert the incumbent best when selection dropped it.
    fn preserve_best<G: Genome>(
        &self,
        selected: &mut Vec<Individual<G>>,
        population: &Population<G>,
        target: usize,
    ) {
        if !self.keep_best {
            return;
        }
        let Some(best) = population.best() else { return };
        if selected.iter().any(|ind| ind.id() == best.id()) {
            return;
        }
        if selected.len() >= target {
            selected.pop();
        }
        selected.push(best.clone());
    }
}

/// Keeps the best slice of the population.
pub struct EliteSelector {
    core: SelectionCore,
}

impl EliteSelector {
    pub fn new(config: &SelectionConfig) -> Self {
        Self {
            core: SelectionCore::new(config),
        }
    }
}

impl<G: Genome> Selector<G> for EliteSelector {
    fn select(
        &mut self,
        population: &Population<G>,
        _rng: &mut StdRng,
    ) -> Result<Vec<Individual<G>>> {
        let target = self.core.target_count(population);
        let selected: Vec<Individual<G>> = population
            .top_indices(population.len())
            .into_iter()
            .map(|idx| population.get(idx))
            .filter(|ind| self.core.allow_invalid || ind.is_valid())
            .take(target)
            .cloned()
            .collect();
        if selected.is_empty() {
            return Err(MendelError::Selection(
                "elite selection found no eligible individual".to_string(),
            ));
        }
        Ok(selected)
    }

    fn set_selection_ratio(&mut self, ratio: f64) {
        self.core.ratio = ratio.clamp(0.0, 1.0);
    }

    fn name(&self) -> &'static str {
        "elite"
    }
}

/// Best-of-k tournaments with distinct competitors.
///
/// Competitors are drawn without replacement and a tournament with no valid
/// competitor counts as a failed draw instead of producing an unusable
/// winner.
pub struct TournamentSelector {
    core: SelectionCore,
    tournament_size: usize,
}

impl TournamentSelector {
    pub fn new(config: &SelectionConfig) -> Self {
        Self {
            core: SelectionCore::new(config),
            tournament_size: config.tournament_size,
        }
    }

    fn run_tournament<G: Genome>(
        &self,
        population: &Population<G>,
        rng: &mut StdRng,
    ) -> Option<usize> {
        let size = self.tournament_size.min(population.len());
        if size == 0 {
            return None;
        }
        let direction = population.direction();
        let competitors = rand::seq::index::sample(rng, population.len(), size);
        let mut winner: Option<usize> = None;
        for idx in competitors {
            let candidate = population.get(idx);
            if !candidate.is_valid() && !self.core.allow_invalid {
                continue;
            }
            match winner {
                None => winner = Some(idx),
                Some(current) => {
                    let current_fitness = population.get(current).fitness_or_worst(direction);
                    if direction.is_better(candidate.fitness_or_worst(direction), current_fitness)
                    {
                        winner = Some(idx);
                    }
                }
            }
        }
        winner
    }
}

impl<G: Genome> Selector<G> for TournamentSelector {
    fn select(
        &mut self,
        population: &Population<G>,
        rng: &mut StdRng,
    ) -> Result<Vec<Individual<G>>> {
        let target = self.core.target_count(population);
        let core = self.core.clone();
        let mut selected = core.draw_many(population, target, rng, &mut |rng| {
            self.run_tournament(population, rng)
        });
        core.preserve_best(&mut selected, population, target);
        if selected.is_empty() {
            return Err(MendelError::Selection(
                "tournament selection produced an empty survivor set".to_string(),
            ));
        }
        Ok(selected)
    }

    fn set_selection_ratio(&mut self, ratio: f64) {
        self.core.ratio = ratio.clamp(0.0, 1.0);
    }

    fn name(&self) -> &'static str {
        "tournament"
    }
}

/// Fitness-proportionate selection over a cumulative wheel.
pub struct RouletteSelector {
    core: SelectionCore,
    weighting: WheelWeighting,
    power: u32,
}

impl RouletteSelector {
    pub fn new(config: &SelectionConfig) -> Self {
        Self {
            core: SelectionCore::new(config),
            weighting: config.wheel_weighting,
            power: config.wheel_power,
        }
    }

    /// Cumulative wheel over the population; invalid individuals get zero
    /// weight. Returns `None` when the wheel is degenerate.
    fn build_wheel<G: Genome>(&self, population: &Population<G>) -> Option<Vec<f64>> {
        let direction = population.direction();
        let raw: Vec<Option<f64>> = population
            .iter()
            .map(|ind| {
                ind.fitness().map(|f| match direction {
                    crate::config::OptimizationDirection::Maximize => f,
                    crate::config::OptimizationDirection::Minimize => -f,
                })
            })
            .collect();

        let finite: Vec<f64> = raw.iter().filter_map(|v| *v).collect();
        if finite.is_empty() {
            return None;
        }
        let min = finite.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = finite.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

        let weights: Vec<f64> = raw
            .iter()
            .map(|value| match value {
                None => 0.0,
                Some(v) => match self.weighting {
                    // Shift by the maximum so the exponent stays tame.
                    WheelWeighting::Softmax => (v - max).exp(),
                    WheelWeighting::Linear => {
                        if max > min {
                            (v - min) / (max - min)
                        } else {
                            1.0
                        }
                    }
                    WheelWeighting::Power => {
                        let linear = if max > min { (v - min) / (max - min) } else { 1.0 };
                        linear.powi(self.power as i32)
                    }
                },
            })
            .collect();

        let mut wheel = Vec::with_capacity(weights.len());
        let mut total = 0.0;
        for w in weights {
            total += w;
            wheel.push(total);
        }
        if total <= 0.0 || !total.is_finite() {
            return None;
        }
        Some(wheel)
    }
}

impl<G: Genome> Selector<G> for RouletteSelector {
    fn select(
        &mut self,
        population: &Population<G>,
        rng: &mut StdRng,
    ) -> Result<Vec<Individual<G>>> {
        let target = self.core.target_count(population);
        let core = self.core.clone();

        let mut selected = match self.build_wheel(population) {
            Some(wheel) => {
                let total = *wheel.last().expect("wheel is non-empty");
                core.draw_many(population, target, rng, &mut |rng| {
                    let spin = rng.gen::<f64>() * total;
                    Some(wheel.partition_point(|cum| *cum <= spin).min(wheel.len() - 1))
                })
            }
            None => {
                warn!("degenerate roulette wheel, falling back to uniform draws");
                core.draw_many(population, target, rng, &mut |rng| {
                    Some(population.sample_index(rng))
                })
            }
        };
        core.preserve_best(&mut selected, population, target);
        if selected.is_empty() {
            return Err(MendelError::Selection(
                "roulette selection produced an empty survivor set".to_string(),
            ));
        }
        Ok(selected)
    }

    fn set_selection_ratio(&mut self, ratio: f64) {
        self.core.ratio = ratio.clamp(0.0, 1.0);
    }

    fn name(&self) -> &'static str {
        "roulette"
    }
}
