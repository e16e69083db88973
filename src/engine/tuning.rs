use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

/// Engine parameters that can change while a run is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TunableParam {
    MutationRate,
    CrossoverRate,
    ImmigrationRate,
    SelectionRatio,
}

impl TunableParam {
    pub fn label(&self) -> &'static str {
        match self {
            TunableParam::MutationRate => "mutation_rate",
            TunableParam::CrossoverRate => "crossover_rate",
            TunableParam::ImmigrationRate => "immigration_rate",
            TunableParam::SelectionRatio => "selection_ratio",
        }
    }
}

/// One applied parameter update, stamped with the generation it took
/// effect in. A trace replayed against the same seed reproduces the run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TraceEntry {
    pub generation: u32,
    pub param: TunableParam,
    pub value: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TuningTrace {
    pub updates: Vec<TraceEntry>,
}

impl TuningTrace {
    pub fn push(&mut self, generation: u32, param: TunableParam, value: f64) {
        self.updates.push(TraceEntry {
            generation,
            param,
            value,
        });
    }

    pub fn len(&self) -> usize {
        self.updates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.updates.is_empty()
    }
}

/// Shared handle for steering a running environment from another thread:
/// cancellation and queued parameter updates. Updates apply at the start of
/// the next generation.
#[derive(Clone, Default)]
pub struct EngineControl {
    cancel_flag: Arc<Mutex<bool>>,
    pending: Arc<Mutex<Vec<(TunableParam, f64)>>>,
}

impl EngineControl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        if let Ok(mut flag) = self.cancel_flag.lock() {
            *flag = true;
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel_flag.lock().map(|f| *f).unwrap_or(false)
    }

    pub fn queue_update(&self, param: TunableParam, value: f64) {
        if let Ok(mut pending) = self.pending.lock() {
            pending.push((param, value));
        }
    }

    pub fn drain(&self) -> Vec<(TunableParam, f64)> {
        self.pending
            .lock()
            .map(|mut pending| pending.drain(..).collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queued_updates_drain_in_order() {
        let control = EngineControl::new();
        control.queue_update(TunableParam::MutationRate, 0.5);
        control.queue_update(TunableParam::CrossoverRate, 0.1);
        let drained = control.drain();
        assert_eq!(
            drained,
            vec![
                (TunableParam::MutationRate, 0.5),
                (TunableParam::CrossoverRate, 0.1)
            ]
        );
        assert!(control.drain().is_empty());
    }

    #[test]
    fn cancellation_is_visible_through_clones() {
        let control = EngineControl::new();
        let other = control.clone();
        assert!(!other.is_cancelled());
        control.cancel();
        assert!(other.is_cancelled());
    }
}
