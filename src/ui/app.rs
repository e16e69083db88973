use super::panels::{LeftPanel, MainPanel, RightPanel};
use super::services::{EvolutionRunner, RunParams};
use super::state::AppState;
use crate::engine::{ProgressUpdate, TunableParam};

pub struct MendelApp {
    state: AppState,
    runner: Option<EvolutionRunner>,
    left_panel: LeftPanel,
    main_panel: MainPanel,
    right_panel: RightPanel,
}

impl Default for MendelApp {
    fn default() -> Self {
        Self {
            state: AppState::new(),
            runner: None,
            left_panel: LeftPanel::new(),
            main_panel: MainPanel::new(),
            right_panel: RightPanel::new(),
        }
    }
}

impl MendelApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        Self::default()
    }

    fn handle_run_control(&mut self) {
        if self.state.start_requested {
            self.state.start_requested = false;
            self.state.reset_run_views();
            self.state.is_running = true;
            self.state.status_message = "Starting evolution...".to_string();
            self.runner = Some(EvolutionRunner::start(RunParams {
                problem: self.state.problem,
                problem_size: self.state.problem_size,
                config: self.state.to_config(),
            }));
        }

        if self.state.stop_requested {
            self.state.stop_requested = false;
            if let Some(runner) = &mut self.runner {
                runner.cancel();
                self.state.status_message = "Stopping...".to_string();
            }
        }
    }

    /// Forward slider changes to the running engine as live updates.
    fn push_live_updates(&mut self) {
        let Some(runner) = &self.runner else { return };
        if !self.state.is_running {
            return;
        }
        let changes = [
            (
                TunableParam::MutationRate,
                self.state.mutation_rate,
                &mut self.state.live_mutation_rate,
            ),
            (
                TunableParam::CrossoverRate,
                self.state.crossover_rate,
                &mut self.state.live_crossover_rate,
            ),
            (
                TunableParam::ImmigrationRate,
                self.state.immigration_rate,
                &mut self.state.live_immigration_rate,
            ),
        ];
        for (param, current, live) in changes {
            if (current - *live).abs() > f64::EPSILON {
                runner.queue_update(param, current);
                *live = current;
                self.state.sent_updates.push((param, current));
            }
        }
    }

    fn drain_progress(&mut self) {
        let Some(runner) = &mut self.runner else { return };
        while let Some(update) = runner.poll_progress() {
            match update {
                ProgressUpdate::GenerationComplete(report) => {
                    self.state.current_generation = report.generation;
                    self.state.status_message = report.one_line();
                    self.state.history.push(report);
                }
                ProgressUpdate::RunComplete(summary) => {
                    self.state.status_message = format!(
                        "Run complete: {} generations, best {}",
                        summary.generations_run,
                        summary
                            .best_fitness
                            .map(|f| format!("{f:.4}"))
                            .unwrap_or_else(|| "none".into()),
                    );
                }
            }
        }

        if let Some(outcome) = runner.try_get_results() {
            self.state.is_running = false;
            self.runner = None;
            match outcome {
                Ok(output) => {
                    self.state.hall_of_fame = output.hall;
                    self.state.last_summary = Some(output.summary);
                }
                Err(message) => {
                    self.state.status_message = message;
                }
            }
        }
    }
}

impl eframe::App for MendelApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_run_control();
        self.push_live_updates();
        self.drain_progress();

        if self.state.is_running {
            // Keep polling the worker even when the mouse is idle.
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Mendel - Evolution Dashboard");
            });
        });

        egui::SidePanel::left("left_panel")
            .default_width(280.0)
            .resizable(true)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    self.left_panel.show(ui, &mut self.state);
                });
            });

        egui::SidePanel::right("right_panel")
            .default_width(320.0)
            .resizable(true)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    self.right_panel.show(ui, &mut self.state);
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.main_panel.show(ui, &mut self.state);
        });
    }
}
