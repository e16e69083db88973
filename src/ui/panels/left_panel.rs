use crate::config::SelectionMethod;
use crate::ui::state::{AppState, DemoProblem};

pub struct LeftPanel;

impl LeftPanel {
    pub fn new() -> Self {
        Self
    }

    pub fn show(&mut self, ui: &mut egui::Ui, state: &mut AppState) {
        ui.heading("Configuration");
        ui.separator();

        ui.collapsing("Problem", |ui| {
            Self::show_problem_config(ui, state);
        });

        ui.separator();

        ui.collapsing("Evolution", |ui| {
            Self::show_evolution_config(ui, state);
        });

        ui.separator();

        ui.collapsing("Selection", |ui| {
            Self::show_selection_config(ui, state);
        });

        ui.separator();

        Self::show_control_buttons(ui, state);
    }

    fn show_problem_config(ui: &mut egui::Ui, state: &mut AppState) {
        let locked = state.is_running;

        ui.add_enabled_ui(!locked, |ui| {
            ui.horizontal(|ui| {
                ui.label("Problem:");
                egui::ComboBox::from_id_salt("demo_problem")
                    .selected_text(state.problem.label())
                    .show_ui(ui, |ui| {
                        ui.selectable_value(&mut state.problem, DemoProblem::Salesman, "Traveling Salesman");
                        ui.selectable_value(&mut state.problem, DemoProblem::Rastrigin, "Rastrigin Function");
                        ui.selectable_value(&mut state.problem, DemoProblem::SubsetSplit, "Subset Split");
                    });
            });

            ui.horizontal(|ui| {
                let label = match state.problem {
                    DemoProblem::Salesman => "Cities:",
                    DemoProblem::Rastrigin => "Dimensions:",
                    DemoProblem::SubsetSplit => "Bits:",
                };
                ui.label(label);
                ui.add(egui::DragValue::new(&mut state.problem_size).range(4..=500));
            });

            ui.horizontal(|ui| {
                ui.checkbox(&mut state.use_fixed_seed, "Fixed Seed");
                if state.use_fixed_seed {
                    ui.add(egui::DragValue::new(&mut state.seed));
                }
            });
        });
    }

    fn show_evolution_config(ui: &mut egui::Ui, state: &mut AppState) {
        ui.add_enabled_ui(!state.is_running, |ui| {
            ui.horizontal(|ui| {
                ui.label("Population:");
                ui.add(egui::DragValue::new(&mut state.population_size).range(10..=5000));
            });

            ui.horizontal(|ui| {
                ui.label("Generations:");
                ui.add(egui::DragValue::new(&mut state.num_generations).range(10..=5000));
            });
        });

        // These three stay live while a run is in flight: changes are sent
        // to the engine and land in the tuning trace.
        ui.horizontal(|ui| {
            ui.label("Mutation Rate:");
            ui.add(egui::Slider::new(&mut state.mutation_rate, 0.0..=1.0).step_by(0.01));
        });

        ui.horizontal(|ui| {
            ui.label("Crossover Rate:");
            ui.add(egui::Slider::new(&mut state.crossover_rate, 0.0..=1.0).step_by(0.01));
        });

        ui.horizontal(|ui| {
            ui.label("Immigration Rate:");
            ui.add(egui::Slider::new(&mut state.immigration_rate, 0.0..=1.0).step_by(0.01));
        });

        if state.is_running {
            ui.label("Rate changes apply from the next generation.");
        }
    }

    fn show_selection_config(ui: &mut egui::Ui, state: &mut AppState) {
        ui.add_enabled_ui(!state.is_running, |ui| {
            ui.horizontal(|ui| {
                ui.label("Method:");
                egui::ComboBox::from_id_salt("selection_method")
                    .selected_text(format!("{:?}", state.selection_method))
                    .show_ui(ui, |ui| {
                        ui.selectable_value(&mut state.selection_method, SelectionMethod::Tournament, "Tournament");
                        ui.selectable_value(&mut state.selection_method, SelectionMethod::Roulette, "Roulette");
                        ui.selectable_value(&mut state.selection_method, SelectionMethod::Elite, "Elite");
                    });
            });

            ui.horizontal(|ui| {
                ui.label("Selection Ratio:");
                ui.add(egui::Slider::new(&mut state.selection_ratio, 0.05..=1.0).step_by(0.05));
            });

            if state.selection_method == SelectionMethod::Tournament {
                ui.horizontal(|ui| {
                    ui.label("Tournament Size:");
                    ui.add(egui::DragValue::new(&mut state.tournament_size).range(2..=20));
                });
            }
        });
    }

    fn show_control_buttons(ui: &mut egui::Ui, state: &mut AppState) {
        ui.vertical_centered(|ui| {
            let can_run = Self::validate_config(state).is_ok() && !state.is_running;
            let validation_error = Self::validate_config(state).err();

            let run_button = ui.add_enabled(can_run, egui::Button::new("▶ Run Evolution"));
            if run_button.clicked() {
                state.start_requested = true;
            }

            if let Some(error) = validation_error {
                ui.colored_label(egui::Color32::RED, error);
            }

            let stop_button = ui.add_enabled(state.is_running, egui::Button::new("⏹ Stop"));
            if stop_button.clicked() {
                state.stop_requested = true;
            }
        });
    }

    fn validate_config(state: &AppState) -> Result<(), String> {
        if state.population_size < 10 {
            return Err("Population too small".to_string());
        }
        if state.selection_ratio <= 0.0 {
            return Err("Selection ratio must be positive".to_string());
        }
        state
            .to_config()
            .validate()
            .map_err(|e| e.to_string())
    }
}
