use crate::engine::RunRecord;
use crate::ui::state::AppState;

pub struct RightPanel;

impl RightPanel {
    pub fn new() -> Self {
        Self
    }

    pub fn show(&mut self, ui: &mut egui::Ui, state: &mut AppState) {
        ui.heading("Hall of Fame");

        ui.separator();

        if state.hall_of_fame.is_empty() {
            ui.label("No archived individuals yet.");
        } else {
            egui::Grid::new("hall_table").striped(true).show(ui, |ui| {
                ui.label("Rank");
                ui.label("Fitness");
                ui.label("Gen");
                ui.end_row();

                for (idx, entry) in state.hall_of_fame.iter().enumerate() {
                    if ui
                        .selectable_label(
                            state.selected_entry_idx == Some(idx),
                            format!("{}", entry.rank),
                        )
                        .clicked()
                    {
                        state.selected_entry_idx = Some(idx);
                    }
                    ui.label(format!("{:.4}", entry.fitness));
                    ui.label(format!("{}", entry.generation));
                    ui.end_row();
                }
            });

            if let Some(entry) = state
                .selected_entry_idx
                .and_then(|idx| state.hall_of_fame.get(idx))
            {
                ui.separator();
                ui.group(|ui| {
                    ui.heading("Details");
                    ui.label(format!("Fitness: {:.6}", entry.fitness));
                    ui.label(format!("Found in generation {}", entry.generation));
                    ui.collapsing("Genome", |ui| {
                        ui.label(&entry.description);
                    });
                });
            }
        }

        ui.separator();

        Self::show_tuning_trace(ui, state);

        ui.separator();

        Self::show_record_controls(ui, state);
    }

    fn show_tuning_trace(ui: &mut egui::Ui, state: &AppState) {
        ui.heading("Tuning Trace");
        let trace = state
            .last_summary
            .as_ref()
            .map(|summary| summary.trace.updates.as_slice())
            .unwrap_or_default();

        if trace.is_empty() && state.sent_updates.is_empty() {
            ui.label("No live parameter changes.");
            return;
        }

        if !trace.is_empty() {
            egui::Grid::new("trace_table").striped(true).show(ui, |ui| {
                ui.label("Gen");
                ui.label("Parameter");
                ui.label("Value");
                ui.end_row();
                for entry in trace {
                    ui.label(format!("{}", entry.generation));
                    ui.label(entry.param.label());
                    ui.label(format!("{:.3}", entry.value));
                    ui.end_row();
                }
            });
        } else {
            // Run still in flight: show what has been sent so far.
            for (param, value) in &state.sent_updates {
                ui.label(format!("{} -> {:.3}", param.label(), value));
            }
        }
    }

    fn show_record_controls(ui: &mut egui::Ui, state: &mut AppState) {
        let Some(summary) = state.last_summary.clone() else {
            return;
        };
        if ui.button("💾 Save Run Record").clicked() {
            if let Some(path) = rfd::FileDialog::new()
                .set_file_name("mendel-run.json")
                .save_file()
            {
                let record = RunRecord::from_summary(&summary, &state.to_config());
                match record.save(&path) {
                    Ok(()) => {
                        state.status_message = format!("Record saved to {}", path.display());
                    }
                    Err(e) => {
                        state.status_message = format!("Failed to save record: {e}");
                    }
                }
            }
        }
        ui.label(format!(
            "Seed {} - replaying this record reproduces the run.",
            summary.seed
        ));
    }
}
