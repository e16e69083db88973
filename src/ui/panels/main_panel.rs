use crate::ui::state::AppState;

pub struct MainPanel;

impl MainPanel {
    pub fn new() -> Self {
        Self
    }

    pub fn show(&mut self, ui: &mut egui::Ui, state: &mut AppState) {
        ui.heading("Evolution Progress");

        ui.separator();

        if state.is_running {
            ui.label(format!(
                "Generation {}/{}",
                state.current_generation, state.num_generations
            ));
            let fraction = state.current_generation as f32 / state.num_generations.max(1) as f32;
            ui.add(egui::ProgressBar::new(fraction).show_percentage());
        }

        ui.label(&state.status_message);

        ui.separator();

        if state.history.is_empty() {
            ui.centered_and_justified(|ui| {
                ui.label("No run yet. Click 'Run Evolution' to start.");
            });
        } else {
            Self::show_fitness_chart(ui, state);
            ui.separator();
            Self::show_latest_report(ui, state);
        }
    }

    /// Best and mean fitness per generation as painted polylines.
    fn show_fitness_chart(ui: &mut egui::Ui, state: &AppState) {
        let desired = egui::vec2(ui.available_width(), 240.0);
        let (response, painter) = ui.allocate_painter(desired, egui::Sense::hover());
        let rect = response.rect;
        painter.rect_filled(rect, egui::CornerRadius::same(4), ui.visuals().extreme_bg_color);

        let best: Vec<f64> = state
            .history
            .iter()
            .filter_map(|report| report.population_best)
            .collect();
        let mean: Vec<f64> = state
            .history
            .iter()
            .filter_map(|report| report.population_mean)
            .collect();
        if best.len() < 2 {
            return;
        }

        let mut low = f64::INFINITY;
        let mut high = f64::NEG_INFINITY;
        for value in best.iter().chain(&mean) {
            low = low.min(*value);
            high = high.max(*value);
        }
        if !low.is_finite() || !high.is_finite() {
            return;
        }
        if high - low < 1e-12 {
            high = low + 1.0;
        }

        let margin = 8.0;
        let to_screen = |idx: usize, value: f64, count: usize| {
            let t = idx as f32 / (count - 1).max(1) as f32;
            let x = rect.left() + margin + t * (rect.width() - 2.0 * margin);
            let norm = ((value - low) / (high - low)) as f32;
            let y = rect.bottom() - margin - norm * (rect.height() - 2.0 * margin);
            egui::pos2(x, y)
        };

        let mean_points: Vec<egui::Pos2> = mean
            .iter()
            .enumerate()
            .map(|(idx, value)| to_screen(idx, *value, mean.len()))
            .collect();
        painter.add(egui::Shape::line(
            mean_points,
            egui::Stroke::new(1.5, egui::Color32::GRAY),
        ));

        let best_points: Vec<egui::Pos2> = best
            .iter()
            .enumerate()
            .map(|(idx, value)| to_screen(idx, *value, best.len()))
            .collect();
        painter.add(egui::Shape::line(
            best_points,
            egui::Stroke::new(2.0, egui::Color32::LIGHT_BLUE),
        ));

        ui.horizontal(|ui| {
            ui.colored_label(egui::Color32::LIGHT_BLUE, "— best");
            ui.colored_label(egui::Color32::GRAY, "— mean");
            ui.label(format!("range [{low:.4}, {high:.4}]"));
        });
    }

    fn show_latest_report(ui: &mut egui::Ui, state: &AppState) {
        let Some(report) = state.history.last() else {
            return;
        };
        egui::Grid::new("latest_report").striped(true).show(ui, |ui| {
            ui.label("Generation");
            ui.label(format!("{}", report.generation));
            ui.end_row();

            ui.label("Best ever");
            ui.label(
                report
                    .best_ever
                    .map(|f| format!("{f:.4}"))
                    .unwrap_or_else(|| "-".into()),
            );
            ui.end_row();

            ui.label("Population best / mean");
            ui.label(format!(
                "{} / {}",
                report
                    .population_best
                    .map(|f| format!("{f:.4}"))
                    .unwrap_or_else(|| "-".into()),
                report
                    .population_mean
                    .map(|f| format!("{f:.4}"))
                    .unwrap_or_else(|| "-".into()),
            ));
            ui.end_row();

            ui.label("Valid / size");
            ui.label(format!("{} / {}", report.valid, report.population_size));
            ui.end_row();

            ui.label("Immigrated / crossed / mutated");
            ui.label(format!(
                "{} / {} / {}",
                report.immigrated, report.crossed, report.mutated
            ));
            ui.end_row();

            ui.label("Evaluated");
            ui.label(format!("{}", report.evaluated));
            ui.end_row();
        });
    }
}
