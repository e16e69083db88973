use super::report::{GenerationReport, RunSummary};

/// Observer of a running environment.
pub trait ProgressCallback: Send {
    fn on_generation_start(&mut self, _generation: u32) {}
    fn on_generation_complete(&mut self, _report: &GenerationReport) {}
    fn on_run_complete(&mut self, _summary: &RunSummary) {}
}

/// Callback that ignores everything; useful for tests and islands.
pub struct SilentProgress;

impl ProgressCallback for SilentProgress {}

pub struct ConsoleProgress;

impl ProgressCallback for ConsoleProgress {
    fn on_generation_complete(&mut self, report: &GenerationReport) {
        println!("{}", report.one_line());
    }

    fn on_run_complete(&mut self, summary: &RunSummary) {
        println!(
            "Run complete after {} generations in {:.2}s. Best fitness: {}",
            summary.generations_run,
            summary.elapsed_secs,
            summary
                .best_fitness
                .map(|f| format!("{f:.4}"))
                .unwrap_or_else(|| "none".into()),
        );
    }
}

/// Progress update sent to another thread, typically the UI.
#[derive(Clone, Debug)]
pub enum ProgressUpdate {
    GenerationComplete(GenerationReport),
    RunComplete(RunSummary),
}

/// Forwards progress through an mpsc channel; send failures are ignored
/// because a vanished receiver just means nobody is watching anymore.
pub struct ChannelProgress {
    sender: std::sync::mpsc::Sender<ProgressUpdate>,
}

impl ChannelProgress {
    pub fn new(sender: std::sync::mpsc::Sender<ProgressUpdate>) -> Self {
        Self { sender }
    }
}

impl ProgressCallback for ChannelProgress {
    fn on_generation_complete(&mut self, report: &GenerationReport) {
        let _ = self
            .sender
            .send(ProgressUpdate::GenerationComplete(report.clone()));
    }

    fn on_run_complete(&mut self, summary: &RunSummary) {
        let _ = self.sender.send(ProgressUpdate::RunComplete(summary.clone()));
    }
}
