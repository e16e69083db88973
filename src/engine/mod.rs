pub mod environment;
pub mod island;
pub mod progress;
pub mod record;
pub mod report;
pub mod tuning;

pub use environment::Environment;
pub use island::{IslandModel, IslandSummary};
pub use progress::{ChannelProgress, ConsoleProgress, ProgressCallback, ProgressUpdate, SilentProgress};
pub use record::RunRecord;
pub use report::{GenerationReport, RunSummary};
pub use tuning::{EngineControl, TraceEntry, TunableParam, TuningTrace};
