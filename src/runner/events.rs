use super::state::{SuiteReport, TestResult};
use tokio::sync::broadcast;

/// Suite execution events for real-time updates
#[derive(Debug, Clone)]
pub enum TestEvent {
    SuiteStarted {
        session_id: String,
        base_url: String,
        case_count: usize,
    },
    SuiteFinished {
        report: SuiteReport,
    },

    CaseStarted {
        index: usize,
        name: String,
    },
    CaseFinished {
        index: usize,
        result: TestResult,
    },
}

/// Event emitter for broadcasting suite events
pub struct EventEmitter {
    sender: broadcast::Sender<TestEvent>,
}

impl EventEmitter {
    pub fn new() -> (Self, broadcast::Receiver<TestEvent>) {
        let (sender, receiver) = broadcast::channel(100);
        (Self { sender }, receiver)
    }

    pub fn emit(&self, event: TestEvent) {
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TestEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventEmitter {
    fn default() -> Self {
        let (sender, _) = broadcast::channel(100);
        Self { sender }
    }
}

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::Duration;

/// Console event listener for printing real-time updates
pub struct ConsoleEventListener;

impl ConsoleEventListener {
    /// Print events until every emitter is dropped
    pub async fn listen(mut receiver: broadcast::Receiver<TestEvent>) {
        use crate::report::console;
        use std::io::IsTerminal;

        let interactive = std::io::stdout().is_terminal();
        let mut spinner: Option<ProgressBar> = None;

        while let Ok(event) = receiver.recv().await {
            match event {
                TestEvent::SuiteStarted {
                    session_id,
                    base_url,
                    case_count,
                } => {
                    println!("{}", console::banner(&base_url, &session_id, case_count));
                }

                TestEvent::CaseStarted { index, name } => {
                    let pb = if interactive {
                        ProgressBar::new_spinner()
                    } else {
                        // Piped output: no escape codes
                        ProgressBar::with_draw_target(None, ProgressDrawTarget::hidden())
                    };
                    pb.set_style(
                        ProgressStyle::with_template("{spinner:.cyan} {msg}")
                            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
                    );
                    pb.set_message(format!("[{}] {}", index + 1, name));
                    pb.enable_steady_tick(Duration::from_millis(100));
                    spinner = Some(pb);
                }

                TestEvent::CaseFinished { result, .. } => {
                    if let Some(pb) = spinner.take() {
                        pb.finish_and_clear();
                    }
                    println!("{}", console::result_line(&result));
                }

                TestEvent::SuiteFinished { report } => {
                    if let Some(pb) = spinner.take() {
                        pb.finish_and_clear();
                    }
                    println!("{}", console::summary(&report));
                }
            }
        }
    }
}
