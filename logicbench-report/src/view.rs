//! Presentation State
//!
//! Holds what the presenter shows: the latest results, the name of the case
//! currently running, and which table rows have their detail panel open.
//! State only changes through [`ViewEvent`]s and [`ViewState::toggle`].

use crate::report::CaseReport;
use fxhash::FxHashSet;
use logicbench_core::{CaseResult, HarnessRun, RunObserver};

#[derive(Debug, Clone)]
pub enum ViewEvent {
    /// A run began; previous results are dropped
    RunStarted,
    /// A case is about to be timed
    CaseStarted(String),
    /// The run finished with these results
    RunCompleted(Vec<CaseReport>),
}

/// Rows whose detail panel is open
#[derive(Debug, Clone, Default)]
pub struct Expansion {
    open: FxHashSet<usize>,
    all: bool,
}

impl Expansion {
    pub fn is_expanded(&self, row: usize) -> bool {
        self.all != self.open.contains(&row)
    }

    fn toggle(&mut self, row: usize) {
        if !self.open.remove(&row) {
            self.open.insert(row);
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ViewState {
    results: Vec<CaseReport>,
    running: Option<String>,
    expansion: Expansion,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, event: ViewEvent) {
        match event {
            ViewEvent::RunStarted => {
                self.results.clear();
                self.running = None;
                self.expansion = Expansion::default();
            }
            ViewEvent::CaseStarted(name) => {
                self.running = Some(name);
            }
            ViewEvent::RunCompleted(results) => {
                self.results = results;
                self.running = None;
            }
        }
    }

    pub fn results(&self) -> &[CaseReport] {
        &self.results
    }

    /// Name of the case being timed, if a run is in progress
    pub fn running(&self) -> Option<&str> {
        self.running.as_deref()
    }

    pub fn expansion(&self) -> &Expansion {
        &self.expansion
    }

    pub fn is_expanded(&self, row: usize) -> bool {
        self.expansion.is_expanded(row)
    }

    /// Flip one row's detail panel. Out-of-range rows are ignored.
    pub fn toggle(&mut self, row: usize) {
        if row < self.results.len() {
            self.expansion.toggle(row);
        }
    }

    /// Flip the detail panel of the first row with this name
    pub fn toggle_named(&mut self, name: &str) -> bool {
        match self.results.iter().position(|r| r.name == name) {
            Some(row) => {
                self.toggle(row);
                true
            }
            None => false,
        }
    }

    /// Open every row's detail panel
    pub fn expand_all(&mut self) {
        self.expansion = Expansion {
            open: FxHashSet::default(),
            all: true,
        };
    }
}

impl RunObserver for ViewState {
    fn run_started(&mut self, _total: usize) {
        self.apply(ViewEvent::RunStarted);
    }

    fn case_started(&mut self, _index: usize, name: &str) {
        self.apply(ViewEvent::CaseStarted(name.to_string()));
    }

    fn case_finished(&mut self, _index: usize, _result: &CaseResult) {}

    fn run_finished(&mut self, run: &HarnessRun) {
        let results = run.results.iter().map(CaseReport::from_result).collect();
        self.apply(ViewEvent::RunCompleted(results));
    }
}
