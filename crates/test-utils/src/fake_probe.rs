use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use filetrigger::probe::HandleProbe;

/// A probe with scripted answers per file name.
///
/// - `busy_for(name, n)` makes the first `n` probes of that file report
///   "held open", then "closed".
/// - `busy_forever(name)` never lets the file go.
/// - Unknown files are closed.
///
/// Files are keyed by file name so tests don't depend on how the watch root
/// was canonicalized.
#[derive(Debug, Clone, Default)]
pub struct ScriptedProbe {
    inner: Arc<Mutex<ProbeState>>,
}

#[derive(Debug, Default)]
struct ProbeState {
    scripts: HashMap<String, Script>,
    calls: HashMap<String, usize>,
    probed: Vec<PathBuf>,
}

#[derive(Debug)]
enum Script {
    Busy(VecDeque<bool>),
    Forever,
}

impl ScriptedProbe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn busy_for(self, name: &str, probes: usize) -> Self {
        self.inner.lock().unwrap().scripts.insert(
            name.to_string(),
            Script::Busy(std::iter::repeat_n(true, probes).collect()),
        );
        self
    }

    pub fn busy_forever(self, name: &str) -> Self {
        self.inner
            .lock()
            .unwrap()
            .scripts
            .insert(name.to_string(), Script::Forever);
        self
    }

    /// Number of probes issued for `name` so far.
    pub fn calls(&self, name: &str) -> usize {
        self.inner
            .lock()
            .unwrap()
            .calls
            .get(name)
            .copied()
            .unwrap_or(0)
    }

    /// Every path probed, in order.
    pub fn probed(&self) -> Vec<PathBuf> {
        self.inner.lock().unwrap().probed.clone()
    }
}

impl HandleProbe for ScriptedProbe {
    fn is_open_for_write(&self, path: &Path) -> bool {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let mut state = self.inner.lock().unwrap();
        *state.calls.entry(name.clone()).or_insert(0) += 1;
        state.probed.push(path.to_path_buf());

        match state.scripts.get_mut(&name) {
            Some(Script::Busy(answers)) => answers.pop_front().unwrap_or(false),
            Some(Script::Forever) => true,
            None => false,
        }
    }
}
