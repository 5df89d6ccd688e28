use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use web_time::Instant;

use strata_core::{ActionDescriptor, ActionKind, Path, Store, SubId, View, ViewKind};

#[derive(Clone, Debug)]
pub struct ActionEntry {
    pub seq: u64,
    pub label: String,
    pub kind: ActionKind,
    pub path: Path,
    pub at: Instant,
}

impl From<&ActionDescriptor> for ActionEntry {
    fn from(a: &ActionDescriptor) -> Self {
        Self {
            seq: a.seq,
            label: a.label.clone(),
            kind: a.kind,
            path: a.path.clone(),
            at: a.at,
        }
    }
}

/// Bounded history of a store's actions, fed by its commit hook.
///
/// A relabel (same `seq` as the newest entry) replaces that entry, so a
/// binding-originated write shows up once, as `[binding]`.
#[derive(Clone)]
pub struct ActionLog {
    entries: Rc<RefCell<VecDeque<ActionEntry>>>,
    capacity: usize,
}

impl Default for ActionLog {
    fn default() -> Self {
        Self::new(256)
    }
}

impl ActionLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Rc::new(RefCell::new(VecDeque::with_capacity(capacity.min(1024)))),
            capacity: capacity.max(1),
        }
    }

    pub fn attach(&self, store: &Store) -> SubId {
        let log = self.clone();
        store.on_commit(move |a| log.record(a))
    }

    pub fn record(&self, action: &ActionDescriptor) {
        let mut entries = self.entries.borrow_mut();
        if let Some(last) = entries.back_mut()
            && last.seq == action.seq
        {
            *last = action.into();
            return;
        }
        if entries.len() == self.capacity {
            entries.pop_front();
        }
        entries.push_back(action.into());
    }

    pub fn entries(&self) -> Vec<ActionEntry> {
        self.entries.borrow().iter().cloned().collect()
    }

    /// Entries that wrote at `subtree` or anywhere below it.
    pub fn under(&self, subtree: &Path) -> Vec<ActionEntry> {
        self.entries
            .borrow()
            .iter()
            .filter(|e| subtree.is_prefix_of(&e.path))
            .cloned()
            .collect()
    }

    pub fn last(&self) -> Option<ActionEntry> {
        self.entries.borrow().back().cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }
}

pub struct Hud {
    pub inspector_enabled: bool,
    sync_count: u64,
    last_sync: Option<Instant>,
    rate_smooth: f32,
}

impl Default for Hud {
    fn default() -> Self {
        Self::new()
    }
}

impl Hud {
    pub fn new() -> Self {
        Self {
            inspector_enabled: false,
            sync_count: 0,
            last_sync: None,
            rate_smooth: 0.0,
        }
    }

    pub fn toggle_inspector(&mut self) {
        self.inspector_enabled = !self.inspector_enabled;
    }

    pub fn on_sync(&mut self) {
        self.sync_count += 1;
        let now = Instant::now();
        if let Some(prev) = self.last_sync.replace(now) {
            let dt = (now - prev).as_secs_f32();
            if dt > 0.0 {
                let rate = 1.0 / dt;
                // simple EMA
                let a = 0.2;
                self.rate_smooth = if self.rate_smooth == 0.0 {
                    rate
                } else {
                    (1.0 - a) * self.rate_smooth + a * rate
                };
            }
        }
    }

    pub fn sync_count(&self) -> u64 {
        self.sync_count
    }

    pub fn summary(&self, log: &ActionLog) -> String {
        let mut parts = vec![
            format!("syncs: {}", self.sync_count),
            format!("rate: {:.1}/s", self.rate_smooth),
            format!("actions: {}", log.len()),
        ];
        if let Some(last) = log.last() {
            parts.push(format!("last: {}", last.label));
        }
        parts.join("  |  ")
    }
}

pub struct Inspector {
    pub hud: Hud,
    pub log: ActionLog,
}

impl Default for Inspector {
    fn default() -> Self {
        Self::new()
    }
}

impl Inspector {
    pub fn new() -> Self {
        Self {
            hud: Hud::new(),
            log: ActionLog::default(),
        }
    }

    /// Wires an inspector to `store`: actions are logged on commit, the HUD
    /// counts syncs.
    pub fn attach(store: &Store) -> Rc<RefCell<Inspector>> {
        let inspector = Rc::new(RefCell::new(Inspector::new()));
        inspector.borrow().log.attach(store);
        let weak = Rc::downgrade(&inspector);
        store.subscribe(move |_, _| {
            if let Some(i) = weak.upgrade() {
                i.borrow_mut().hud.on_sync();
            }
        });
        log::debug!("inspector attached to store '{}'", store.name());
        inspector
    }

    /// Appends the HUD line under `root` when the inspector is enabled.
    pub fn frame(&self, root: View) -> View {
        if !self.hud.inspector_enabled {
            return root;
        }
        let hud = View::new(
            0,
            ViewKind::Text {
                text: self.hud.summary(&self.log),
            },
        );
        View::new(0, ViewKind::Column).with_children(vec![root, hud])
    }
}
