//! In-process stores for pipeline and session tests.

use anyhow::{Result, anyhow};
use crossbeam_channel::{Receiver, Sender, unbounded};
use parking_lot::Mutex;
use sqish_store::HistoryStore;
use sqish_types::{Query, Record, Settings};
use std::collections::HashMap;
use std::sync::Arc;

pub fn init() {
    let _ = tracing_subscriber::fmt::try_init();
}

/// Vec-backed store with the same matching rules as the SQLite store.
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<Vec<Record>>,
    settings: Mutex<Settings>,
}

impl MemoryStore {
    /// Store holding `commands`, oldest first.
    pub fn with_commands(commands: &[&str]) -> Self {
        let store = MemoryStore::default();
        for command in commands {
            store.records.lock().push(Record::new(*command, "/", "host", "s1"));
        }
        store
    }

    pub fn with_records(records: Vec<Record>) -> Self {
        MemoryStore {
            records: Mutex::new(records),
            settings: Mutex::new(Settings::default()),
        }
    }
}

impl HistoryStore for MemoryStore {
    fn query(&self, query: &Query) -> Result<Vec<Record>> {
        let records = self.records.lock();
        let matching = records.iter().rev().filter(|r| {
            r.command.contains(&query.text)
                && query.directory.as_ref().is_none_or(|d| &r.directory == d)
                && query.hostname.as_ref().is_none_or(|h| &r.hostname == h)
                && query.session_id.as_ref().is_none_or(|s| &r.session_id == s)
        });

        let mut out: Vec<Record> = if query.sort_by_frequency {
            let mut groups: Vec<(Record, usize)> = Vec::new();
            let mut index: HashMap<(String, String), usize> = HashMap::new();
            for r in matching {
                let key = (r.command.clone(), r.directory.clone());
                match index.get(&key) {
                    Some(&i) => groups[i].1 += 1,
                    None => {
                        index.insert(key, groups.len());
                        let blank = Record {
                            hostname: String::new(),
                            session_id: String::new(),
                            ..r.clone()
                        };
                        groups.push((blank, 1));
                    }
                }
            }
            // Stable sort keeps the most recent group first among equals.
            groups.sort_by(|a, b| b.1.cmp(&a.1));
            groups.into_iter().map(|(r, _)| r).collect()
        } else {
            matching.cloned().collect()
        };

        if let Some(limit) = query.limit {
            out.truncate(limit);
        }
        Ok(out)
    }

    fn add(&self, record: &Record) -> Result<()> {
        self.records.lock().push(record.clone());
        Ok(())
    }

    fn load_settings(&self) -> Result<Settings> {
        Ok(*self.settings.lock())
    }

    fn save_settings(&self, settings: &Settings) -> Result<()> {
        *self.settings.lock() = *settings;
        Ok(())
    }
}

/// Test-side handles of a [`GatedStore`].
pub struct GateControl {
    /// Receives one message each time a store call begins.
    pub started: Receiver<()>,
    /// Each message lets one blocked store call return.
    pub release: Sender<()>,
    /// Every query the store executed, in order.
    pub executed: Arc<Mutex<Vec<Query>>>,
}

/// Store whose queries block until the test releases them.
pub struct GatedStore {
    started: Sender<()>,
    release: Receiver<()>,
    executed: Arc<Mutex<Vec<Query>>>,
}

impl GatedStore {
    pub fn new() -> (Self, GateControl) {
        let (started_tx, started_rx) = unbounded();
        let (release_tx, release_rx) = unbounded();
        let executed = Arc::new(Mutex::new(Vec::new()));
        (
            GatedStore {
                started: started_tx,
                release: release_rx,
                executed: executed.clone(),
            },
            GateControl {
                started: started_rx,
                release: release_tx,
                executed,
            },
        )
    }
}

impl HistoryStore for GatedStore {
    fn query(&self, query: &Query) -> Result<Vec<Record>> {
        self.executed.lock().push(query.clone());
        let _ = self.started.send(());
        self.release
            .recv()
            .map_err(|_| anyhow!("gate closed"))?;
        Ok(vec![Record::new(query.text.clone(), "/", "host", "s1")])
    }

    fn add(&self, _record: &Record) -> Result<()> {
        Ok(())
    }

    fn load_settings(&self) -> Result<Settings> {
        Ok(Settings::default())
    }

    fn save_settings(&self, _settings: &Settings) -> Result<()> {
        Ok(())
    }
}

/// Store whose every query fails.
pub struct FailingStore;

impl HistoryStore for FailingStore {
    fn query(&self, _query: &Query) -> Result<Vec<Record>> {
        Err(anyhow!("database disk image is malformed"))
    }

    fn add(&self, _record: &Record) -> Result<()> {
        Err(anyhow!("read-only database"))
    }

    fn load_settings(&self) -> Result<Settings> {
        Ok(Settings::default())
    }

    fn save_settings(&self, _settings: &Settings) -> Result<()> {
        Err(anyhow!("read-only database"))
    }
}
