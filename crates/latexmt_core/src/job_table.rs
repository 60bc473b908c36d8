use std::collections::{BTreeMap, BTreeSet};

pub type JobId = u64;

/// One job as reported by the server. The client never edits these, it only
/// replaces them with newer snapshots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRecord {
    pub id: JobId,
    pub status: String,
    pub download_url: Option<String>,
    pub src_lang: Option<String>,
    pub tgt_lang: Option<String>,
}

impl JobRecord {
    pub fn new(id: JobId, status: impl Into<String>, download_url: Option<&str>) -> Self {
        Self {
            id,
            status: status.into(),
            download_url: download_url.map(ToOwned::to_owned),
            src_lang: None,
            tgt_lang: None,
        }
    }
}

/// Row changes applied by one reconciliation pass.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReconcileOutcome {
    pub inserted: Vec<JobId>,
    pub updated: Vec<JobId>,
    pub removed: Vec<JobId>,
}

impl ReconcileOutcome {
    pub fn is_unchanged(&self) -> bool {
        self.inserted.is_empty() && self.removed.is_empty() && self.updated.is_empty()
    }
}

/// Rendered job rows in display order, with a position index keyed by job id.
///
/// Invariant: `index` maps every row's id to its position in `rows`, and no id
/// appears twice.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JobTable {
    rows: Vec<JobRecord>,
    index: BTreeMap<JobId, usize>,
}

impl JobTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> &[JobRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn contains(&self, job_id: JobId) -> bool {
        self.index.contains_key(&job_id)
    }

    pub fn get(&self, job_id: JobId) -> Option<&JobRecord> {
        self.index.get(&job_id).map(|&position| &self.rows[position])
    }

    /// Merges a complete server snapshot into the table.
    ///
    /// New ids are appended in snapshot order, known ids are replaced at their
    /// current position, and every id missing from the snapshot is dropped.
    pub fn reconcile(&mut self, jobs: Vec<JobRecord>) -> ReconcileOutcome {
        let mut outcome = ReconcileOutcome::default();
        let mut seen = BTreeSet::new();

        for job in jobs {
            let job_id = job.id;
            let first_sighting = seen.insert(job_id);
            match self.index.get(&job_id) {
                Some(&position) => {
                    let changed = self.rows[position] != job;
                    self.rows[position] = job;
                    if first_sighting && changed {
                        outcome.updated.push(job_id);
                    }
                }
                None => {
                    self.index.insert(job_id, self.rows.len());
                    self.rows.push(job);
                    outcome.inserted.push(job_id);
                }
            }
        }

        if self.rows.len() != seen.len() {
            self.rows.retain(|row| {
                let keep = seen.contains(&row.id);
                if !keep {
                    outcome.removed.push(row.id);
                }
                keep
            });
            self.rebuild_index();
        }

        outcome
    }

    fn rebuild_index(&mut self) {
        self.index = self
            .rows
            .iter()
            .enumerate()
            .map(|(position, row)| (row.id, position))
            .collect();
    }
}
