//! Change detection between build passes.
//!
//! Decides whether the HTML artifact has to be regenerated by comparing chunk
//! hashes and the template's modification time against what the previous
//! pass saw. The ledger is updated on every pass, whatever the decision.

use std::time::{SystemTime, UNIX_EPOCH};

use rustc_hash::{FxHashMap as HashMap, FxHashSet as HashSet};
use serde::{Deserialize, Serialize};

use crate::chunk::Chunk;

/// Modification time in milliseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(pub u64);

impl Timestamp {
    pub fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    pub fn as_millis(&self) -> u64 {
        self.0
    }

    /// Convert a filesystem time.
    ///
    /// Times before the epoch, or too far past it to fit in `u64`
    /// milliseconds, have no representation and return `None` (unknown).
    pub fn from_system_time(time: SystemTime) -> Option<Self> {
        let elapsed = time.duration_since(UNIX_EPOCH).ok()?;
        u64::try_from(elapsed.as_millis()).ok().map(Self)
    }
}

/// Last observed chunk hashes (by chunk name) and template timestamp.
///
/// Owned by a single plugin instance; two instances never share history.
#[derive(Debug, Clone, Default)]
pub struct VersionLedger {
    chunk_versions: HashMap<String, String>,
    template_timestamp: Option<Timestamp>,
}

impl VersionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hash recorded for `name` by the latest pass that saw it.
    pub fn chunk_version(&self, name: &str) -> Option<&str> {
        self.chunk_versions.get(name).map(String::as_str)
    }

    pub fn template_timestamp(&self) -> Option<Timestamp> {
        self.template_timestamp
    }

    pub fn len(&self) -> usize {
        self.chunk_versions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunk_versions.is_empty()
    }

    /// Store `hash` for `name`, returning true if it differs from the previous entry.
    fn record_chunk(&mut self, name: &str, hash: &str) -> bool {
        match self.chunk_versions.get_mut(name) {
            Some(previous) if previous == hash => false,
            Some(previous) => {
                previous.clear();
                previous.push_str(hash);
                true
            }
            None => {
                self.chunk_versions.insert(name.to_string(), hash.to_string());
                true
            }
        }
    }

    /// Compare `current` against the stored timestamp, then keep `current` if present.
    ///
    /// An unknown timestamp on either side never compares equal.
    fn record_template(&mut self, current: Option<Timestamp>) -> bool {
        let changed = match (current, self.template_timestamp) {
            (Some(current), Some(previous)) => current != previous,
            _ => true,
        };
        if current.is_some() {
            self.template_timestamp = current;
        }
        changed
    }
}

/// Outcome of the rebuild decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RebuildDecision {
    /// Regenerate the artifact.
    Rebuild,
    /// Neither a relevant chunk nor the template changed.
    SkipUnchanged,
    /// Only chunk hashes changed, and hashes are not part of the URLs, so
    /// the output would be byte-identical.
    SkipHashless,
}

impl RebuildDecision {
    pub fn should_rebuild(self) -> bool {
        matches!(self, RebuildDecision::Rebuild)
    }
}

impl std::fmt::Display for RebuildDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RebuildDecision::Rebuild => write!(f, "rebuild"),
            RebuildDecision::SkipUnchanged => write!(f, "no relevant chunk or template change"),
            RebuildDecision::SkipHashless => {
                write!(f, "only chunk hashes changed and hash appending is disabled")
            }
        }
    }
}

/// What changed in one pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeReport {
    /// Names of chunks whose hash differs from the ledger, in pass order.
    pub changed_chunks: Vec<String>,
    pub relevant_chunks_changed: bool,
    pub template_changed: bool,
    pub decision: RebuildDecision,
}

impl ChangeReport {
    pub fn should_rebuild(&self) -> bool {
        self.decision.should_rebuild()
    }
}

/// Stateless rebuild decision over a caller-owned [`VersionLedger`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ChangeDetector {
    hash_enabled: bool,
}

impl ChangeDetector {
    /// `hash_enabled` mirrors the `hash` option: chunk hashes end up in URLs.
    pub fn new(hash_enabled: bool) -> Self {
        Self { hash_enabled }
    }

    /// Compare the pass against `ledger`, update the ledger, and decide.
    ///
    /// Every chunk is recorded, relevant or not. A chunk seen for the first
    /// time counts as changed.
    pub fn detect<'a>(
        &self,
        ledger: &mut VersionLedger,
        chunks: &[Chunk],
        relevant: impl IntoIterator<Item = &'a str>,
        template_timestamp: Option<Timestamp>,
    ) -> ChangeReport {
        let relevant: HashSet<&str> = relevant.into_iter().collect();

        let mut changed_chunks = Vec::new();
        for chunk in chunks {
            if ledger.record_chunk(&chunk.name, &chunk.hash) {
                tracing::debug!(chunk = %chunk.name, hash = %chunk.hash, "chunk changed");
                changed_chunks.push(chunk.name.clone());
            }
        }

        let relevant_chunks_changed = changed_chunks
            .iter()
            .any(|name| relevant.contains(name.as_str()));
        let template_changed = ledger.record_template(template_timestamp);

        let decision = if !relevant_chunks_changed && !template_changed {
            RebuildDecision::SkipUnchanged
        } else if !self.hash_enabled && !template_changed {
            RebuildDecision::SkipHashless
        } else {
            RebuildDecision::Rebuild
        };

        ChangeReport {
            changed_chunks,
            relevant_chunks_changed,
            template_changed,
            decision,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(name: &str, hash: &str) -> Chunk {
        Chunk::new(name, name, hash)
    }

    const T1: Option<Timestamp> = Some(Timestamp(1_000));
    const T2: Option<Timestamp> = Some(Timestamp(2_000));

    #[test]
    fn first_appearance_counts_as_changed() {
        let mut ledger = VersionLedger::new();
        let report = ChangeDetector::new(true).detect(
            &mut ledger,
            &[chunk("app", "a1"), chunk("worker", "w1")],
            ["app"],
            T1,
        );

        assert_eq!(report.changed_chunks, vec!["app", "worker"]);
        assert!(report.relevant_chunks_changed);
        assert!(report.template_changed);
        assert!(report.should_rebuild());
        assert_eq!(ledger.chunk_version("worker"), Some("w1"));
        assert_eq!(ledger.template_timestamp(), T1);
    }

    #[test]
    fn identical_pass_is_skipped_and_ledger_kept() {
        let mut ledger = VersionLedger::new();
        let detector = ChangeDetector::new(true);
        detector.detect(&mut ledger, &[chunk("app", "a1")], ["app"], T1);

        let report = detector.detect(&mut ledger, &[chunk("app", "a1")], ["app"], T1);
        assert!(report.changed_chunks.is_empty());
        assert_eq!(report.decision, RebuildDecision::SkipUnchanged);
        assert_eq!(ledger.chunk_version("app"), Some("a1"));
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn irrelevant_change_without_hash_is_skipped() {
        let mut ledger = VersionLedger::new();
        let detector = ChangeDetector::new(false);
        detector.detect(&mut ledger, &[chunk("app", "a1"), chunk("worker", "w1")], ["app"], T1);

        let report = detector.detect(
            &mut ledger,
            &[chunk("app", "a1"), chunk("worker", "w2")],
            ["app"],
            T1,
        );
        assert_eq!(report.changed_chunks, vec!["worker"]);
        assert!(!report.relevant_chunks_changed);
        assert_eq!(report.decision, RebuildDecision::SkipUnchanged);
        assert_eq!(ledger.chunk_version("worker"), Some("w2"));
    }

    #[test]
    fn relevant_change_without_hash_and_unchanged_template_is_skipped() {
        let mut ledger = VersionLedger::new();
        let detector = ChangeDetector::new(false);
        detector.detect(&mut ledger, &[chunk("app", "a1")], ["app"], T1);

        let report = detector.detect(&mut ledger, &[chunk("app", "a2")], ["app"], T1);
        assert!(report.relevant_chunks_changed);
        assert!(!report.template_changed);
        assert_eq!(report.decision, RebuildDecision::SkipHashless);
    }

    #[test]
    fn relevant_change_with_hash_rebuilds() {
        let mut ledger = VersionLedger::new();
        let detector = ChangeDetector::new(true);
        detector.detect(&mut ledger, &[chunk("app", "a1")], ["app"], T1);

        let report = detector.detect(&mut ledger, &[chunk("app", "a2")], ["app"], T1);
        assert_eq!(report.decision, RebuildDecision::Rebuild);
    }

    #[test]
    fn template_change_alone_rebuilds_without_hash() {
        let mut ledger = VersionLedger::new();
        let detector = ChangeDetector::new(false);
        detector.detect(&mut ledger, &[chunk("app", "a1")], ["app"], T1);

        let report = detector.detect(&mut ledger, &[chunk("app", "a1")], ["app"], T2);
        assert!(report.template_changed);
        assert!(!report.relevant_chunks_changed);
        assert_eq!(report.decision, RebuildDecision::Rebuild);
        assert_eq!(ledger.template_timestamp(), T2);
    }

    #[test]
    fn unknown_timestamp_counts_as_change_and_keeps_previous() {
        let mut ledger = VersionLedger::new();
        let detector = ChangeDetector::new(false);
        detector.detect(&mut ledger, &[], ["app"], T1);

        let report = detector.detect(&mut ledger, &[], ["app"], None);
        assert!(report.template_changed);
        assert_eq!(ledger.template_timestamp(), T1);

        let report = detector.detect(&mut ledger, &[], ["app"], T1);
        assert!(!report.template_changed);
    }

    #[test]
    fn first_pass_without_timestamp_still_rebuilds() {
        let mut ledger = VersionLedger::new();
        let report = ChangeDetector::new(false).detect(&mut ledger, &[chunk("app", "a1")], ["app"], None);
        assert!(report.template_changed);
        assert!(report.should_rebuild());
        assert_eq!(ledger.template_timestamp(), None);
    }

    #[test]
    fn ledger_tracks_by_name_not_id() {
        let mut ledger = VersionLedger::new();
        let detector = ChangeDetector::new(true);
        detector.detect(&mut ledger, &[Chunk::new("1", "app", "a1")], ["app"], T1);

        let report = detector.detect(&mut ledger, &[Chunk::new("9", "app", "a1")], ["app"], T1);
        assert!(report.changed_chunks.is_empty());
    }

    #[test]
    fn timestamp_from_system_time() {
        let time = UNIX_EPOCH + std::time::Duration::from_millis(1_234);
        assert_eq!(Timestamp::from_system_time(time), Some(Timestamp(1_234)));
        assert_eq!(Timestamp::from_system_time(UNIX_EPOCH), Some(Timestamp(0)));
    }

    #[test]
    fn pre_epoch_time_is_unknown() {
        let time = UNIX_EPOCH - std::time::Duration::from_secs(1);
        assert_eq!(Timestamp::from_system_time(time), None);
    }

    #[test]
    fn unknown_filesystem_time_keeps_template_changed() {
        let pre_epoch = UNIX_EPOCH - std::time::Duration::from_secs(1);
        let mut ledger = VersionLedger::new();
        let detector = ChangeDetector::new(false);
        let chunks = [Chunk::new("1", "app", "a1")];

        detector.detect(&mut ledger, &chunks, ["app"], Some(Timestamp(0)));
        let report = detector.detect(
            &mut ledger,
            &chunks,
            ["app"],
            Timestamp::from_system_time(pre_epoch),
        );

        assert!(report.template_changed);
        assert_eq!(ledger.template_timestamp(), Some(Timestamp(0)));
    }
}
