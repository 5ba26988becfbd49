//! Per-file drift detection results
//!
//! `SyncEngine::check` records one [`FileCheck`] for every managed file. The
//! report status is the worst status recorded, with an unreadable snapshot
//! ranking above any file drift.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Overall or per-file state, ordered from best to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CheckStatus {
    Healthy,
    Missing,
    Drifted,
    /// The snapshot exists but cannot be parsed.
    Broken,
}

/// Why a file no longer matches the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Drift {
    /// The file does not exist.
    Missing,
    /// The markers were removed or damaged.
    RegionMissing,
    /// The managed region holds something other than a fresh render.
    RegionDiffers,
    /// A file written whole differs from a fresh render.
    ContentDiffers,
    /// The verbatim hardware file changed.
    ChecksumMismatch { expected: String, actual: String },
}

impl Drift {
    pub fn status(&self) -> CheckStatus {
        match self {
            Drift::Missing => CheckStatus::Missing,
            _ => CheckStatus::Drifted,
        }
    }
}

impl fmt::Display for Drift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Drift::Missing => f.write_str("file not found"),
            Drift::RegionMissing => f.write_str("managed region not found"),
            Drift::RegionDiffers => f.write_str("managed region differs from model"),
            Drift::ContentDiffers => f.write_str("differs from model"),
            Drift::ChecksumMismatch { expected, actual } => {
                write!(f, "checksum mismatch: expected {expected}, got {actual}")
            }
        }
    }
}

/// The outcome for one managed file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileCheck {
    pub path: String,
    pub status: CheckStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drift: Option<Drift>,
}

/// Result of comparing the files on disk against a model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckReport {
    pub status: CheckStatus,
    pub files: Vec<FileCheck>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapshot_error: Option<String>,
}

impl Default for CheckReport {
    fn default() -> Self {
        Self {
            status: CheckStatus::Healthy,
            files: Vec::new(),
            snapshot_error: None,
        }
    }
}

impl CheckReport {
    /// Record a file, `None` meaning it matches the model.
    pub fn record(&mut self, path: impl Into<String>, drift: Option<Drift>) {
        let status = drift.as_ref().map_or(CheckStatus::Healthy, Drift::status);
        self.status = self.status.max(status);
        self.files.push(FileCheck {
            path: path.into(),
            status,
            drift,
        });
    }

    pub fn snapshot_unreadable(&mut self, message: impl Into<String>) {
        self.status = CheckStatus::Broken;
        self.snapshot_error = Some(message.into());
    }

    /// Files that are missing or drifted, in check order.
    pub fn issues(&self) -> impl Iterator<Item = (&str, &Drift)> {
        self.files
            .iter()
            .filter_map(|file| file.drift.as_ref().map(|drift| (file.path.as_str(), drift)))
    }

    /// Number of files recorded with `status`.
    pub fn count(&self, status: CheckStatus) -> usize {
        self.files.iter().filter(|f| f.status == status).count()
    }

    pub fn is_healthy(&self) -> bool {
        self.status == CheckStatus::Healthy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn test_empty_report_is_healthy() {
        let report = CheckReport::default();
        assert!(report.is_healthy());
        assert_eq!(report.issues().count(), 0);
    }

    #[rstest]
    #[case(vec![None, None], CheckStatus::Healthy)]
    #[case(vec![None, Some(Drift::Missing)], CheckStatus::Missing)]
    #[case(vec![Some(Drift::RegionDiffers), Some(Drift::Missing)], CheckStatus::Drifted)]
    #[case(vec![Some(Drift::Missing), Some(Drift::ContentDiffers), None], CheckStatus::Drifted)]
    fn test_worst_file_status_wins(
        #[case] drifts: Vec<Option<Drift>>,
        #[case] expected: CheckStatus,
    ) {
        let mut report = CheckReport::default();
        for (index, drift) in drifts.into_iter().enumerate() {
            report.record(format!("file{index}.nix"), drift);
        }
        assert_eq!(report.status, expected);
    }

    #[test]
    fn test_unreadable_snapshot_outranks_drift() {
        let mut report = CheckReport::default();
        report.record("home.nix", Some(Drift::RegionMissing));
        report.snapshot_unreadable("expected value at line 1");
        report.record("flake.nix", Some(Drift::Missing));

        assert_eq!(report.status, CheckStatus::Broken);
        assert_eq!(report.count(CheckStatus::Drifted), 1);
        assert_eq!(report.count(CheckStatus::Missing), 1);
    }

    #[test]
    fn test_issues_skip_healthy_files() {
        let mut report = CheckReport::default();
        report.record("configuration.nix", None);
        report.record("home.nix", Some(Drift::RegionDiffers));

        let issues: Vec<(&str, String)> = report
            .issues()
            .map(|(path, drift)| (path, drift.to_string()))
            .collect();
        assert_eq!(
            issues,
            vec![("home.nix", "managed region differs from model".to_string())]
        );
    }

    #[test]
    fn test_json_shape() {
        let mut report = CheckReport::default();
        report.record(
            "hardware-configuration.nix",
            Some(Drift::ChecksumMismatch {
                expected: "aa".into(),
                actual: "bb".into(),
            }),
        );
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["status"], "Drifted");
        assert_eq!(json["files"][0]["drift"]["kind"], "checksum_mismatch");
        assert!(json.get("snapshot_error").is_none());
    }
}
