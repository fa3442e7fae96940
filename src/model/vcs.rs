//! Version-control status as reported by the session's VCS RPCs.

use serde::{Deserialize, Serialize};

/// Per-file status entry. `status` is the two-character porcelain code
/// (e.g. `"M "`, `"??"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusAndPath {
    pub status: String,
    pub path: String,
    /// Path exactly as emitted by the VCS, before alias resolution.
    #[serde(default)]
    pub raw_path: String,
}

impl StatusAndPath {
    pub fn is_untracked(&self) -> bool {
        self.status == "??"
    }
}

/// Branch list plus the index of the checked-out branch, if any
/// (detached HEAD reports none).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchesInfo {
    pub branches: Vec<String>,
    #[serde(rename = "activeIndex")]
    pub active_index: Option<usize>,
}

impl BranchesInfo {
    pub fn active_branch(&self) -> Option<&str> {
        self.active_index
            .and_then(|i| self.branches.get(i))
            .map(String::as_str)
    }
}

/// Combined working-tree status, branches, and remote availability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllStatus {
    pub status: Vec<StatusAndPath>,
    pub branches: BranchesInfo,
    pub has_remote: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_status_payload() {
        let json = r#"{
            "status": [
                {"status": " M", "path": "R/plot.R", "raw_path": "R/plot.R"},
                {"status": "??", "path": "notes.txt"}
            ],
            "branches": {"branches": ["main", "wip"], "activeIndex": 0},
            "has_remote": true
        }"#;
        let all: AllStatus = serde_json::from_str(json).unwrap();
        assert_eq!(all.status.len(), 2);
        assert!(!all.status[0].is_untracked());
        assert!(all.status[1].is_untracked());
        assert_eq!(all.branches.active_branch(), Some("main"));
        assert!(all.has_remote);
    }

    #[test]
    fn detached_head_has_no_active_branch() {
        let info = BranchesInfo {
            branches: vec!["main".into()],
            active_index: None,
        };
        assert_eq!(info.active_branch(), None);
    }
}
