//! Backend over a local JSON directory file
//!
//! Reads villages and family members from a JSON data file and appends
//! accepted submissions to a JSON-lines outbox.

use super::traits::{OptionProvider, RecordLoader, SubmissionSink};
use crate::state::{
    MemberRecord, OptionItem, OptionKind, OptionList, SubmissionPayload, SubmissionReceipt,
};
use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

/// A village as stored in the data file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Village {
    pub id: String,
    pub name: String,
}

/// Contents of the data file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Directory {
    pub villages: Vec<Village>,
    pub family: Vec<MemberRecord>,
}

/// One line of the outbox
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutboxEntry {
    pub submission_id: Uuid,
    pub submitted_at: DateTime<Utc>,
    pub payload: SubmissionPayload,
}

/// File-backed stand-in for the association API
#[derive(Debug, Clone)]
pub struct LocalBackend {
    data_file: PathBuf,
    outbox_file: PathBuf,
}

impl LocalBackend {
    pub fn new(data_file: impl Into<PathBuf>, outbox_file: impl Into<PathBuf>) -> Self {
        Self {
            data_file: data_file.into(),
            outbox_file: outbox_file.into(),
        }
    }

    async fn read_directory(&self) -> Result<Directory> {
        let content = tokio::fs::read_to_string(&self.data_file)
            .await
            .with_context(|| format!("Failed to read {}", self.data_file.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", self.data_file.display()))
    }
}

fn parent_option(record: &MemberRecord) -> OptionItem {
    OptionItem::new(record.id.clone(), record.full_name())
        .with_extra("firstname", record.firstname.clone())
        .with_extra("lastname", record.lastname.clone())
}

#[async_trait]
impl OptionProvider for LocalBackend {
    async fn fetch_options(&self, kind: OptionKind) -> Result<OptionList> {
        if let Some(list) = kind.static_options() {
            return Ok(list);
        }
        match kind {
            OptionKind::Villages => {
                let directory = self.read_directory().await?;
                Ok(directory
                    .villages
                    .into_iter()
                    .map(|v| OptionItem::new(v.id, v.name))
                    .collect::<Vec<_>>()
                    .into())
            }
            _ => Err(anyhow!("{} depend on a member; use the dependent fetch", kind.label())),
        }
    }

    async fn fetch_dependent_options(&self, owner_id: &str) -> Result<OptionList> {
        let directory = self.read_directory().await?;
        let parents: Vec<OptionItem> = directory
            .family
            .iter()
            .filter(|r| r.owner_id == owner_id || r.id == owner_id)
            .map(parent_option)
            .collect();
        tracing::debug!("{} eligible parents for member {}", parents.len(), owner_id);
        Ok(parents.into())
    }
}

#[async_trait]
impl RecordLoader for LocalBackend {
    async fn load_record(&self, id: &str) -> Result<Option<MemberRecord>> {
        let directory = self.read_directory().await?;
        Ok(directory.family.into_iter().find(|r| r.id == id))
    }
}

#[async_trait]
impl SubmissionSink for LocalBackend {
    async fn submit(&self, payload: SubmissionPayload) -> Result<SubmissionReceipt> {
        if payload.member_id.trim().is_empty() {
            bail!("Submission is missing the member id");
        }
        if let Some(photo) = &payload.photo {
            let exists = tokio::fs::try_exists(photo)
                .await
                .with_context(|| format!("Failed to check photo {}", photo.display()))?;
            if !exists {
                bail!("Photo {} does not exist", photo.display());
            }
        }

        let entry = OutboxEntry {
            submission_id: Uuid::new_v4(),
            submitted_at: Utc::now(),
            payload,
        };
        let mut line = serde_json::to_string(&entry)?;
        line.push('\n');

        if let Some(parent) = self.outbox_file.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.outbox_file)
            .await
            .with_context(|| format!("Failed to open {}", self.outbox_file.display()))?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;

        tracing::info!(
            "Wrote submission {} to {}",
            entry.submission_id,
            self.outbox_file.display()
        );
        Ok(SubmissionReceipt {
            submission_id: entry.submission_id,
            accepted_at: entry.submitted_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;
    use tempfile::TempDir;
    use tokio_test::{assert_err, assert_ok};

    const DATA: &str = r#"{
        "villages": [
            {"id": "v1", "name": "Rampur"},
            {"id": "v2", "name": "Sitapur"}
        ],
        "family": [
            {"id": "m1", "firstname": "Mohan", "lastname": "Patel"},
            {"id": "f1", "owner_id": "m1", "parent_id": "m1",
             "firstname": "Ravi", "middlename": "Mohan", "lastname": "Patel",
             "village_id": "v2"},
            {"id": "f9", "owner_id": "m2", "firstname": "Other", "lastname": "Family"}
        ]
    }"#;

    fn setup() -> (TempDir, LocalBackend) {
        let dir = TempDir::new().unwrap();
        let data = dir.path().join("directory.json");
        std::fs::write(&data, DATA).unwrap();
        let backend = LocalBackend::new(data, dir.path().join("out").join("outbox.jsonl"));
        (dir, backend)
    }

    fn payload() -> SubmissionPayload {
        let mut fields = BTreeMap::new();
        fields.insert("firstname".to_string(), "Anita".to_string());
        SubmissionPayload {
            member_id: "m1".to_string(),
            record_id: None,
            fields,
            photo: None,
        }
    }

    #[tokio::test]
    async fn test_fetch_villages() {
        let (_dir, backend) = setup();
        let villages = backend.fetch_options(OptionKind::Villages).await.unwrap();
        assert_eq!(villages.len(), 2);
        assert_eq!(villages.label_for("v2"), "Sitapur");
    }

    #[tokio::test]
    async fn test_fetch_static_options_skips_file() {
        let backend = LocalBackend::new("/nonexistent/data.json", "/nonexistent/out.jsonl");
        let genders = assert_ok!(backend.fetch_options(OptionKind::Gender).await);
        assert_eq!(genders.len(), 3);
    }

    #[tokio::test]
    async fn test_parents_through_plain_fetch_is_an_error() {
        let (_dir, backend) = setup();
        assert_err!(backend.fetch_options(OptionKind::Parents).await);
    }

    #[tokio::test]
    async fn test_dependent_options_are_scoped_to_owner() {
        let (_dir, backend) = setup();
        let parents = backend.fetch_dependent_options("m1").await.unwrap();
        let ids: Vec<_> = parents.iter().map(|o| o.value.as_str()).collect();
        assert_eq!(ids, vec!["m1", "f1"]);
        let mohan = parents.find("m1").unwrap();
        assert_eq!(mohan.label, "Mohan Patel");
        assert_eq!(mohan.extra("firstname"), Some("Mohan"));
        assert_eq!(mohan.extra("lastname"), Some("Patel"));
    }

    #[tokio::test]
    async fn test_load_record() {
        let (_dir, backend) = setup();
        let record = backend.load_record("f1").await.unwrap().unwrap();
        assert_eq!(record.firstname, "Ravi");
        assert!(backend.load_record("f404").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_missing_data_file() {
        let dir = TempDir::new().unwrap();
        let backend = LocalBackend::new(dir.path().join("nope.json"), dir.path().join("o.jsonl"));
        let err = backend.load_record("f1").await.unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }

    #[tokio::test]
    async fn test_submit_appends_to_outbox() {
        let (dir, backend) = setup();
        let first = backend.submit(payload()).await.unwrap();
        let second = backend.submit(payload()).await.unwrap();
        assert_ne!(first.submission_id, second.submission_id);

        let content =
            std::fs::read_to_string(dir.path().join("out").join("outbox.jsonl")).unwrap();
        let entries: Vec<OutboxEntry> = content
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].submission_id, first.submission_id);
        assert_eq!(entries[1].payload, payload());
    }

    #[tokio::test]
    async fn test_submit_rejects_missing_photo() {
        let (_dir, backend) = setup();
        let mut p = payload();
        p.photo = Some(PathBuf::from("/nonexistent/photo.jpg"));
        let err = backend.submit(p).await.unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[tokio::test]
    async fn test_submit_reports_unreadable_photo_path() {
        let (dir, backend) = setup();
        let not_a_dir = dir.path().join("notes.txt");
        std::fs::write(&not_a_dir, "plain file").unwrap();
        let mut p = payload();
        p.photo = Some(not_a_dir.join("photo.jpg"));
        let err = backend.submit(p).await.unwrap_err();
        assert!(err.to_string().contains("Failed to check photo"));
        assert!(!dir.path().join("out").join("outbox.jsonl").exists());
    }

    #[tokio::test]
    async fn test_submit_rejects_blank_member() {
        let (_dir, backend) = setup();
        let mut p = payload();
        p.member_id = " ".to_string();
        assert_err!(backend.submit(p).await);
    }
}
