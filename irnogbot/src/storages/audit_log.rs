use std::{fmt, path::PathBuf};

use botkit::{html, html::HtmlString};
use teloxide::types::ChatId;
use tokio::{fs, io::AsyncWriteExt, sync::Mutex};

use crate::callback::Decision;

/// Something the reviewer may want to trace later
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuditEvent {
    Forwarded {
        applicant: ChatId,
        resubmission: bool,
    },
    Decided {
        applicant: ChatId,
        name: Option<String>,
        decision: Decision,
    },
}

impl fmt::Display for AuditEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuditEvent::Forwarded {
                applicant,
                resubmission: false,
            } => write!(f, "application of {} forwarded for review", applicant),
            AuditEvent::Forwarded {
                applicant,
                resubmission: true,
            } => write!(f, "application of {} resubmitted for review", applicant),
            AuditEvent::Decided {
                applicant,
                name,
                decision,
            } => write!(
                f,
                "{} ({}) {}",
                name.as_deref().unwrap_or("unknown"),
                applicant,
                decision
            ),
        }
    }
}

#[async_trait::async_trait]
pub trait AuditLogTrait: Send + Sync {
    async fn record(&self, event: AuditEvent) -> Result<(), HtmlString>;
}

/// Appends one timestamped line per event to a text file
pub struct FileAuditLog {
    file_path: PathBuf,
    // serializes appends from concurrent handlers
    lock: Mutex<()>,
}

impl FileAuditLog {
    pub fn new(file_path: PathBuf) -> Self {
        Self {
            file_path,
            lock: Mutex::new(()),
        }
    }

    async fn append(&self, line: &str) -> Result<(), std::io::Error> {
        let _guard = self.lock.lock().await;
        if let Some(parent) = self.file_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.file_path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await
    }
}

#[async_trait::async_trait]
impl AuditLogTrait for FileAuditLog {
    async fn record(&self, event: AuditEvent) -> Result<(), HtmlString> {
        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
        let line = format!("{}: {}\n", timestamp, event);
        self.append(&line).await.map_err(|e| {
            log::error!("Failed to write audit log {:?}: {}", self.file_path, e);
            html!("Failed to write audit log: {}", e.to_string())
        })
    }
}

/// Used when no audit file is configured: events only reach the log
#[derive(Clone, Copy, Default)]
pub struct LogAuditLog;

#[async_trait::async_trait]
impl AuditLogTrait for LogAuditLog {
    async fn record(&self, event: AuditEvent) -> Result<(), HtmlString> {
        log::info!("Audit: {}", event);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::{SystemTime, UNIX_EPOCH};

    use super::*;

    #[test]
    fn test_event_lines() {
        let decided = AuditEvent::Decided {
            applicant: ChatId(42),
            name: Some("Sara".to_string()),
            decision: Decision::Approve,
        };
        assert_eq!(decided.to_string(), "Sara (42) approved");

        let forwarded = AuditEvent::Forwarded {
            applicant: ChatId(42),
            resubmission: true,
        };
        assert_eq!(
            forwarded.to_string(),
            "application of 42 resubmitted for review"
        );
    }

    #[tokio::test]
    async fn test_log_audit_log_accepts_events() {
        let audit = LogAuditLog;
        audit
            .record(AuditEvent::Forwarded {
                applicant: ChatId(1),
                resubmission: false,
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_file_audit_log_appends() {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let dir = std::env::temp_dir().join(format!("irnogbot-audit-{}", nanos));
        let path = dir.join("decisions.log");
        let audit = FileAuditLog::new(path.clone());

        for decision in [Decision::Approve, Decision::Reject] {
            audit
                .record(AuditEvent::Decided {
                    applicant: ChatId(5),
                    name: None,
                    decision,
                })
                .await
                .unwrap();
        }

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with(": unknown (5) approved"));
        assert!(lines[1].ends_with(": unknown (5) rejected"));
        // "YYYY-MM-DD HH:MM:SS" prefix
        assert_eq!(lines[0].find(": "), Some(19));

        let _ = std::fs::remove_dir_all(dir);
    }
}
