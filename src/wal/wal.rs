use crate::models::patient::PatientId;
use crate::models::user::UserId;
use anyhow::{anyhow, bail, Context, Result};
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Directory mutations recorded since the last reload
#[derive(Debug, Clone, PartialEq)]
pub enum WalOperation {
    AddPatient {
        id: Option<PatientId>,
        uuid: String,
        voided: bool,
    },
    RemovePatient {
        uuid: String,
    },
    AddUser {
        id: UserId,
        uuid: String,
    },
    RemoveUser {
        uuid: String,
    },
    SetLastViewed {
        user_id: UserId,
        value: String,
    },
}

impl WalOperation {
    fn to_line(&self) -> String {
        match self {
            WalOperation::AddPatient { id, uuid, voided } => {
                let id = id.map_or_else(|| "-".to_string(), |id| id.to_string());
                let voided_flag = if *voided { "1" } else { "0" };
                format!("ADD_PATIENT|{}|{}|{}", id, uuid, voided_flag)
            }
            WalOperation::RemovePatient { uuid } => format!("REMOVE_PATIENT|{}", uuid),
            WalOperation::AddUser { id, uuid } => format!("ADD_USER|{}|{}", id, uuid),
            WalOperation::RemoveUser { uuid } => format!("REMOVE_USER|{}", uuid),
            WalOperation::SetLastViewed { user_id, value } => {
                format!("SET_LAST_VIEWED|{}|{}", user_id, value)
            }
        }
    }

    fn from_line(line: &str) -> Result<Self> {
        let parts: Vec<&str> = line.split('|').collect();

        let expect_fields = |n: usize, name: &str| -> Result<()> {
            if parts.len() != n {
                bail!("Invalid {} format", name);
            }
            Ok(())
        };

        match parts.first() {
            Some(&"ADD_PATIENT") => {
                expect_fields(4, "ADD_PATIENT")?;
                let id = match parts[1] {
                    "-" => None,
                    raw => Some(raw.parse::<PatientId>().context("Invalid patient ID")?),
                };
                let voided = match parts[3] {
                    "0" => false,
                    "1" => true,
                    other => return Err(anyhow!("Invalid voided flag '{}'", other)),
                };
                Ok(WalOperation::AddPatient {
                    id,
                    uuid: non_empty(parts[2])?,
                    voided,
                })
            }
            Some(&"REMOVE_PATIENT") => {
                expect_fields(2, "REMOVE_PATIENT")?;
                Ok(WalOperation::RemovePatient {
                    uuid: non_empty(parts[1])?,
                })
            }
            Some(&"ADD_USER") => {
                expect_fields(3, "ADD_USER")?;
                let id = parts[1].parse::<UserId>().context("Invalid user ID")?;
                Ok(WalOperation::AddUser {
                    id,
                    uuid: non_empty(parts[2])?,
                })
            }
            Some(&"REMOVE_USER") => {
                expect_fields(2, "REMOVE_USER")?;
                Ok(WalOperation::RemoveUser {
                    uuid: non_empty(parts[1])?,
                })
            }
            Some(&"SET_LAST_VIEWED") => {
                expect_fields(3, "SET_LAST_VIEWED")?;
                let user_id = parts[1].parse::<UserId>().context("Invalid user ID")?;
                Ok(WalOperation::SetLastViewed {
                    user_id,
                    value: parts[2].to_string(),
                })
            }
            _ => bail!("Unknown operation type"),
        }
    }
}

fn non_empty(field: &str) -> Result<String> {
    if field.is_empty() {
        bail!("uuid must not be empty");
    }
    Ok(field.to_string())
}

pub struct Wal {
    file: Mutex<File>,
    path: PathBuf,
}

impl Wal {
    pub fn new(path: PathBuf) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .context("Failed to open WAL file")?;

        Ok(Wal {
            file: Mutex::new(file),
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn log_operation(&self, op: WalOperation) -> Result<()> {
        let line = op.to_line();
        let mut file = self
            .file
            .lock()
            .map_err(|_| anyhow!("WAL lock poisoned"))?;
        writeln!(file, "{}", line).context("Failed to write to WAL")?;
        file.flush().context("Failed to flush WAL")?;
        Ok(())
    }

    pub fn replay(&self) -> Result<Vec<WalOperation>> {
        let file = File::open(&self.path).context("Failed to open WAL for replay")?;
        let reader = BufReader::new(file);
        let mut operations = Vec::new();

        for (line_num, line_result) in reader.lines().enumerate() {
            let line = line_result.context("Failed to read line from WAL")?;
            let line = line.trim();

            if line.is_empty() {
                continue;
            }

            match WalOperation::from_line(line) {
                Ok(op) => operations.push(op),
                Err(e) => {
                    tracing::warn!(
                        line_num = line_num + 1,
                        error = %e,
                        "Failed to parse WAL line, skipping"
                    );
                }
            }
        }

        Ok(operations)
    }

    pub fn truncate(&self) -> Result<()> {
        let file = self
            .file
            .lock()
            .map_err(|_| anyhow!("WAL lock poisoned"))?;
        file.set_len(0).context("Failed to truncate WAL")?;
        Ok(())
    }
}
