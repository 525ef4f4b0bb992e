use std::path::{Path, PathBuf};
use std::{env, fs};

use rusqlite::{Connection, OptionalExtension, Row, params};
use serde::Serialize;
use uuid::Uuid;

use hearth_core::{MoodEntry, SentimentLabel, Sender, Utterance};

use crate::error::{Result, StoreError};
use crate::schema;

pub const DB_FILE: &str = "hearth.db";

/// `$HOME/.hearth`, or `./.hearth` when no home is set.
pub fn default_data_dir() -> PathBuf {
    env::var("HOME")
        .or_else(|_| env::var("USERPROFILE"))
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(".hearth")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct StoreStats {
    pub sessions: u64,
    pub open_sessions: u64,
    pub utterances: u64,
    pub user_utterances: u64,
    pub mood_entries: u64,
}

pub struct Store {
    conn: Connection,
}

impl Store {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        schema::initialize(&conn)?;
        Ok(Self { conn })
    }

    /// Open `hearth.db` inside `dir`, creating the directory if needed.
    pub fn open_dir(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir).map_err(|e| {
            StoreError::InvalidData(format!("failed to create {}: {e}", dir.display()))
        })?;
        Self::open(&dir.join(DB_FILE))
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        schema::initialize(&conn)?;
        Ok(Self { conn })
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    // --- Metadata ---

    pub fn get_metadata(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM metadata WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    pub fn set_metadata(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO metadata (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    // --- Sessions ---

    pub fn create_session(&self) -> Result<Uuid> {
        let id = Uuid::new_v4();
        self.conn
            .execute("INSERT INTO sessions (id) VALUES (?1)", [id.to_string()])?;
        tracing::debug!("created session {id}");
        Ok(id)
    }

    /// Most recently started session that has not been closed.
    pub fn latest_open_session(&self) -> Result<Option<Uuid>> {
        let id: Option<String> = self
            .conn
            .query_row(
                "SELECT id FROM sessions WHERE ended_at IS NULL
                 ORDER BY started_at DESC, rowid DESC LIMIT 1",
                [],
                |row| row.get(0),
            )
            .optional()?;
        id.as_deref().map(parse_uuid).transpose()
    }

    pub fn session_exists(&self, session: Uuid) -> Result<bool> {
        let n: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM sessions WHERE id = ?1",
            [session.to_string()],
            |row| row.get(0),
        )?;
        Ok(n > 0)
    }

    pub fn is_session_open(&self, session: Uuid) -> Result<bool> {
        let ended: Option<Option<String>> = self
            .conn
            .query_row(
                "SELECT ended_at FROM sessions WHERE id = ?1",
                [session.to_string()],
                |row| row.get(0),
            )
            .optional()?;
        match ended {
            Some(ended_at) => Ok(ended_at.is_none()),
            None => Err(StoreError::InvalidData(format!("unknown session {session}"))),
        }
    }

    /// Mark a session closed and keep its summary.
    pub fn close_session(&self, session: Uuid, summary: &str) -> Result<()> {
        let updated = self.conn.execute(
            "UPDATE sessions SET ended_at = datetime('now'), summary = ?2
             WHERE id = ?1 AND ended_at IS NULL",
            params![session.to_string(), summary],
        )?;
        if updated == 0 {
            return Err(StoreError::InvalidData(format!(
                "session {session} is unknown or already closed"
            )));
        }
        tracing::info!("closed session {session}");
        Ok(())
    }

    pub fn session_summary(&self, session: Uuid) -> Result<Option<String>> {
        let summary: Option<Option<String>> = self
            .conn
            .query_row(
                "SELECT summary FROM sessions WHERE id = ?1",
                [session.to_string()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(summary.flatten())
    }

    // --- Utterances ---

    pub fn append_utterance(&self, session: Uuid, utterance: &Utterance) -> Result<()> {
        self.conn.execute(
            "INSERT INTO utterances (session_id, sender, content, sentiment_score, sentiment_label, risk_level)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                session.to_string(),
                utterance.sender.as_str(),
                utterance.text,
                utterance.sentiment_score,
                utterance.sentiment_label.map(|l| l.as_str()),
                utterance.risk_level,
            ],
        )?;
        Ok(())
    }

    /// The last `limit` utterances of a session, oldest first.
    pub fn load_history(&self, session: Uuid, limit: usize) -> Result<Vec<Utterance>> {
        let mut stmt = self.conn.prepare(
            "SELECT sender, content, sentiment_score, sentiment_label, risk_level
             FROM utterances WHERE session_id = ?1 ORDER BY id DESC LIMIT ?2",
        )?;
        let mut history = stmt
            .query_map(params![session.to_string(), limit as i64], read_utterance_row)?
            .map(|r| r?.into_utterance())
            .collect::<Result<Vec<_>>>()?;
        history.reverse();
        Ok(history)
    }

    /// Every utterance of a session, oldest first.
    pub fn session_history(&self, session: Uuid) -> Result<Vec<Utterance>> {
        let mut stmt = self.conn.prepare(
            "SELECT sender, content, sentiment_score, sentiment_label, risk_level
             FROM utterances WHERE session_id = ?1 ORDER BY id",
        )?;
        stmt.query_map([session.to_string()], read_utterance_row)?
            .map(|r| r?.into_utterance())
            .collect()
    }

    /// The last `limit` user turns across all sessions, oldest first.
    pub fn recent_user_utterances(&self, limit: usize) -> Result<Vec<Utterance>> {
        let mut stmt = self.conn.prepare(
            "SELECT sender, content, sentiment_score, sentiment_label, risk_level
             FROM utterances WHERE sender = 'user' ORDER BY id DESC LIMIT ?1",
        )?;
        let mut turns = stmt
            .query_map([limit as i64], read_utterance_row)?
            .map(|r| r?.into_utterance())
            .collect::<Result<Vec<_>>>()?;
        turns.reverse();
        Ok(turns)
    }

    // --- Moods ---

    pub fn add_mood_entry(&self, session: Option<Uuid>, mood: &str, intensity: u8) -> Result<()> {
        if !(1..=10).contains(&intensity) {
            return Err(StoreError::InvalidData(format!(
                "mood intensity must be 1-10, got {intensity}"
            )));
        }
        if mood.trim().is_empty() {
            return Err(StoreError::InvalidData("mood name is empty".to_string()));
        }
        self.conn.execute(
            "INSERT INTO mood_entries (session_id, mood, intensity) VALUES (?1, ?2, ?3)",
            params![session.map(|s| s.to_string()), mood.trim(), intensity],
        )?;
        Ok(())
    }

    /// Latest mood entries, most recent first.
    pub fn recent_moods(&self, limit: usize) -> Result<Vec<MoodEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT mood, intensity, recorded_at FROM mood_entries
             ORDER BY recorded_at DESC, id DESC LIMIT ?1",
        )?;
        stmt.query_map([limit as i64], |row| {
            Ok(MoodEntry {
                mood: row.get(0)?,
                intensity: row.get(1)?,
                timestamp: row.get(2)?,
            })
        })?
        .collect::<std::result::Result<_, _>>()
        .map_err(StoreError::from)
    }

    // --- Stats ---

    pub fn stats(&self) -> Result<StoreStats> {
        let count = |sql: &str| -> Result<u64> {
            let n: i64 = self.conn.query_row(sql, [], |row| row.get(0))?;
            Ok(n as u64)
        };
        Ok(StoreStats {
            sessions: count("SELECT COUNT(*) FROM sessions")?,
            open_sessions: count("SELECT COUNT(*) FROM sessions WHERE ended_at IS NULL")?,
            utterances: count("SELECT COUNT(*) FROM utterances")?,
            user_utterances: count("SELECT COUNT(*) FROM utterances WHERE sender = 'user'")?,
            mood_entries: count("SELECT COUNT(*) FROM mood_entries")?,
        })
    }
}

struct UtteranceRow {
    sender: String,
    text: String,
    sentiment_score: Option<f64>,
    sentiment_label: Option<String>,
    risk_level: u8,
}

fn read_utterance_row(row: &Row<'_>) -> rusqlite::Result<UtteranceRow> {
    Ok(UtteranceRow {
        sender: row.get(0)?,
        text: row.get(1)?,
        sentiment_score: row.get(2)?,
        sentiment_label: row.get(3)?,
        risk_level: row.get(4)?,
    })
}

impl UtteranceRow {
    fn into_utterance(self) -> Result<Utterance> {
        let sender = Sender::parse(&self.sender)
            .ok_or_else(|| StoreError::InvalidData(format!("unknown sender '{}'", self.sender)))?;
        let sentiment_label = match self.sentiment_label.as_deref() {
            Some(s) => Some(
                SentimentLabel::parse(s)
                    .ok_or_else(|| StoreError::InvalidData(format!("unknown label '{s}'")))?,
            ),
            None => None,
        };
        Ok(Utterance {
            sender,
            text: self.text,
            sentiment_score: self.sentiment_score,
            sentiment_label,
            risk_level: self.risk_level,
        })
    }
}

fn parse_uuid(s: &str) -> Result<Uuid> {
    Uuid::parse_str(s).map_err(|e| StoreError::InvalidData(format!("invalid UUID '{s}': {e}")))
}
