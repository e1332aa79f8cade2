use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension, Row};
use serde::Serialize;

use crate::db::{
    helpers::{
        format_timestamp, from_json, parse_datetime, parse_media_kind, to_i64, to_json, to_u32,
    },
    models::AnalysisRecord,
    Database,
};
use crate::fingerprint::Fingerprint;
use crate::metrics::{summarize_history, HistoryStats};
use crate::{log_debug, log_info};

const ENABLE_LOGS: bool = true;

const SELECT_COLUMNS: &str = "SELECT id, fingerprint, display_name, file_name, media_kind, created_at,
        confidence, catalog_version, pose_json, angles_json, findings_json, recommendations_json,
        exercises_json
 FROM analyses";

const NEWEST_FIRST: &str = "ORDER BY created_at DESC, seq DESC";

/// What a `store` call displaced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreOutcome {
    /// An earlier record with the same fingerprint was overwritten.
    pub replaced: bool,
    /// Oldest records dropped to stay within the history cap.
    pub evicted: usize,
}

fn row_to_record(row: &Row) -> Result<AnalysisRecord> {
    let created_at: String = row.get("created_at")?;
    let media_kind: String = row.get("media_kind")?;
    let catalog_version: i64 = row.get("catalog_version")?;
    let pose_json: String = row.get("pose_json")?;
    let angles_json: String = row.get("angles_json")?;
    let findings_json: String = row.get("findings_json")?;
    let recommendations_json: String = row.get("recommendations_json")?;
    let exercises_json: String = row.get("exercises_json")?;

    Ok(AnalysisRecord {
        id: row.get("id")?,
        fingerprint: Fingerprint::from_stored(row.get("fingerprint")?),
        display_name: row.get("display_name")?,
        file_name: row.get("file_name")?,
        media_kind: parse_media_kind(&media_kind)?,
        created_at: parse_datetime(&created_at, "created_at")?,
        confidence: row.get("confidence")?,
        catalog_version: to_u32(catalog_version, "catalog_version")?,
        pose: from_json(&pose_json, "pose_json")?,
        angles: from_json(&angles_json, "angles_json")?,
        findings: from_json(&findings_json, "findings_json")?,
        recommendations: from_json(&recommendations_json, "recommendations_json")?,
        exercises: from_json(&exercises_json, "exercises_json")?,
    })
}

fn collect_records(rows: &mut rusqlite::Rows<'_>) -> Result<Vec<AnalysisRecord>> {
    let mut records = Vec::new();
    while let Some(row) = rows.next()? {
        records.push(row_to_record(row)?);
    }
    Ok(records)
}

fn matches_query(record: &AnalysisRecord, needle: &str) -> bool {
    record.display_name.to_lowercase().contains(needle)
        || record.file_name.to_lowercase().contains(needle)
}

impl Database {
    pub async fn lookup(&self, fingerprint: &Fingerprint) -> Result<Option<AnalysisRecord>> {
        let fingerprint = fingerprint.as_str().to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} WHERE fingerprint = ?1"))?;
            stmt.query_row(params![fingerprint], |row| Ok(row_to_record(row)))
                .optional()
                .context("failed to look up analysis by fingerprint")?
                .transpose()
        })
        .await
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Option<AnalysisRecord>> {
        let id = id.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} WHERE id = ?1"))?;
            stmt.query_row(params![id], |row| Ok(row_to_record(row)))
                .optional()
                .context("failed to load analysis")?
                .transpose()
        })
        .await
    }

    /// Writes `record`, replacing any record with the same fingerprint, then
    /// trims the history to the cap. All of it commits or none of it does.
    pub async fn store(&self, record: &AnalysisRecord) -> Result<StoreOutcome> {
        let record = record.clone();
        let cap = to_i64(self.history_cap() as u64)?;

        let outcome = self
            .execute(move |conn| {
                let pose_json = to_json(&record.pose, "pose")?;
                let angles_json = to_json(&record.angles, "angles")?;
                let findings_json = to_json(&record.findings, "findings")?;
                let recommendations_json = to_json(&record.recommendations, "recommendations")?;
                let exercises_json = to_json(&record.exercises, "exercises")?;

                let tx = conn
                    .transaction()
                    .context("failed to open store transaction")?;

                let replaced = tx.execute(
                    "DELETE FROM analyses WHERE fingerprint = ?1",
                    params![record.fingerprint.as_str()],
                )? > 0;

                tx.execute(
                    "INSERT INTO analyses (id, fingerprint, display_name, file_name, media_kind, created_at,
                        confidence, catalog_version, pose_json, angles_json, findings_json, recommendations_json,
                        exercises_json)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
                    params![
                        record.id,
                        record.fingerprint.as_str(),
                        record.display_name,
                        record.file_name,
                        record.media_kind.mime_type(),
                        format_timestamp(&record.created_at),
                        record.confidence,
                        i64::from(record.catalog_version),
                        pose_json,
                        angles_json,
                        findings_json,
                        recommendations_json,
                        exercises_json,
                    ],
                )
                .context("failed to insert analysis")?;

                let evicted = tx
                    .execute(
                        &format!(
                            "DELETE FROM analyses WHERE seq IN (
                                 SELECT seq FROM analyses {NEWEST_FIRST} LIMIT -1 OFFSET ?1
                             )"
                        ),
                        params![cap],
                    )
                    .context("failed to evict old analyses")?;

                tx.commit().context("failed to commit analysis")?;
                Ok(StoreOutcome { replaced, evicted })
            })
            .await?;

        if outcome.replaced {
            log_debug!("Replaced earlier analysis with the same fingerprint");
        }
        if outcome.evicted > 0 {
            log_info!("Evicted {} analyses beyond the history cap", outcome.evicted);
        }
        Ok(outcome)
    }

    pub async fn list_recent(&self, limit: usize) -> Result<Vec<AnalysisRecord>> {
        let limit = to_i64(limit as u64)?;
        self.execute(move |conn| {
            let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} {NEWEST_FIRST} LIMIT ?1"))?;
            let mut rows = stmt.query(params![limit])?;
            collect_records(&mut rows)
        })
        .await
    }

    pub async fn list_all(&self) -> Result<Vec<AnalysisRecord>> {
        self.execute(|conn| {
            let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} {NEWEST_FIRST}"))?;
            let mut rows = stmt.query([])?;
            collect_records(&mut rows)
        })
        .await
    }

    /// Returns false when no record had this id.
    pub async fn delete_by_id(&self, id: &str) -> Result<bool> {
        let id = id.to_string();
        self.execute(move |conn| {
            let deleted = conn
                .execute("DELETE FROM analyses WHERE id = ?1", params![id])
                .context("failed to delete analysis")?;
            Ok(deleted > 0)
        })
        .await
    }

    /// Case-insensitive substring match on display name or file name, newest
    /// first. An empty query matches everything.
    pub async fn search_by_text(&self, query: &str) -> Result<Vec<AnalysisRecord>> {
        let needle = query.to_lowercase();
        let records = self.list_all().await?;
        Ok(records
            .into_iter()
            .filter(|record| matches_query(record, &needle))
            .collect())
    }

    pub async fn count(&self) -> Result<usize> {
        self.execute(|conn| {
            let count: i64 = conn.query_row("SELECT COUNT(*) FROM analyses", [], |row| row.get(0))?;
            Ok(usize::try_from(count).unwrap_or(0))
        })
        .await
    }

    pub async fn history_stats(&self, now: DateTime<Utc>) -> Result<HistoryStats> {
        let records = self.list_all().await?;
        Ok(summarize_history(&records, now))
    }
}
