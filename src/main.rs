use anyhow::Result;
use chrono::Local;
use std::sync::Arc;
use tracing::{error, info, warn};

mod config;
mod error;
mod feed;
mod models;
mod parsers;
mod project;
mod refresh;
mod session;
mod sink;
mod state;
mod storage;
mod utils;
mod views;

use crate::config::Config;
use crate::feed::FeedClient;
use crate::models::{field, Sheet, FIELD_NAMA, FIELD_NIS, FIELD_STATUS, FIELD_TANGGAL};
use crate::state::PortalState;
use crate::storage::{CacheStore, SqliteCache};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("portal_siswa=info".parse()?),
        )
        .init();

    info!("Starting Portal Siswa");

    // Load configuration
    let config = Arc::new(Config::load()?);

    // Open the snapshot cache
    let cache: Arc<dyn CacheStore> =
        Arc::new(SqliteCache::new(&config.cache_path, config.cache_max_rows)?);
    cache.migrate().await?;

    // HTTP client and feed
    let client = utils::http::create_client(&config.user_agent)?;
    let feed = Arc::new(FeedClient::new(client, &config.feed_base_url)?);

    // Restore the last good snapshot so views work before the first fetch lands
    let state = Arc::new(match cache.load().await? {
        Some(snapshot) => {
            info!("Restored cached snapshot ({} sheets)", snapshot.tables.len());
            PortalState::new(snapshot)
        }
        None => PortalState::default(),
    });

    // Initial load; a roster failure is surfaced, cached data keeps serving
    match feed.fetch_snapshot(&config).await {
        Ok(snapshot) => {
            if let Err(err) = cache.save(&snapshot).await {
                warn!("Could not cache the snapshot: {}", err);
            }
            state.replace(snapshot);
        }
        Err(err) => error!("Initial load failed: {}", err),
    }

    // Resolve the active student: explicit PORTAL_NIS wins over the persisted one
    let active_nis = match std::env::var("PORTAL_NIS") {
        Ok(value) if !value.trim().is_empty() => Some(value),
        _ => cache.active_nis().await?,
    };

    match active_nis {
        Some(nis) => report_student(&state, cache.as_ref(), &nis).await,
        None => info!("No active NIS; set PORTAL_NIS to inspect a student"),
    }

    // Periodic refresh until Ctrl-C
    let refresher = refresh::spawn(feed, cache.clone(), state.clone(), config.clone());
    tokio::signal::ctrl_c().await?;
    info!("Shutting down");
    refresher.stopped().await;

    Ok(())
}

/// Log the dashboard summary for one student.
async fn report_student(state: &PortalState, cache: &dyn CacheStore, nis: &str) {
    let snapshot = state.snapshot();
    let roster = snapshot.table(Sheet::Siswa);

    let student = match session::resolve_student(roster, nis) {
        Ok(row) => row.clone(),
        Err(err) => {
            error!("{}", err);
            return;
        }
    };

    if let Err(err) = cache.set_active_nis(Some(nis)).await {
        warn!("Could not persist the active NIS: {}", err);
    }

    info!(
        "Active student: {} (NIS {})",
        field(&student, FIELD_NAMA),
        field(&student, FIELD_NIS)
    );
    for item in views::dashboard::student_profile(&student) {
        info!("  {}: {}", item.label, item.value);
    }

    // Today's schedule
    let today = Local::now().date_naive();
    let reguler_table = snapshot.table(Sheet::JadwalReguler);
    let tambahan_table = snapshot.table(Sheet::JadwalTambahan);
    let reguler_columns = views::schedule::schedule_columns(reguler_table);
    let tambahan_columns = views::schedule::schedule_columns(tambahan_table);
    let reguler_row = views::schedule::select_reguler_row(reguler_table, &student);
    let tambahan_row = views::schedule::select_tambahan_row(tambahan_table, &student);
    let today_entry = views::schedule::today_schedule(
        reguler_row.map(|row| (row, reguler_columns.as_slice())),
        tambahan_row.map(|row| (row, tambahan_columns.as_slice())),
        today,
    );
    match today_entry {
        Some(entry) => {
            let time = if entry.session.time.is_empty() {
                "jam belum ditentukan".to_string()
            } else {
                entry.session.time.clone()
            };
            info!("{} today: {} ({})", entry.label, entry.session.subject, time);
        }
        None => info!(
            "No schedule found for {}",
            parsers::date::format_date(today)
        ),
    }

    // Upcoming schedule strip
    if let Some(row) = reguler_row {
        let ordered = views::schedule::order_columns(&reguler_columns, today);
        for column in ordered.iter().take(3) {
            let sessions = views::schedule::sessions_for(row, column);
            if sessions.is_empty() {
                continue;
            }
            let status = match views::schedule::day_status(column, today) {
                views::schedule::DayStatus::Today => "hari ini",
                views::schedule::DayStatus::Past => "terlewat",
                views::schedule::DayStatus::Upcoming => "akan datang",
                views::schedule::DayStatus::Undated => "tanpa tanggal",
            };
            info!(
                "  {} ({}): {} session(s)",
                parsers::date::format_column_label(&column.date_label),
                status,
                sessions.len()
            );
        }
    }

    // Attendance history
    let presensi_rows = project::rows_for_student(snapshot.table(Sheet::Presensi), nis);
    let attendance = views::presensi::summarize(&presensi_rows);
    info!(
        "Attendance: {} records (hadir {}, sakit {}, izin {}, alpha {}, mostly {})",
        attendance.total(),
        attendance.hadir,
        attendance.sakit,
        attendance.izin,
        attendance.alpha,
        attendance.most()
    );
    if let Some(latest) = presensi_rows.first() {
        info!(
            "Latest attendance: {} on {}",
            field(latest, FIELD_STATUS),
            field(latest, FIELD_TANGGAL)
        );
    }

    // Score history across every score sheet
    let nilai_rows = project::rows_for_student(&snapshot.nilai_merged(), nis);
    match views::nilai::summarize(&nilai_rows) {
        Some(scores) => info!(
            "Scores: {} tests, average {:.1} (best {:.1}, worst {:.1})",
            scores.count, scores.average, scores.highest, scores.lowest
        ),
        None => info!("Scores: no test results yet"),
    }
    for dataset in views::nilai::datasets(&snapshot, nis) {
        if !dataset.rows.is_empty() {
            info!("  {}: {} result(s)", dataset.label, dataset.rows.len());
        }
    }

    // Service history
    let pelayanan_rows = project::rows_for_student(snapshot.table(Sheet::Pelayanan), nis);
    let services = views::pelayanan::summarize(&pelayanan_rows);
    if services.total > 0 {
        info!("Services: {} sessions, mostly {}", services.total, services.top());
    }

    // Teacher roster coverage
    let subjects = project::unique_values(
        &snapshot.table(Sheet::Pengajar).rows,
        models::FIELD_MAPEL,
    );
    if !subjects.is_empty() {
        info!("Teacher roster covers {} subject(s)", subjects.len());
    }

    // Latest record cards
    let latest = views::dashboard::latest_records(&snapshot, nis);
    if let Some(row) = &latest.perkembangan {
        info!("Latest progress note: {}", field(row, FIELD_TANGGAL));
    }
    if let Some(row) = &latest.permintaan {
        info!(
            "Latest service request: {} ({})",
            field(row, "Keperluan"),
            field(row, FIELD_STATUS)
        );
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use wiremock::matchers::{method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::config::{SheetSource, WireShape};

    // Full path through the portal: fetch the batch, pass the identifier
    // gate with a differently formatted NIS, read the attendance history.
    #[tokio::test]
    async fn login_and_attendance_history_end_to_end() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("sheet", "Siswa"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string("Nis,Nama\n07-01,Budi\n"),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(query_param("sheet", "Presensi"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                "Nis,Tanggal,Status\n0701,2024-01-01,Hadir\n0701,2024-02-01,Izin\n",
            ))
            .mount(&server)
            .await;

        let mut cfg = Config::defaults();
        cfg.feed_base_url = server.uri();
        cfg.sheets = HashMap::from([
            (
                Sheet::Siswa.key().to_string(),
                SheetSource {
                    collection: "roster".to_string(),
                    sheet: "Siswa".to_string(),
                    shape: WireShape::Csv,
                },
            ),
            (
                Sheet::Presensi.key().to_string(),
                SheetSource {
                    collection: "records".to_string(),
                    sheet: "Presensi".to_string(),
                    shape: WireShape::Csv,
                },
            ),
        ]);

        let client = utils::http::create_client(&cfg.user_agent).unwrap();
        let feed = FeedClient::new(client, &cfg.feed_base_url).unwrap();
        let snapshot = feed.fetch_snapshot(&cfg).await.unwrap();

        let student = session::resolve_student(snapshot.table(Sheet::Siswa), "07-01").unwrap();
        assert_eq!(field(student, FIELD_NAMA), "Budi");

        let history =
            project::rows_for_student(snapshot.table(Sheet::Presensi), "07-01");
        assert_eq!(history.len(), 2);
        assert_eq!(field(&history[0], FIELD_TANGGAL), "2024-02-01");
        assert_eq!(field(&history[1], FIELD_TANGGAL), "2024-01-01");
    }
}
