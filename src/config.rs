use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::Sheet;

/// Wire shape a sheet is fetched in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WireShape {
    Csv,
    Gviz,
}

/// Address of one sheet: the spreadsheet collection plus the tab name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetSource {
    pub collection: String,
    pub sheet: String,
    pub shape: WireShape,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub feed_base_url: String,
    pub sink_url: String,
    pub refresh_interval_seconds: u64,
    pub cache_path: String,
    pub cache_max_rows: usize,
    pub user_agent: String,
    pub sheets: HashMap<String, SheetSource>,
}

const BIODATA_COLLECTION: &str = "1qN1MJ7kVRbSnsV9-WblGikHmCTzLZOTezmuUBgrZ3-k";
const JADWAL_COLLECTION: &str = "1DSon0f5M1PeMAE_xeHVWLDlmVTDQM_Vr1RuCdcCYQB0";
const PRESENSI_COLLECTION: &str = "13oDDldQdcVBg5ai3nS9oGtYuq8ijWsloNRmXK87IHnw";
const PERKEMBANGAN_COLLECTION: &str = "1fZmtYB5nPslds7pjQ6sIDHfVYTf_wg1KeTXbmKeUBMw";
const NILAI_COLLECTION: &str = "1yb_UoQKe3tgbbTmnfYUFQiNQLe9NGdWsE-fzVLGthmw";
const PELAYANAN_COLLECTION: &str = "1KcsMCeFmGAmwKHFqnIxiUxDmLDpR6YDBZBd8Zbd-s6w";
const PENGAJAR_COLLECTION: &str = "1PQNdVQUJa-YQaWv-KZdIC7WE3VVlRAxpX5XT79NMJos";

impl Config {
    /// Built-in defaults, overridable through `portal.toml` and `PORTAL_*`
    /// environment variables.
    pub fn load() -> Result<Self> {
        let mut cfg = Self::defaults();

        let overrides = config::Config::builder()
            .add_source(config::File::with_name("portal").required(false))
            .add_source(config::Environment::with_prefix("PORTAL"))
            .build()?;

        if let Ok(value) = overrides.get_string("feed_base_url") {
            cfg.feed_base_url = value;
        }
        if let Ok(value) = overrides.get_string("sink_url") {
            cfg.sink_url = value;
        }
        if let Ok(value) = overrides.get_int("refresh_interval_seconds") {
            cfg.refresh_interval_seconds = value.max(1) as u64;
        }
        if let Ok(value) = overrides.get_string("cache_path") {
            cfg.cache_path = value;
        }
        if let Ok(value) = overrides.get_int("cache_max_rows") {
            cfg.cache_max_rows = value.max(0) as usize;
        }

        Ok(cfg)
    }

    pub fn source(&self, sheet: Sheet) -> Option<&SheetSource> {
        self.sheets.get(sheet.key())
    }

    pub fn defaults() -> Self {
        let mut sheets = HashMap::new();

        let mut add = |sheet: Sheet, collection: &str, name: &str, shape: WireShape| {
            sheets.insert(
                sheet.key().to_string(),
                SheetSource {
                    collection: collection.to_string(),
                    sheet: name.to_string(),
                    shape,
                },
            );
        };

        add(Sheet::Siswa, BIODATA_COLLECTION, "Siswa", WireShape::Csv);
        add(
            Sheet::JadwalReguler,
            JADWAL_COLLECTION,
            "Jadwal_Siswa",
            WireShape::Csv,
        );
        add(
            Sheet::JadwalTambahan,
            JADWAL_COLLECTION,
            "Jadwal_Tambahan",
            WireShape::Csv,
        );
        add(
            Sheet::Presensi,
            PRESENSI_COLLECTION,
            "Presensi",
            WireShape::Csv,
        );
        add(
            Sheet::Perkembangan,
            PERKEMBANGAN_COLLECTION,
            "Perkembangan",
            WireShape::Csv,
        );
        add(Sheet::NilaiUtbk, NILAI_COLLECTION, "Nilai UTBK", WireShape::Csv);
        add(
            Sheet::NilaiTkaSma,
            NILAI_COLLECTION,
            "Nilai TKA SMA",
            WireShape::Csv,
        );
        add(
            Sheet::NilaiTkaSmp,
            NILAI_COLLECTION,
            "Nilai TKA SMP",
            WireShape::Csv,
        );
        add(
            Sheet::NilaiTkaSd,
            NILAI_COLLECTION,
            "Nilai TKA SD",
            WireShape::Csv,
        );
        add(
            Sheet::NilaiStandar,
            NILAI_COLLECTION,
            "Nilai TES STANDAR",
            WireShape::Csv,
        );
        add(
            Sheet::NilaiEvaluasi,
            NILAI_COLLECTION,
            "Nilai EVALUASI",
            WireShape::Csv,
        );
        add(
            Sheet::Pelayanan,
            PELAYANAN_COLLECTION,
            "Pelayanan",
            WireShape::Csv,
        );
        // The teacher roster publishes reliable column labels only through the
        // JSON export, so it uses the gviz shape.
        add(
            Sheet::Pengajar,
            PENGAJAR_COLLECTION,
            "Pengajar",
            WireShape::Gviz,
        );
        add(
            Sheet::WaPengajar,
            PENGAJAR_COLLECTION,
            "Wa_Pengajar",
            WireShape::Csv,
        );
        add(
            Sheet::Permintaan,
            PENGAJAR_COLLECTION,
            "Permintaan",
            WireShape::Csv,
        );

        Config {
            feed_base_url: "https://docs.google.com".to_string(),
            sink_url: "https://script.google.com/macros/s/AKfycbxMiNKXauDC71UAmo8b6xMgRGuZfaKiJmbXwG8-dq96IWZGf0vUCBiDs8v0z8kxun6q/exec".to_string(),
            refresh_interval_seconds: 600,
            cache_path: "portal_siswa.db".to_string(),
            cache_max_rows: 200,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/108.0.0.0 Safari/537.36".to_string(),
            sheets,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_every_sheet() {
        let cfg = Config::defaults();
        for sheet in Sheet::ALL {
            assert!(cfg.source(sheet).is_some(), "missing source for {:?}", sheet);
        }
        assert!(cfg.refresh_interval_seconds > 0);
        assert!(cfg.cache_max_rows > 0);
    }
}
