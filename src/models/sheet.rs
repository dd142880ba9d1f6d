use serde::{Deserialize, Serialize};

/// Every sheet the portal reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Sheet {
    Siswa,
    JadwalReguler,
    JadwalTambahan,
    Presensi,
    Perkembangan,
    NilaiUtbk,
    NilaiTkaSma,
    NilaiTkaSmp,
    NilaiTkaSd,
    NilaiStandar,
    NilaiEvaluasi,
    Pelayanan,
    Pengajar,
    WaPengajar,
    Permintaan,
}

impl Sheet {
    pub const ALL: [Sheet; 15] = [
        Sheet::Siswa,
        Sheet::JadwalReguler,
        Sheet::JadwalTambahan,
        Sheet::Presensi,
        Sheet::Perkembangan,
        Sheet::NilaiUtbk,
        Sheet::NilaiTkaSma,
        Sheet::NilaiTkaSmp,
        Sheet::NilaiTkaSd,
        Sheet::NilaiStandar,
        Sheet::NilaiEvaluasi,
        Sheet::Pelayanan,
        Sheet::Pengajar,
        Sheet::WaPengajar,
        Sheet::Permintaan,
    ];

    /// The score sheets merged for the combined score history view.
    pub const NILAI: [Sheet; 6] = [
        Sheet::NilaiUtbk,
        Sheet::NilaiTkaSma,
        Sheet::NilaiTkaSmp,
        Sheet::NilaiTkaSd,
        Sheet::NilaiStandar,
        Sheet::NilaiEvaluasi,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Sheet::Siswa => "siswa",
            Sheet::JadwalReguler => "jadwal_reguler",
            Sheet::JadwalTambahan => "jadwal_tambahan",
            Sheet::Presensi => "presensi",
            Sheet::Perkembangan => "perkembangan",
            Sheet::NilaiUtbk => "nilai_utbk",
            Sheet::NilaiTkaSma => "nilai_tka_sma",
            Sheet::NilaiTkaSmp => "nilai_tka_smp",
            Sheet::NilaiTkaSd => "nilai_tka_sd",
            Sheet::NilaiStandar => "nilai_standar",
            Sheet::NilaiEvaluasi => "nilai_evaluasi",
            Sheet::Pelayanan => "pelayanan",
            Sheet::Pengajar => "pengajar",
            Sheet::WaPengajar => "wa_pengajar",
            Sheet::Permintaan => "permintaan",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Sheet::ALL.into_iter().find(|sheet| sheet.key() == key)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Sheet::Siswa => "Data Siswa",
            Sheet::JadwalReguler => "Jadwal Reguler",
            Sheet::JadwalTambahan => "Jadwal Tambahan",
            Sheet::Presensi => "Riwayat Presensi",
            Sheet::Perkembangan => "Perkembangan Belajar",
            Sheet::NilaiUtbk => "Nilai UTBK",
            Sheet::NilaiTkaSma => "Nilai TKA SMA",
            Sheet::NilaiTkaSmp => "Nilai TKA SMP",
            Sheet::NilaiTkaSd => "Nilai TKA SD",
            Sheet::NilaiStandar => "Nilai Tes Standar",
            Sheet::NilaiEvaluasi => "Nilai Evaluasi",
            Sheet::Pelayanan => "Pelayanan",
            Sheet::Pengajar => "Pengajar",
            Sheet::WaPengajar => "WhatsApp Pengajar",
            Sheet::Permintaan => "Permintaan",
        }
    }

    /// The roster is the only sheet whose failure fails a whole load.
    pub fn is_critical(&self) -> bool {
        matches!(self, Sheet::Siswa)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_round_trip() {
        for sheet in Sheet::ALL {
            assert_eq!(Sheet::from_key(sheet.key()), Some(sheet));
        }
        assert_eq!(Sheet::from_key("unknown"), None);
    }

    #[test]
    fn only_the_roster_is_critical() {
        assert!(Sheet::Siswa.is_critical());
        assert!(Sheet::ALL.iter().filter(|s| s.is_critical()).count() == 1);
    }
}
