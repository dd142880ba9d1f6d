pub mod sheet;
pub mod table;

pub use sheet::*;
pub use table::*;

// Canonical field names shared by the sheets. Actual header casing varies per
// sheet, so every lookup goes through the match-key comparison.
pub const FIELD_NIS: &str = "Nis";
pub const FIELD_NAMA: &str = "Nama";
pub const FIELD_TANGGAL: &str = "Tanggal";
pub const FIELD_TIMESTAMP: &str = "Timestamp";
pub const FIELD_CABANG: &str = "Cabang";
pub const FIELD_KELOMPOK_KELAS: &str = "Kelompok Kelas";
pub const FIELD_ASAL_SEKOLAH: &str = "Asal Sekolah";
pub const FIELD_MAPEL: &str = "Mata Pelajaran";
pub const FIELD_PENGAJAR: &str = "Pengajar";
pub const FIELD_STATUS: &str = "Status";
pub const FIELD_RERATA: &str = "Rerata";
