pub mod dashboard;
pub mod nilai;
pub mod pelayanan;
pub mod pengajar;
pub mod presensi;
pub mod schedule;
