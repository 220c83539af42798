pub mod commit;
pub mod comparison;
pub mod import;
pub mod suspect;
