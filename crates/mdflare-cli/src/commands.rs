pub mod contacts;
pub mod flare;
