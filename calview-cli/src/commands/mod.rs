pub mod agenda;
pub mod settings;
