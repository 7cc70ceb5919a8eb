pub mod settings;

pub use settings::RulesyncConfig;
