pub mod core;
pub mod settings;

pub use crate::{
    core::LitrevError,
    settings::{
        api::{
            SettingsClient,
            SettingsSession,
        },
        Data,
        Dedupe,
        Prep,
        PrepRound,
        Prescreen,
        Project,
        Script,
        Settings,
        Source,
    },
};
