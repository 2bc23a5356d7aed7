pub mod add;
pub mod config;
pub mod delete;
pub mod edit;
pub mod list;

use anyhow::Result;
use calboard_core::{CalboardConfig, JsonFileStore, Session};

/// A session over the on-disk user events, without holidays. Edits never
/// need them: holiday ids can't collide with user ids.
fn open_offline_session(config: &CalboardConfig) -> Session<JsonFileStore> {
    Session::offline(JsonFileStore::new(config.data_path()), config.filter_debounce())
}

fn load_config() -> Result<CalboardConfig> {
    Ok(CalboardConfig::load()?)
}
