use std::time::Duration;

use anyhow::Result;
use calboard_core::{HolidaySource, JsonFileStore, Session};
use owo_colors::OwoColorize;

use crate::render::print_agenda;
use crate::utils::tui;

pub async fn run(filter: Option<String>, offline: bool) -> Result<()> {
    let config = super::load_config()?;

    let mut session = if offline {
        super::open_offline_session(&config)
    } else {
        let source = HolidaySource::new(config.holidays.clone())?;
        let store = JsonFileStore::new(config.data_path());
        let mut session = Session::start(store, source, config.filter_debounce());

        let spinner = tui::create_spinner(format!(
            "Fetching {} holidays for {}",
            config.holidays.country, config.holidays.year
        ));
        // The client times out on its own; the extra second covers connection setup.
        let limit = Duration::from_secs(config.holidays.timeout_secs + 1);
        session.wait_for_global(limit).await;
        spinner.finish_and_clear();

        session
    };

    if let Some(query) = filter {
        session.set_query(query);
    }

    print_agenda(session.visible());

    let repo = session.repository();
    if !offline && repo.global().is_empty() {
        println!(
            "\n{}",
            "No holidays loaded (run with -v for details)".dimmed()
        );
    }

    Ok(())
}
