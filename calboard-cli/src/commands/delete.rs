use anyhow::Result;
use dialoguer::Confirm;
use owo_colors::OwoColorize;

use crate::render::Render;

pub fn run(id: &str, force: bool) -> Result<()> {
    let config = super::load_config()?;
    let mut session = super::open_offline_session(&config);

    if !session.click_event(id) {
        anyhow::bail!("No event of yours with id '{}'", id);
    }

    if let Some(event) = session.repository().get(id) {
        println!("{}", event.render());
    }

    // Confirm unless --force
    if !force {
        let confirmed = Confirm::new()
            .with_prompt("Delete this event?")
            .default(false)
            .interact()?;

        if !confirmed {
            session.cancel();
            return Ok(());
        }
    }

    if session.delete_selected()?.is_some() {
        println!("{}", "Deleted".red());
    }

    Ok(())
}
