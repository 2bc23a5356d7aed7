use anyhow::Result;
use owo_colors::OwoColorize;

use crate::render::Render;

pub fn run(
    id: &str,
    title: Option<String>,
    start: Option<String>,
    end: Option<String>,
) -> Result<()> {
    let config = super::load_config()?;
    let mut session = super::open_offline_session(&config);

    if !session.click_event(id) {
        anyhow::bail!("No event of yours with id '{}'", id);
    }

    let selection = session.selection_mut();
    if let Some(title) = title {
        selection.set_title(title);
    }
    if let Some(start) = start {
        selection.set_start(start);
    }
    if let Some(end) = end {
        selection.set_end(end);
    }

    if let Some(event) = session.commit()? {
        println!("{}", "Updated:".yellow());
        println!("{}", event.render());
    }

    Ok(())
}
