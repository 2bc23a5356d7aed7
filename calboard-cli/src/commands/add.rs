use anyhow::Result;
use owo_colors::OwoColorize;

use crate::render::Render;

pub fn run(title: String, start: String, end: String) -> Result<()> {
    let config = super::load_config()?;
    let mut session = super::open_offline_session(&config);

    session.begin_add();
    let selection = session.selection_mut();
    selection.set_title(title);
    selection.set_start(start);
    selection.set_end(end);

    match session.commit()? {
        Some(event) => {
            println!("{}", "Added:".green());
            println!("{}", event.render());
        }
        None => anyhow::bail!("Nothing to add"),
    }

    Ok(())
}
