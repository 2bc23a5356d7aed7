use anyhow::Result;
use calboard_core::{CalboardConfig, JsonFileStore};
use owo_colors::OwoColorize;

pub fn run(api_key: Option<String>, country: Option<String>, year: Option<i32>) -> Result<()> {
    let config_path = CalboardConfig::config_path()?;
    let mut config = super::load_config()?;

    let changed = api_key.is_some() || country.is_some() || year.is_some();
    if let Some(api_key) = api_key {
        config.holidays.api_key = Some(api_key);
    }
    if let Some(country) = country {
        config.holidays.country = country;
    }
    if let Some(year) = year {
        config.holidays.year = year;
    }
    if changed {
        config.save()?;
        println!("{}", "Saved config".green());
    }
    let store = JsonFileStore::new(config.data_path());

    println!("{}", "Paths".bold());
    println!("  Config:     {}", config_path.display());
    println!("  Events:     {}", store.path().display());

    println!("{}", "Holidays".bold());
    println!("  Endpoint:   {}", config.holidays.endpoint);
    println!("  Country:    {}", config.holidays.country);
    println!("  Year:       {}", config.holidays.year);
    println!(
        "  API key:    {}",
        if config.holidays.api_key.is_some() { "set" } else { "not set" }
    );

    Ok(())
}
