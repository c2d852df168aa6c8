//! Binary entry point: resolve where the data lives, start logging, make sure
//! the schema exists, then hand control to the terminal UI until the user quits.
use reading_club::{logging, run_app, App, Club, Config, Store, VaderScorer};

fn main() -> anyhow::Result<()> {
    let config = Config::from_home()?;
    logging::init(&config)?;
    tracing::info!(data_dir = %config.data_dir.display(), "reading club starting");

    let club = Club::new(Store::new(&config.db_path), VaderScorer);
    club.ensure_schema()?;

    let mut app = App::new(club);
    let result = run_app(&mut app);
    match &result {
        Ok(()) => tracing::info!("reading club closed"),
        Err(err) => tracing::error!(error = %format!("{err:#}"), "reading club stopped"),
    }
    result
}
