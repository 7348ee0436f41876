use anyhow::Result;
use chrono::Local;
use clap::Parser;
use tracing::info;

use shiftplan::app::App;
use shiftplan::cli::{self, Cli};
use shiftplan::session::Session;
use shiftplan::{event, logging, tui};

fn main() -> Result<()> {
    let cli_opts = Cli::parse();
    let config = cli_opts.config();

    if let Some(command) = cli_opts.command {
        logging::init_stderr()?;
        let mut session = Session::open(&config);
        return cli::run(command, &mut session);
    }

    logging::init_file(&logging::default_log_path())?;
    let session = Session::open(&config);
    info!(source = %session.describe(), "starting terminal ui");
    let mut app = App::new(session, Local::now().date_naive());
    let mut terminal = tui::init()?;
    let result = event::run(&mut app, &mut terminal);

    tui::restore()?;

    result
}
