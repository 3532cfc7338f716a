//! Tundeck entry point.
//!
//! Parses CLI arguments, spawns the tunnel service worker, and runs the
//! terminal UI loop until the user quits.

mod app;
mod cli;
mod constants;
mod event;
mod service;
mod session;
mod state;
mod store;
mod theme;
mod ui;
mod utils;

use clap::Parser;
use color_eyre::Result;

use crate::app::App;
use crate::cli::args::Args;
use crate::event::{Event, EventHandler};
use crate::service::backend::WgQuickBackend;
use crate::service::platform::{Platform, SystemPlatform};
use crate::service::TunnelService;
use crate::session::SessionController;

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    if let Some(command) = &args.command {
        return cli::commands::run(command);
    }

    let platform = SystemPlatform::new()?;
    let permission_granted = platform.is_permission_granted();
    let (commands, status_rx) = TunnelService::spawn(Box::new(platform), Box::new(WgQuickBackend));

    let profiles = store::load_profiles();
    let controller = SessionController::new(profiles, commands, permission_granted);
    let mut app = App::new(controller, status_rx);

    let mut terminal = ratatui::init();
    let events = EventHandler::new(args.tick_rate);

    let result = run(&mut terminal, &mut app, &events);
    ratatui::restore();
    result
}

fn run(
    terminal: &mut ratatui::DefaultTerminal,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| ui::render(frame, app))?;

        match events.next()? {
            Event::Key(key) => app.handle_key(key),
            Event::Tick => app.on_tick(),
            Event::Resize(_, _) => {}
        }
    }
    Ok(())
}
