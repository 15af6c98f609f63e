//! Terminal swatch client for the palette service.

pub mod api;
pub mod app;
pub mod clipboard;
pub mod terminal;
pub mod ui;

use std::io;
use std::time::Duration;

use color_eyre::Result;
use crossterm::event::{Event, EventStream, KeyEventKind};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;

pub use api::{ClientError, PaletteApiClient};
pub use app::{Action, App, ClientState};
pub use clipboard::SwatchClipboard;

use crate::palette::Palette;

const TICK: Duration = Duration::from_millis(100);

/// Take over the terminal, run the client until the user quits, then restore it.
pub async fn run(api: PaletteApiClient) -> Result<()> {
    terminal::setup_panic_hook();

    let mut stdout = io::stdout();
    terminal::enter_tui_mode(&mut stdout)?;
    let mut tui = Terminal::new(CrosstermBackend::new(stdout))?;

    let result = run_loop(&mut tui, api).await;

    terminal::leave_tui_mode(tui.backend_mut());
    result
}

async fn run_loop(
    tui: &mut Terminal<CrosstermBackend<io::Stdout>>,
    api: PaletteApiClient,
) -> Result<()> {
    let mut app = App::new();
    let mut clipboard = SwatchClipboard::new();
    let mut events = EventStream::new();
    let (result_tx, mut result_rx) = mpsc::unbounded_channel::<Result<Palette, ClientError>>();
    let mut ticker = tokio::time::interval(TICK);

    while !app.should_quit {
        tui.draw(|f| ui::render(f, &mut app))?;

        let action = tokio::select! {
            _ = ticker.tick() => {
                app.tick();
                Action::None
            }

            Some(result) = result_rx.recv() => {
                if let Err(e) = &result {
                    tracing::warn!("Palette request failed: {:?}", e);
                }
                app.finish_request(result);
                Action::None
            }

            event = events.next() => match event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => app.handle_key(key),
                Some(Ok(Event::Mouse(mouse))) => app.handle_mouse(mouse),
                Some(Ok(_)) => Action::None,
                Some(Err(e)) => return Err(e.into()),
                None => Action::Quit,
            },
        };

        match action {
            Action::None => {}
            Action::Quit => app.should_quit = true,
            Action::Submit(prompt) => {
                let api = api.clone();
                let tx = result_tx.clone();
                tokio::spawn(async move {
                    tracing::info!(endpoint = %api.endpoint(), "Requesting palette");
                    let _ = tx.send(api.fetch_palette(&prompt).await);
                });
            }
            Action::Copy(css) => match clipboard.copy_text(&css) {
                Ok(()) => app.mark_copied(app.selected),
                Err(e) => tracing::warn!("Copy failed: {}", e),
            },
        }
    }

    Ok(())
}
