use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyEventKind};

use crate::clock;
use crate::ctx::Ctx;
use crate::tui::{app::App, ui};

pub fn execute(ctx: &Ctx) -> anyhow::Result<()> {
    let now = clock::now_ms();
    let session = ctx.session(now)?;
    let mut app = App::new(session, now);

    let mut terminal = ratatui::init();
    let result = run(&mut terminal, &mut app);
    ratatui::restore();

    result
}

fn run<S: fastlog_store::LogStorage>(
    terminal: &mut ratatui::DefaultTerminal,
    app: &mut App<S>,
) -> anyhow::Result<()> {
    let interval = Duration::from_secs(1);
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|f| ui::render(f, app))?;

        if event::poll(Duration::from_millis(250))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    app.on_tick(clock::now_ms());
                    app.handle_key(key);
                }
                _ => {}
            }
        }

        if last_tick.elapsed() >= interval {
            app.on_tick(clock::now_ms());
            last_tick = Instant::now();
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
