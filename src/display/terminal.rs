use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use std::io::{self, stdout};
use std::time::{Duration, Instant};
use tracing::info;

use crate::color::next_palette_name;
use crate::composite::composite_over_background;
use crate::config::{Config, MeshParams, MAX_POINTS, MIN_POINTS};
use crate::frame::FrameDriver;
use crate::mesh::{MeshInstance, BLUR_MAX, BLUR_MIN};

pub async fn run(config: Config) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, config).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, config: Config) -> Result<()> {
    let mut driver = FrameDriver::register(MeshInstance::new(config.mesh.clone()));

    let handle = driver.handle();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        handle.cancel();
    });

    let frame_duration = Duration::from_secs_f64(1.0 / config.display.fps.max(1) as f64);
    let started = Instant::now();

    info!("Terminal preview started: {}", status_line(driver.callback().params()));

    while !driver.is_cancelled() {
        let frame_start = Instant::now();
        driver.tick(started.elapsed().as_secs_f64() * 1000.0);

        terminal.draw(|frame| {
            let area = frame.area();
            draw_mesh(frame, area, driver.callback());
            if config.display.show_status {
                draw_status(frame, area, driver.callback().params());
            }
        })?;

        let timeout = frame_duration.saturating_sub(frame_start.elapsed());
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match handle_key(key, driver.callback().params()) {
                    KeyAction::Quit => driver.cancel(),
                    KeyAction::Update(params) => {
                        info!("Parameters changed: {}", status_line(&params));
                        driver.callback_mut().update_params(*params);
                    }
                    KeyAction::Ignore => {}
                }
            }
        }
    }

    Ok(())
}

enum KeyAction {
    Quit,
    Update(Box<MeshParams>),
    Ignore,
}

fn handle_key(key: KeyEvent, current: &MeshParams) -> KeyAction {
    let mut next = current.clone();
    match (key.code, key.modifiers) {
        (KeyCode::Char('q'), _) | (KeyCode::Esc, _) => return KeyAction::Quit,
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => return KeyAction::Quit,
        (KeyCode::Char('n'), _) => next.seed = next.seed.wrapping_add(1).max(1),
        (KeyCode::Char('N'), _) => next.seed = next.seed.saturating_sub(1).max(1),
        (KeyCode::Char('r'), _) => next.seed = crate::config::random_seed(),
        (KeyCode::Char('a'), _) => next.animation = next.animation.next(),
        (KeyCode::Char('p'), _) => next.palette = next_palette_name(&next.palette).to_string(),
        (KeyCode::Char('+'), _) | (KeyCode::Char('='), _) => {
            next.blur = (next.blur + 10.0).min(BLUR_MAX)
        }
        (KeyCode::Char('-'), _) => next.blur = (next.blur - 10.0).max(BLUR_MIN),
        (KeyCode::Char(']'), _) => next.points = (next.points + 1).min(MAX_POINTS),
        (KeyCode::Char('['), _) => next.points = next.points.saturating_sub(1).max(MIN_POINTS),
        _ => return KeyAction::Ignore,
    }
    KeyAction::Update(Box::new(next))
}

/// Upscale the mesh to two pixel rows per cell and draw it with upper-half blocks.
fn draw_mesh(frame: &mut Frame, area: Rect, mesh: &MeshInstance) {
    if area.width == 0 || area.height == 0 {
        return;
    }

    let params = mesh.params();
    let mut image = mesh
        .canvas()
        .upscale(area.width as u32, area.height as u32 * 2);
    composite_over_background(&mut image, params.bg, params.blend, params.opacity);

    let buffer = frame.buffer_mut();
    for row in 0..area.height {
        for col in 0..area.width {
            let top = image.get_pixel(col as u32, row as u32 * 2).0;
            let bottom = image.get_pixel(col as u32, row as u32 * 2 + 1).0;
            if let Some(cell) = buffer.cell_mut((area.x + col, area.y + row)) {
                cell.set_char('▀');
                cell.set_fg(Color::Rgb(top[0], top[1], top[2]));
                cell.set_bg(Color::Rgb(bottom[0], bottom[1], bottom[2]));
            }
        }
    }
}

fn status_line(params: &MeshParams) -> String {
    format!(
        "seed={} points={} palette={} animation={} blur={:.0}",
        params.seed, params.points, params.palette, params.animation, params.blur
    )
}

fn draw_status(frame: &mut Frame, area: Rect, params: &MeshParams) {
    let status = format!(
        " {} | [n]ext [r]andom [a]nim [p]alette [+/-]blur [[/]]points [q]uit ",
        status_line(params)
    );

    let buffer = frame.buffer_mut();
    for (i, ch) in status.chars().enumerate() {
        if i >= area.width as usize {
            break;
        }
        if let Some(cell) = buffer.cell_mut((area.x + i as u16, area.y)) {
            cell.set_char(ch);
            cell.set_fg(Color::White);
            cell.set_bg(Color::Black);
        }
    }
}
