use crate::config::BloomConfig;
use crate::help::{draw_box, render_help_overlay, BLOOM_HELP};
use crate::icon::LARGE_SIZE;
use crate::particle::ParticleFrame;
use crate::scheduler::Millis;
use crate::spawner::Spawner;
use crate::stage::{Region, Stage, ToggleControl};
use crate::terminal::{rgb, Terminal};
use crossterm::event::KeyCode;
use crossterm::style::Color;
use rand::prelude::*;
use std::io;
use std::time::Instant;
use tracing::{info, warn};

// Below this a particle is not worth a cell
const MIN_VISIBLE_OPACITY: f64 = 0.05;

const BORDER: (u8, u8, u8) = (0x5a, 0x4a, 0x55);

pub fn run(config: BloomConfig) -> io::Result<()> {
    let seed = config.seed.unwrap_or_else(|| {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0) // Fallback seed for misconfigured system clocks
    });
    info!(seed, "starting");

    // Mount before taking over the screen so a missing area warns on a
    // normal terminal
    let (cols, rows) = crossterm::terminal::size()?;
    let pixels = crossterm::terminal::window_size()
        .map(|ws| (ws.width, ws.height))
        .unwrap_or((0, 0));
    let stage = Stage::new(&config.layout, cols, rows, pixels);
    let Some(spawner) = mount_or_warn(stage, &config, StdRng::seed_from_u64(seed)) else {
        return Ok(());
    };

    let mut term = Terminal::new()?;
    run_interactive(&mut term, &config, spawner)
}

/// Mount the spawner, or log why the animation stays off
fn mount_or_warn<R: Rng>(stage: Stage, config: &BloomConfig, rng: R) -> Option<Spawner<R>> {
    match Spawner::mount(
        stage,
        &config.mount,
        config.spawner.clone(),
        config.reduced_motion,
        rng,
    ) {
        Ok(spawner) => Some(spawner),
        Err(err) => {
            warn!("{err}; animation disabled");
            None
        }
    }
}

fn run_interactive(term: &mut Terminal, config: &BloomConfig, mut spawner: Spawner<StdRng>) -> io::Result<()> {
    let start = Instant::now();
    let mut show_help = false;

    loop {
        let (w, h) = term.size();
        let (new_w, new_h) = crossterm::terminal::size().unwrap_or((w, h));
        if new_w != w || new_h != h {
            term.resize(new_w, new_h);
            term.clear_screen()?;
            spawner.resize(new_w, new_h, term.pixel_size());
        }

        if let Some((code, _)) = term.check_key()? {
            match code {
                KeyCode::Char('q') | KeyCode::Esc => break,
                KeyCode::Char(' ') | KeyCode::Char('p') => spawner.toggle(),
                KeyCode::Char('?') => show_help = !show_help,
                _ => {}
            }
        }

        let now = start.elapsed().as_millis() as Millis;
        spawner.advance(now);

        term.clear();
        draw(term, &spawner, now);
        if show_help {
            let (w, h) = term.size();
            render_help_overlay(term, w, h, BLOOM_HELP);
        }
        term.render()?;
        term.sleep(config.time_step);
    }

    Ok(())
}

fn draw(term: &mut Terminal, spawner: &Spawner<StdRng>, now: Millis) {
    let container = spawner.container();
    let rect = container.rect;
    if container.bordered {
        draw_box(
            term,
            rect.x as i32 - 1,
            rect.y as i32 - 1,
            rect.width as i32 + 2,
            rect.height as i32 + 2,
            rgb(BORDER),
        );
    }

    for particle in container.children() {
        let frame = particle.frame(now);
        if frame.opacity < MIN_VISIBLE_OPACITY {
            continue;
        }
        let Some((col, row)) = particle_cell(container, &frame) else {
            continue;
        };
        let icon = particle.kind.icon();
        let ch = icon.glyph(frame.size, frame.rotation);
        let color = icon.color(particle.rotation, frame.opacity);
        term.set(col as i32, row as i32, ch, Some(color), frame.size >= LARGE_SIZE);
    }

    let (width, height) = term.size();
    let mut label_end = 0;
    if let Some(text) = status_text(spawner.toggle_control()) {
        let (fg, bold) = if spawner.is_running() {
            (Color::Grey, false)
        } else {
            (Color::Yellow, true)
        };
        term.set_str(1, height as i32 - 1, &text, Some(fg), bold);
        label_end = 1 + text.chars().count() as i32;
    }
    let count = if container.is_empty() {
        "? help".to_string()
    } else {
        format!("{} afloat  ? help", container.len())
    };
    if let Some(x) = right_aligned_x(width, label_end, count.chars().count()) {
        term.set_str(x, height as i32 - 1, &count, Some(Color::DarkGrey), false);
    }
}

/// Column for right-aligned status text, `None` if it would run into
/// whatever ends at `left_end`
pub fn right_aligned_x(width: u16, left_end: i32, len: usize) -> Option<i32> {
    let x = width as i32 - len as i32 - 1;
    // Keep one blank column between the two
    (x > left_end).then_some(x)
}

/// Cell under the visual center of a particle, if it is inside the region
pub fn particle_cell(region: &Region, frame: &ParticleFrame) -> Option<(u16, u16)> {
    let half = frame.size as f64 * frame.scale / 2.0;
    region.to_cell(frame.x + half, frame.y + half)
}

/// Status-line rendering of the toggle control; `None` while hidden
pub fn status_text(toggle: &ToggleControl) -> Option<String> {
    if toggle.hidden {
        return None;
    }
    let mark = if toggle.pressed { '■' } else { ' ' };
    Some(format!("[{}] {}", mark, toggle.label))
}
