//! Named screen regions that particles can be mounted into, plus the
//! toggle control shown on the status line.

use crate::config::{LayoutConfig, MountConfig};
use crate::error::MountError;
use crate::particle::{Particle, ParticleId};
use std::collections::BTreeMap;

pub const GLOBAL_LAYER: &str = "globalAnimation";
pub const PANEL: &str = "animationArea";

pub const PAUSE_LABEL: &str = "Pause Animation";
pub const RESUME_LABEL: &str = "Resume Animation";

/// Cell-space rectangle
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

/// A region hosting particles
#[derive(Debug)]
pub struct Region {
    pub id: String,
    pub rect: Rect,
    pub cell_px: (f64, f64),
    pub bordered: bool,
    children: BTreeMap<ParticleId, Particle>,
}

impl Region {
    pub fn new(id: &str, rect: Rect, cell_px: (f64, f64)) -> Self {
        Self {
            id: id.to_string(),
            rect,
            cell_px,
            bordered: false,
            children: BTreeMap::new(),
        }
    }

    /// Current size in px; read live on every spawn
    pub fn size_px(&self) -> (f64, f64) {
        (
            self.rect.width as f64 * self.cell_px.0,
            self.rect.height as f64 * self.cell_px.1,
        )
    }

    /// Map a px offset inside the region to an absolute cell, if visible
    pub fn to_cell(&self, x: f64, y: f64) -> Option<(u16, u16)> {
        if x < 0.0 || y < 0.0 || self.cell_px.0 <= 0.0 || self.cell_px.1 <= 0.0 {
            return None;
        }
        let col = (x / self.cell_px.0) as u16;
        let row = (y / self.cell_px.1) as u16;
        if col >= self.rect.width || row >= self.rect.height {
            return None;
        }
        Some((self.rect.x + col, self.rect.y + row))
    }

    pub fn append(&mut self, particle: Particle) {
        self.children.insert(particle.id, particle);
    }

    pub fn get_mut(&mut self, id: ParticleId) -> Option<&mut Particle> {
        self.children.get_mut(&id)
    }

    pub fn remove(&mut self, id: ParticleId) -> Option<Particle> {
        self.children.remove(&id)
    }

    #[cfg(test)]
    pub fn contains(&self, id: ParticleId) -> bool {
        self.children.contains_key(&id)
    }

    pub fn children(&self) -> impl Iterator<Item = &Particle> {
        self.children.values()
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

/// Pause/resume control. `pressed` mirrors the paused state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToggleControl {
    pub label: &'static str,
    pub pressed: bool,
    pub hidden: bool,
}

impl Default for ToggleControl {
    fn default() -> Self {
        Self { label: PAUSE_LABEL, pressed: false, hidden: false }
    }
}

impl ToggleControl {
    pub fn show_running(&mut self, running: bool) {
        self.pressed = !running;
        self.label = if running { PAUSE_LABEL } else { RESUME_LABEL };
    }
}

/// All regions on screen plus the toggle control
#[derive(Debug, Default)]
pub struct Stage {
    pub regions: Vec<Region>,
    pub toggle: ToggleControl,
    layout: LayoutConfig,
}

impl Stage {
    #[cfg(test)]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Lay out regions for a `cols` x `rows` terminal
    pub fn new(layout: &LayoutConfig, cols: u16, rows: u16, pixels: (u16, u16)) -> Self {
        let mut stage = Self {
            regions: Vec::new(),
            toggle: ToggleControl::default(),
            layout: layout.clone(),
        };
        let cell_px = cell_px(layout, cols, rows, pixels);
        if layout.global_layer {
            stage.regions.push(Region::new(GLOBAL_LAYER, global_rect(cols, rows), cell_px));
        }
        if layout.panel {
            let mut panel = Region::new(PANEL, panel_rect(cols, rows), cell_px);
            panel.bordered = true;
            stage.regions.push(panel);
        }
        stage
    }

    #[cfg(test)]
    pub fn add_region(&mut self, region: Region) {
        self.regions.push(region);
    }

    pub fn find(&self, id: &str) -> Option<usize> {
        self.regions.iter().position(|r| r.id == id)
    }

    /// Primary id, else fallback id
    pub fn resolve(&self, mount: &MountConfig) -> Result<usize, MountError> {
        self.find(&mount.primary)
            .or_else(|| self.find(&mount.fallback))
            .ok_or_else(|| MountError {
                primary: mount.primary.clone(),
                fallback: mount.fallback.clone(),
            })
    }

    pub fn region(&self, index: usize) -> &Region {
        &self.regions[index]
    }

    pub fn region_mut(&mut self, index: usize) -> &mut Region {
        &mut self.regions[index]
    }

    /// Recompute region bounds. Particles in flight keep their offsets.
    pub fn resize(&mut self, cols: u16, rows: u16, pixels: (u16, u16)) {
        let cell_px = cell_px(&self.layout, cols, rows, pixels);
        for region in &mut self.regions {
            region.cell_px = cell_px;
            match region.id.as_str() {
                GLOBAL_LAYER => region.rect = global_rect(cols, rows),
                PANEL => region.rect = panel_rect(cols, rows),
                _ => {}
            }
        }
    }
}

fn cell_px(layout: &LayoutConfig, cols: u16, rows: u16, (px_w, px_h): (u16, u16)) -> (f64, f64) {
    let w = if px_w > 0 && cols > 0 {
        px_w as f64 / cols as f64
    } else {
        layout.cell_width_px as f64
    };
    let h = if px_h > 0 && rows > 0 {
        px_h as f64 / rows as f64
    } else {
        layout.cell_height_px as f64
    };
    (w, h)
}

// Everything above the status line
fn global_rect(cols: u16, rows: u16) -> Rect {
    Rect { x: 0, y: 0, width: cols, height: rows.saturating_sub(1) }
}

// Centered panel, inside its border
fn panel_rect(cols: u16, rows: u16) -> Rect {
    let width = (cols as u32 * 3 / 5) as u16;
    let height = (rows as u32 * 3 / 5) as u16;
    Rect {
        x: (cols - width) / 2 + 1,
        y: (rows.saturating_sub(1) - height.min(rows.saturating_sub(1))) / 2 + 1,
        width: width.saturating_sub(2),
        height: height.saturating_sub(2),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(global_layer: bool, panel: bool) -> LayoutConfig {
        LayoutConfig { global_layer, panel, ..Default::default() }
    }

    #[test]
    fn primary_wins_when_present() {
        let stage = Stage::new(&layout(true, true), 100, 40, (0, 0));
        let index = stage.resolve(&MountConfig::default()).unwrap();
        assert_eq!(stage.region(index).id, GLOBAL_LAYER);
    }

    #[test]
    fn falls_back_to_secondary() {
        let stage = Stage::new(&layout(false, true), 100, 40, (0, 0));
        let index = stage.resolve(&MountConfig::default()).unwrap();
        assert_eq!(stage.region(index).id, PANEL);
    }

    #[test]
    fn missing_both_is_an_error() {
        let stage = Stage::new(&layout(false, false), 100, 40, (0, 0));
        let err = stage.resolve(&MountConfig::default()).unwrap_err();
        assert_eq!(err.primary, GLOBAL_LAYER);
        assert_eq!(err.fallback, PANEL);
    }

    #[test]
    fn size_uses_reported_pixels() {
        let stage = Stage::new(&layout(true, false), 100, 41, (1000, 820));
        let (w, h) = stage.region(0).size_px();
        assert!((w - 1000.0).abs() < 1e-9);
        assert!((h - 800.0).abs() < 1e-9);
    }

    #[test]
    fn size_falls_back_to_cell_defaults() {
        let stage = Stage::new(&layout(true, false), 100, 41, (0, 0));
        assert_eq!(stage.region(0).size_px(), (800.0, 640.0));
    }

    #[test]
    fn panel_sits_inside_screen() {
        let stage = Stage::new(&layout(false, true), 100, 40, (0, 0));
        let rect = stage.region(0).rect;
        assert!(rect.x > 0 && rect.y > 0);
        assert!(rect.x + rect.width < 100);
        assert!(rect.y + rect.height < 40);
    }

    #[test]
    fn tiny_terminal_does_not_underflow() {
        let mut stage = Stage::new(&layout(true, true), 1, 1, (0, 0));
        stage.resize(0, 0, (0, 0));
        assert_eq!(stage.region(0).size_px(), (0.0, 0.0));
    }

    #[test]
    fn to_cell_clips_outside_region() {
        let region = Region::new("r", Rect { x: 2, y: 3, width: 10, height: 5 }, (8.0, 16.0));
        assert_eq!(region.to_cell(0.0, 0.0), Some((2, 3)));
        assert_eq!(region.to_cell(79.9, 79.9), Some((11, 7)));
        assert_eq!(region.to_cell(80.0, 0.0), None);
        assert_eq!(region.to_cell(0.0, -1.0), None);
    }

    #[test]
    fn toggle_labels() {
        let mut toggle = ToggleControl::default();
        toggle.show_running(false);
        assert_eq!(toggle.label, RESUME_LABEL);
        assert!(toggle.pressed);
        toggle.show_running(true);
        assert_eq!(toggle, ToggleControl::default());
    }
}
