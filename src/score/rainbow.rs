//! Color-cycling ("rainbow") text
//!
//! Character `i` takes `palette[(offset + i) % len]`. While animation is on,
//! a repeating wall-clock task advances `offset` and re-renders.

use serde::{Deserialize, Serialize};

use crate::color::Rgba;
use crate::sim::task::{RepeatTimer, TaskSlot, TaskStatus};
use crate::tuning::RainbowSettings;

/// Per-character color assignment for `text` at `offset`
pub fn build_rainbow(text: &str, palette: &[Rgba], offset: usize) -> Vec<(char, Rgba)> {
    let len = palette.len();
    if len == 0 {
        return Vec::new();
    }
    // Reduce both terms first so any offset is accepted
    text.chars()
        .enumerate()
        .map(|(i, c)| (c, palette[(offset % len + i % len) % len]))
        .collect()
}

/// Last rendered output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RenderedText {
    Plain(String),
    Rainbow(Vec<(char, Rgba)>),
}

impl Default for RenderedText {
    fn default() -> Self {
        RenderedText::Plain(String::new())
    }
}

impl RenderedText {
    /// Text without color information
    pub fn plain(&self) -> String {
        match self {
            RenderedText::Plain(text) => text.clone(),
            RenderedText::Rainbow(glyphs) => glyphs.iter().map(|(c, _)| *c).collect(),
        }
    }

    /// Rich-text markup: `<color=#RRGGBB>c</color>` per character
    pub fn markup(&self) -> String {
        match self {
            RenderedText::Plain(text) => text.clone(),
            RenderedText::Rainbow(glyphs) => {
                let mut out = String::with_capacity(glyphs.len() * 24);
                for (c, color) in glyphs {
                    out.push_str("<color=#");
                    out.push_str(&color.to_hex_rgb());
                    out.push('>');
                    out.push(*c);
                    out.push_str("</color>");
                }
                out
            }
        }
    }

    /// Colors in character order (empty for plain text)
    pub fn colors(&self) -> Vec<Rgba> {
        match self {
            RenderedText::Plain(_) => Vec::new(),
            RenderedText::Rainbow(glyphs) => glyphs.iter().map(|(_, c)| *c).collect(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RainbowText {
    plain: String,
    palette: Vec<Rgba>,
    offset: usize,
    interval: f32,
    animate: bool,
    wave: TaskSlot<RepeatTimer>,
    rendered: RenderedText,
    renders: u32,
    warned_empty_palette: bool,
}

impl RainbowText {
    pub fn new(settings: &RainbowSettings) -> Self {
        Self {
            plain: String::new(),
            palette: settings.palette.clone(),
            offset: 0,
            interval: settings.interval,
            animate: settings.animate,
            wave: TaskSlot::new(),
            rendered: RenderedText::default(),
            renders: 0,
            warned_empty_palette: false,
        }
    }

    pub fn plain_text(&self) -> &str {
        &self.plain
    }

    pub fn rendered(&self) -> &RenderedText {
        &self.rendered
    }

    pub fn markup(&self) -> String {
        self.rendered.markup()
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn palette(&self) -> &[Rgba] {
        &self.palette
    }

    pub fn is_animating(&self) -> bool {
        self.wave.is_active()
    }

    /// Times the text has been rendered
    pub fn render_count(&self) -> u32 {
        self.renders
    }

    /// Color assignment of the current text at `offset`
    pub fn build_rainbow(&self, offset: usize) -> Vec<(char, Rgba)> {
        build_rainbow(&self.plain, &self.palette, offset)
    }

    /// Replace the text and render it at the current offset, restarting the
    /// wave when animation is on. Without a palette the text is shown plain
    /// and no wave runs.
    pub fn set_plain_text_and_refresh(&mut self, text: &str) {
        self.plain = text.to_owned();

        if self.palette.is_empty() {
            if self.animate && !self.warned_empty_palette {
                log::warn!("Rainbow text has no palette; rendering plain text without animation");
                self.warned_empty_palette = true;
            }
            self.wave.cancel();
            self.render_plain();
            return;
        }

        self.render(self.offset);

        if self.animate && self.interval > 0.0 {
            self.restart_wave();
        } else {
            self.rotate();
        }
    }

    /// Swap the palette; an empty palette stops the wave
    pub fn set_palette(&mut self, palette: Vec<Rgba>) {
        self.palette = palette;
        self.offset = 0;
        let text = std::mem::take(&mut self.plain);
        self.set_plain_text_and_refresh(&text);
    }

    pub fn stop(&mut self) {
        self.wave.cancel();
    }

    /// Advance the wave by wall-clock `dt`
    pub fn advance(&mut self, unscaled_dt: f32) -> TaskStatus {
        let Some(timer) = self.wave.get_mut() else {
            return TaskStatus::Done;
        };
        if timer.tick(unscaled_dt) {
            self.wave_step();
        }
        TaskStatus::Continuing
    }

    fn restart_wave(&mut self) {
        self.wave.cancel();
        self.wave.start(RepeatTimer::new(self.interval));
        // The wave renders once as soon as it starts, then waits
        self.wave_step();
    }

    fn wave_step(&mut self) {
        self.render(self.offset);
        self.rotate();
    }

    fn rotate(&mut self) {
        if !self.palette.is_empty() {
            self.offset = (self.offset + 1) % self.palette.len();
        }
    }

    fn render(&mut self, offset: usize) {
        self.rendered = RenderedText::Rainbow(self.build_rainbow(offset));
        self.renders += 1;
    }

    fn render_plain(&mut self) {
        self.rendered = RenderedText::Plain(self.plain.clone());
        self.renders += 1;
    }
}
