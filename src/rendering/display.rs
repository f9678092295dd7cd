//! # Display Management
//!
//! Plain-text rendering of a [`RenderSnapshot`] for the headless driver,
//! logs and tests.

use crate::rendering::StatusPanel;
use crate::RenderSnapshot;

/// Glyph for unexplored space.
pub const UNEXPLORED_GLYPH: char = ' ';
/// Glyph for a known wall.
pub const WALL_GLYPH: char = '#';
/// Glyph for a known floor tile.
pub const FLOOR_GLYPH: char = '.';

/// ASCII display manager.
///
/// Draws the map with the status panel underneath.
#[derive(Debug, Clone)]
pub struct AsciiDisplay {
    /// Status panel drawn below the map
    pub panel: StatusPanel,
    /// Whether to draw the panel at all
    pub show_panel: bool,
}

impl AsciiDisplay {
    /// Creates a display with the default status panel.
    ///
    /// # Examples
    ///
    /// ```
    /// use tombs::{AsciiDisplay, GameState, GenerationConfig};
    ///
    /// let game = GameState::new_game(GenerationConfig::for_testing(4)).unwrap();
    /// let snapshot = game.render_snapshot().unwrap();
    /// let lines = AsciiDisplay::new().render_map(&snapshot);
    /// assert_eq!(lines.len(), snapshot.height as usize);
    /// assert!(lines.iter().any(|line| line.contains('@')));
    /// ```
    pub fn new() -> Self {
        Self {
            panel: StatusPanel::new(),
            show_panel: true,
        }
    }

    /// Renders the whole screen as one string.
    pub fn render(&self, snapshot: &RenderSnapshot) -> String {
        let mut lines = self.render_map(snapshot);
        if self.show_panel {
            lines.push(String::new());
            lines.extend(self.panel.render(snapshot));
        }
        lines.join("\n")
    }

    /// Renders one line per map row.
    pub fn render_map(&self, snapshot: &RenderSnapshot) -> Vec<String> {
        let mut grid: Vec<Vec<char>> = snapshot
            .tiles
            .iter()
            .map(|row| {
                row.iter()
                    .map(|tile| match (tile.explored, tile.wall) {
                        (false, _) => UNEXPLORED_GLYPH,
                        (true, true) => WALL_GLYPH,
                        (true, false) => FLOOR_GLYPH,
                    })
                    .collect()
            })
            .collect();

        // Back to front, so later entities overwrite earlier ones
        for entity in &snapshot.entities {
            let (x, y) = (entity.position.x, entity.position.y);
            if x < 0 || y < 0 {
                continue;
            }
            if let Some(cell) = grid
                .get_mut(y as usize)
                .and_then(|row| row.get_mut(x as usize))
            {
                *cell = entity.glyph;
            }
        }

        grid.into_iter()
            .map(|row| row.into_iter().collect::<String>().trim_end().to_string())
            .collect()
    }
}

impl Default for AsciiDisplay {
    fn default() -> Self {
        Self::new()
    }
}
