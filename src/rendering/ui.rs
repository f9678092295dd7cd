//! # User Interface Elements
//!
//! Text status panel: health bar, stats, inventory and recent messages.

use crate::{PlayState, RenderSnapshot};

/// Text status panel drawn under the map.
#[derive(Debug, Clone)]
pub struct StatusPanel {
    /// Width of the HP bar in characters
    pub bar_width: usize,
    /// How many of the newest messages to show
    pub message_lines: usize,
}

impl StatusPanel {
    pub fn new() -> Self {
        Self {
            bar_width: 20,
            message_lines: 5,
        }
    }

    /// Renders the panel lines.
    pub fn render(&self, snapshot: &RenderSnapshot) -> Vec<String> {
        let player = &snapshot.player;
        let mut lines = vec![
            format!(
                "HP: {}/{} {}",
                player.hp,
                player.max_hp,
                hp_bar(player.hp, player.max_hp, self.bar_width)
            ),
            format!("Attack: {}  Defence: {}", player.power, player.defence),
            format!(
                "Level: {}  XP: {}/{}",
                player.level, player.xp, player.xp_to_next
            ),
            format!("Dungeon level: {}  Turn: {}", snapshot.depth, snapshot.turn_number),
        ];
        if snapshot.play_state == PlayState::Dead {
            lines.push("*** YOU DIED ***".to_string());
        }

        if !snapshot.inventory.is_empty() {
            lines.push("Inventory:".to_string());
            for (entry, letter) in snapshot.inventory.iter().zip('a'..='z') {
                match entry.equipped {
                    Some(slot) => {
                        lines.push(format!("  ({}) {} (on {})", letter, entry.name, slot.label()))
                    }
                    None => lines.push(format!("  ({}) {}", letter, entry.name)),
                }
            }
        }

        let skip = snapshot.messages.len().saturating_sub(self.message_lines);
        lines.extend(
            snapshot
                .messages
                .iter()
                .skip(skip)
                .map(|message| message.text.clone()),
        );
        lines
    }
}

impl Default for StatusPanel {
    fn default() -> Self {
        Self::new()
    }
}

/// A fixed-width bar like `[#####.....]`.
///
/// ```
/// use tombs::hp_bar;
///
/// assert_eq!(hp_bar(50, 100, 10), "[#####.....]");
/// assert_eq!(hp_bar(-5, 100, 4), "[....]");
/// ```
pub fn hp_bar(value: i32, maximum: i32, width: usize) -> String {
    let filled = if maximum > 0 {
        let ratio = value.clamp(0, maximum) as f64 / maximum as f64;
        (ratio * width as f64).round() as usize
    } else {
        0
    };
    format!("[{}{}]", "#".repeat(filled), ".".repeat(width - filled))
}
