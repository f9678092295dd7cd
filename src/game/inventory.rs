//! # Inventory
//!
//! Pickup, drop, equipment and the item effects.
//!
//! The inventory is an ordered `Vec` on the game state. Items leave the map
//! collection when picked up and return to it, at the player's feet, when
//! dropped. An item is only spent when its effect actually happened; a use
//! that finds nothing to act on or whose targeting is cancelled leaves both
//! the item and the turn untouched.

use crate::config::{
    CONFUSE_NUM_TURNS, CONFUSE_RANGE, FIREBALL_DAMAGE, FIREBALL_RADIUS, HEAL_AMOUNT,
    INVENTORY_CAPACITY, LIGHTNING_DAMAGE, LIGHTNING_RANGE,
};
use crate::{
    ActionResult, ActionStatus, Ai, Color, EntityId, GameState, ItemEffect, Position,
    TargetKind, TargetRequest, TargetSelector, TombsError, TombsResult,
};
use log::debug;

/// How an item effect resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UseResult {
    /// The effect happened and the item is spent
    Used,
    /// Nothing to act on
    NoEffect,
    /// Targeting was declined or invalid
    Cancelled,
}

impl GameState {
    /// Index of a carried item, or an error for ids not in the inventory.
    fn inventory_index(&self, id: EntityId) -> TombsResult<usize> {
        self.inventory
            .iter()
            .position(|item| item.id == id)
            .ok_or_else(|| TombsError::InvalidAction(format!("Item {} is not carried", id)))
    }

    /// Picks up the first item lying on the player's tile.
    pub(crate) fn pick_up(&mut self) -> TombsResult<ActionResult> {
        let here = self.player_position()?;
        let Some(index) = self
            .entities
            .iter()
            .position(|entity| entity.item.is_some() && entity.position == here)
        else {
            self.message("There is nothing here to pick up.", Color::WHITE);
            return Ok(ActionResult::free(ActionStatus::NoEffect));
        };

        if self.inventory.len() >= INVENTORY_CAPACITY {
            let name = self.entities[index].name.clone();
            self.message(
                format!("Your inventory is full, cannot pick up {}.", name),
                Color::RED,
            );
            return Ok(ActionResult::free(ActionStatus::Capacity));
        }

        let item = self.entities.remove(index);
        self.message(format!("You picked up a {}!", item.name), Color::GREEN);
        debug!("Picked up {} ({})", item.name, item.id);

        let free_slot = item.equipment.map(|equipment| {
            !self.inventory.iter().any(|carried| {
                carried
                    .equipment
                    .map(|other| other.is_equipped && other.slot == equipment.slot)
                    .unwrap_or(false)
            })
        });
        self.inventory.push(item);
        if free_slot == Some(true) {
            self.equip(self.inventory.len() - 1);
        }
        Ok(ActionResult::free(ActionStatus::Done))
    }

    /// Uses a carried item. Equipment is toggled instead.
    pub(crate) fn use_item(
        &mut self,
        id: EntityId,
        targeting: &mut dyn TargetSelector,
    ) -> TombsResult<ActionResult> {
        let index = self.inventory_index(id)?;
        let item = &self.inventory[index];
        if item.equipment.is_some() {
            return self.toggle_equip(id);
        }

        let Some(effect) = item.item.and_then(|item| item.effect) else {
            let name = item.name.clone();
            self.message(format!("The {} cannot be used.", name), Color::WHITE);
            return Ok(ActionResult::free(ActionStatus::NoEffect));
        };

        let result = match effect {
            ItemEffect::Heal => self.cast_heal()?,
            ItemEffect::Lightning => self.cast_lightning()?,
            ItemEffect::Confuse => self.cast_confuse(targeting)?,
            ItemEffect::Fireball => self.cast_fireball(targeting)?,
        };
        debug!("Used {:?}: {:?}", effect, result);

        Ok(match result {
            UseResult::Used => {
                let index = self.inventory_index(id)?;
                self.inventory.remove(index);
                ActionResult::turn(ActionStatus::Done)
            }
            UseResult::NoEffect => ActionResult::free(ActionStatus::NoEffect),
            UseResult::Cancelled => ActionResult::free(ActionStatus::Cancelled),
        })
    }

    /// Drops a carried item on the player's tile, unequipping it first.
    pub(crate) fn drop_item(&mut self, id: EntityId) -> TombsResult<ActionResult> {
        let index = self.inventory_index(id)?;
        if self.inventory[index].is_equipped() {
            self.dequip(index)?;
        }

        let mut item = self.inventory.remove(index);
        item.position = self.player_position()?;
        self.message(format!("You dropped a {}.", item.name), Color::YELLOW);
        self.entities.push(item);
        Ok(ActionResult::free(ActionStatus::Done))
    }

    /// Equips or unequips a carried item.
    pub(crate) fn toggle_equip(&mut self, id: EntityId) -> TombsResult<ActionResult> {
        let index = self.inventory_index(id)?;
        let Some(equipment) = self.inventory[index].equipment else {
            let name = self.inventory[index].name.clone();
            self.message(format!("The {} cannot be equipped.", name), Color::WHITE);
            return Ok(ActionResult::free(ActionStatus::NoEffect));
        };

        if equipment.is_equipped {
            self.dequip(index)?;
        } else {
            let occupant = self.inventory.iter().position(|carried| {
                carried
                    .equipment
                    .map(|other| other.is_equipped && other.slot == equipment.slot)
                    .unwrap_or(false)
            });
            if let Some(occupant) = occupant {
                self.dequip(occupant)?;
            }
            self.equip(index);
        }
        Ok(ActionResult::turn(ActionStatus::Done))
    }

    fn equip(&mut self, index: usize) {
        let item = &mut self.inventory[index];
        let Some(equipment) = item.equipment.as_mut() else {
            return;
        };
        equipment.is_equipped = true;
        let text = format!("Equipped {} on {}.", item.name, equipment.slot.label());
        self.message(text, Color::LIGHT_GREEN);
    }

    /// Unequips an item, clamping hp to the lowered maximum.
    fn dequip(&mut self, index: usize) -> TombsResult<()> {
        let item = &mut self.inventory[index];
        let Some(equipment) = item.equipment.as_mut() else {
            return Ok(());
        };
        equipment.is_equipped = false;
        let text = format!("Dequipped {} from {}.", item.name, equipment.slot.label());
        self.message(text, Color::LIGHT_YELLOW);

        let max_hp = self.max_hp(self.player_id).unwrap_or(0);
        let fighter = self.player_fighter_mut()?;
        fighter.hp = fighter.hp.min(max_hp);
        Ok(())
    }

    fn cast_heal(&mut self) -> TombsResult<UseResult> {
        let hp = self.player_fighter()?.hp;
        if Some(hp) >= self.max_hp(self.player_id) {
            self.message("You are already at full health.", Color::RED);
            return Ok(UseResult::NoEffect);
        }
        self.message("Your wounds start to feel better!", Color::LIGHT_VIOLET);
        self.heal(self.player_id, HEAL_AMOUNT)?;
        Ok(UseResult::Used)
    }

    /// The nearest visible monster within range of the player.
    pub fn closest_monster(&self, max_range: f64) -> TombsResult<Option<EntityId>> {
        let origin = self.player_position()?;
        let mut closest: Option<(EntityId, f64)> = None;
        for entity in &self.entities {
            if entity.id == self.player_id
                || entity.fighter.is_none()
                || !self.is_visible(entity.position)
            {
                continue;
            }
            let distance = origin.euclidean_distance(entity.position);
            if distance > max_range {
                continue;
            }
            if closest.map(|(_, best)| distance < best).unwrap_or(true) {
                closest = Some((entity.id, distance));
            }
        }
        Ok(closest.map(|(id, _)| id))
    }

    fn cast_lightning(&mut self) -> TombsResult<UseResult> {
        let Some(target) = self.closest_monster(LIGHTNING_RANGE)? else {
            self.message("No enemy is close enough to strike.", Color::RED);
            return Ok(UseResult::NoEffect);
        };
        let name = self.entity_or_err(target)?.name.clone();
        self.message(
            format!(
                "A lightning bolt strikes the {} with a loud thunder! The damage is {} hit points.",
                name, LIGHTNING_DAMAGE
            ),
            Color::LIGHT_BLUE,
        );
        self.take_damage(target, LIGHTNING_DAMAGE)?;
        Ok(UseResult::Used)
    }

    /// Asks the driver for a tile and checks it is visible and in range.
    fn select_target(
        &mut self,
        targeting: &mut dyn TargetSelector,
        kind: TargetKind,
        max_range: Option<f64>,
    ) -> TombsResult<Option<Position>> {
        let origin = self.player_position()?;
        let request = TargetRequest {
            kind,
            origin,
            max_range,
        };
        let Some(target) = targeting.select(&request) else {
            return Ok(None);
        };

        let in_range = max_range
            .map(|range| origin.euclidean_distance(target) <= range)
            .unwrap_or(true);
        if self.is_visible(target) && in_range {
            Ok(Some(target))
        } else {
            self.message("That is not a valid target.", Color::RED);
            Ok(None)
        }
    }

    fn cast_confuse(&mut self, targeting: &mut dyn TargetSelector) -> TombsResult<UseResult> {
        self.message(
            "Left-click an enemy to confuse it, or right-click to cancel.",
            Color::LIGHT_CYAN,
        );
        let Some(target) =
            self.select_target(targeting, TargetKind::Monster, Some(CONFUSE_RANGE))?
        else {
            return Ok(UseResult::Cancelled);
        };

        let player_id = self.player_id;
        let monster = self.entities.iter_mut().find(|entity| {
            entity.id != player_id
                && entity.position == target
                && entity.fighter.is_some()
                && entity.ai.is_some()
        });
        let Some(monster) = monster else {
            self.message("That is not a valid target.", Color::RED);
            return Ok(UseResult::Cancelled);
        };

        if let Some(previous) = monster.ai.take() {
            monster.ai = Some(Ai::confused(previous, CONFUSE_NUM_TURNS));
        }
        let name = monster.name.clone();
        self.message(
            format!(
                "The eyes of the {} look vacant, as it starts to stumble around!",
                name
            ),
            Color::LIGHT_GREEN,
        );
        Ok(UseResult::Used)
    }

    fn cast_fireball(&mut self, targeting: &mut dyn TargetSelector) -> TombsResult<UseResult> {
        self.message(
            "Left-click a target tile for the fireball, or right-click to cancel.",
            Color::LIGHT_CYAN,
        );
        let Some(target) = self.select_target(targeting, TargetKind::Tile, None)? else {
            return Ok(UseResult::Cancelled);
        };

        self.message(
            format!(
                "The fireball explodes, burning everything within {} tiles!",
                FIREBALL_RADIUS
            ),
            Color::ORANGE,
        );
        let victims: Vec<(EntityId, String)> = self
            .entities
            .iter()
            .filter(|entity| {
                entity.fighter.is_some()
                    && entity.position.euclidean_distance(target) <= FIREBALL_RADIUS
            })
            .map(|entity| (entity.id, entity.name.clone()))
            .collect();

        for (id, name) in victims {
            self.message(
                format!("The {} gets burned for {} hit points.", name, FIREBALL_DAMAGE),
                Color::ORANGE,
            );
            self.take_damage(id, FIREBALL_DAMAGE)?;
        }
        Ok(UseResult::Used)
    }
}
