//! Fixed-slot ability loadout for one actor.

use std::time::Duration;

use arrayvec::ArrayVec;
use tracing::{debug, warn};

use crate::config::SimConfig;
use crate::state::{ActorCombatPools, EntityId, Position};

use super::error::{ActivationError, RestoreError};
use super::save::AbilitySave;
use super::tuning::AbilityTuning;
use super::{Ability, AbilityId, AbilitySignal, Activation, ActivationContext};

/// An ability signal tagged with the slot it came from.
#[derive(Clone, Debug, PartialEq)]
pub struct SlotSignal {
    pub slot: usize,
    pub ability: AbilityId,
    pub signal: AbilitySignal,
}

/// Owns an actor's abilities in a fixed number of slots.
///
/// Unlocking fills the first free slot. Every ability id appears at most
/// once, so save records can be matched back by id.
#[derive(Clone, Debug, PartialEq)]
pub struct AbilityManager {
    owner: EntityId,
    slots: ArrayVec<Ability, { SimConfig::MAX_ABILITY_SLOTS }>,
}

impl AbilityManager {
    pub fn new(owner: EntityId) -> Self {
        Self {
            owner,
            slots: ArrayVec::new(),
        }
    }

    /// Standard player loadout: melee, dash, area cast in slots 0..3.
    pub fn with_loadout(owner: EntityId, tuning: &AbilityTuning) -> Self {
        let mut manager = Self::new(owner);
        manager.unlock(Ability::melee(tuning.melee));
        manager.unlock(Ability::dash(tuning.dash));
        manager.unlock(Ability::magic(tuning.magic));
        manager
    }

    pub fn owner(&self) -> EntityId {
        self.owner
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Ability> {
        self.slots.iter()
    }

    /// Places `ability` in the first free slot.
    ///
    /// Returns false when the slots are full or the id is already unlocked.
    pub fn unlock(&mut self, ability: Ability) -> bool {
        let id = ability.id();
        if self.slot_of(id).is_some() {
            debug!(ability = %id, "ability already unlocked");
            return false;
        }
        if self.slots.try_push(ability).is_err() {
            warn!(ability = %id, owner = %self.owner, "no free ability slot");
            return false;
        }
        true
    }

    pub fn slot(&self, slot: usize) -> Option<&Ability> {
        self.slots.get(slot)
    }

    pub fn slot_of(&self, id: AbilityId) -> Option<usize> {
        self.slots.iter().position(|ability| ability.id() == id)
    }

    pub fn get(&self, id: AbilityId) -> Option<&Ability> {
        self.slots.iter().find(|ability| ability.id() == id)
    }

    pub fn get_mut(&mut self, id: AbilityId) -> Option<&mut Ability> {
        self.slots.iter_mut().find(|ability| ability.id() == id)
    }

    fn checked_slot(&self, slot: usize) -> Result<&Ability, ActivationError> {
        if slot >= SimConfig::MAX_ABILITY_SLOTS {
            return Err(ActivationError::SlotOutOfRange {
                slot,
                capacity: SimConfig::MAX_ABILITY_SLOTS,
            });
        }
        self.slots.get(slot).ok_or(ActivationError::EmptySlot { slot })
    }

    /// Side-effect-free check used by input layers to grey out slots.
    pub fn can_activate_slot(&self, slot: usize, pools: &ActorCombatPools) -> bool {
        pools.is_alive()
            && self
                .checked_slot(slot)
                .is_ok_and(|ability| ability.can_activate(pools))
    }

    /// Activates the ability in `slot`.
    ///
    /// Failures are soft: nothing changes and the reason is returned.
    pub fn activate_slot(
        &mut self,
        slot: usize,
        pools: &mut ActorCombatPools,
        ctx: &ActivationContext,
    ) -> Result<Activation, ActivationError> {
        self.checked_slot(slot)?;
        if !pools.is_alive() {
            return Err(ActivationError::ActorInactive { actor: self.owner });
        }

        let ability = &mut self.slots[slot];
        let result = ability.activate(pools, ctx);
        if let Err(err) = &result {
            debug!(slot, %err, "activation rejected");
        }
        result
    }

    /// Activates by id instead of slot index.
    pub fn activate(
        &mut self,
        id: AbilityId,
        pools: &mut ActorCombatPools,
        ctx: &ActivationContext,
    ) -> Result<Activation, ActivationError> {
        let slot = self.slot_of(id).ok_or(ActivationError::EmptySlot {
            slot: self.slots.len(),
        })?;
        self.activate_slot(slot, pools, ctx)
    }

    pub fn upgrade(&mut self, id: AbilityId) -> bool {
        self.get_mut(id).is_some_and(Ability::upgrade)
    }

    pub fn upgrade_slot(&mut self, slot: usize) -> bool {
        self.slots.get_mut(slot).is_some_and(Ability::upgrade)
    }

    /// Advances every slot by `delta` and collects what they emitted, in
    /// slot order.
    pub fn advance(&mut self, delta: Duration, aim: Option<Position>) -> Vec<SlotSignal> {
        self.slots
            .iter_mut()
            .enumerate()
            .filter_map(|(slot, ability)| {
                ability.advance(delta, aim).map(|signal| SlotSignal {
                    slot,
                    ability: ability.id(),
                    signal,
                })
            })
            .collect()
    }

    pub fn record_area_hits(&mut self, slot: usize, hits: u32) {
        if let Some(ability) = self.slots.get_mut(slot) {
            ability.record_area_hits(hits);
        }
    }

    pub fn force_reset(&mut self) {
        for ability in &mut self.slots {
            ability.force_reset();
        }
    }

    pub fn save(&self) -> Vec<AbilitySave> {
        self.slots.iter().map(Ability::save).collect()
    }

    /// Applies one record to the matching unlocked ability.
    pub fn restore_record(&mut self, record: &AbilitySave) -> Result<(), RestoreError> {
        self.get_mut(record.id)
            .ok_or(RestoreError::NotInLoadout { id: record.id })?
            .restore(record)
    }

    /// Applies every record it can; records for locked abilities are
    /// skipped with a warning. Returns how many were applied.
    pub fn restore(&mut self, records: &[AbilitySave]) -> usize {
        let mut applied = 0;
        for record in records {
            match self.restore_record(record) {
                Ok(()) => applied += 1,
                Err(err) => warn!(%err, "skipping ability record"),
            }
        }
        debug!(applied, total = records.len(), "abilities restored");
        applied
    }
}

#[cfg(test)]
mod tests {
    use crate::state::Facing;

    use super::super::{MagicTuning, MeleeTuning, SaveExtra};
    use super::*;

    fn ctx() -> ActivationContext {
        ActivationContext::new(EntityId::PLAYER, Position::new(2, 2), Facing::Down)
    }

    fn loadout() -> AbilityManager {
        AbilityManager::with_loadout(EntityId::PLAYER, &AbilityTuning::default())
    }

    #[test]
    fn loadout_fills_slots_in_order() {
        let manager = loadout();
        assert_eq!(manager.len(), 3);
        assert_eq!(manager.slot(0).map(Ability::id), Some(AbilityId::Melee));
        assert_eq!(manager.slot(1).map(Ability::id), Some(AbilityId::Dash));
        assert_eq!(manager.slot(2).map(Ability::id), Some(AbilityId::Magic));
        assert!(manager.slot(3).is_none());
    }

    #[test]
    fn duplicate_unlock_is_refused() {
        let mut manager = loadout();
        assert!(!manager.unlock(Ability::melee(MeleeTuning::default())));
        assert_eq!(manager.len(), 3);
    }

    #[test]
    fn slot_errors_are_soft() {
        let mut manager = loadout();
        let mut pools = ActorCombatPools::new(100, 100);

        assert_eq!(
            manager.activate_slot(3, &mut pools, &ctx()),
            Err(ActivationError::EmptySlot { slot: 3 })
        );
        assert_eq!(
            manager.activate_slot(9, &mut pools, &ctx()),
            Err(ActivationError::SlotOutOfRange {
                slot: 9,
                capacity: SimConfig::MAX_ABILITY_SLOTS,
            })
        );
        assert_eq!(pools.mana(), 100);
        assert!(manager.can_activate_slot(0, &pools));
        assert!(!manager.can_activate_slot(3, &pools));
    }

    #[test]
    fn dead_owner_cannot_activate() {
        let mut manager = loadout();
        let mut pools = ActorCombatPools::new(100, 100);
        pools.kill();
        assert_eq!(
            manager.activate_slot(0, &mut pools, &ctx()),
            Err(ActivationError::ActorInactive {
                actor: EntityId::PLAYER
            })
        );
        assert!(!manager.can_activate_slot(0, &pools));
    }

    #[test]
    fn advance_tags_signals_with_slot() {
        let mut manager = loadout();
        let mut pools = ActorCombatPools::new(100, 100);
        manager.activate_slot(0, &mut pools, &ctx()).unwrap();

        let signals = manager.advance(Duration::from_millis(100), None);
        assert_eq!(signals.len(), 1);
        assert_eq!(signals[0].slot, 0);
        assert_eq!(signals[0].ability, AbilityId::Melee);
    }

    #[test]
    fn restore_skips_locked_abilities() {
        let mut source = loadout();
        source.upgrade(AbilityId::Magic);
        let records = source.save();

        let mut target = AbilityManager::new(EntityId::PLAYER);
        target.unlock(Ability::magic(MagicTuning::default()));
        assert_eq!(target.restore(&records), 1);
        assert_eq!(target.get(AbilityId::Magic).map(Ability::level), Some(2));
    }

    #[test]
    fn restore_record_rejects_missing_ability() {
        let mut manager = AbilityManager::new(EntityId::PLAYER);
        let record = AbilitySave {
            id: AbilityId::Dash,
            level: 1,
            ready: true,
            cooldown_elapsed: Duration::ZERO,
            active: false,
            active_elapsed: Duration::ZERO,
            extra: SaveExtra::None,
        };
        assert_eq!(
            manager.restore_record(&record),
            Err(RestoreError::NotInLoadout { id: AbilityId::Dash })
        );
    }
}
