use std::time::Duration;

use crate::ability::{
    AbilityId, AbilityManager, AbilityTuning, Activation, ActivationContext, ActivationError,
    SlotSignal,
};
use crate::combat::Combatant;
use crate::config::SimConfig;
use crate::state::{ActorCombatPools, EntityId, Facing, Position};

/// The controllable character: pose, pools and ability loadout.
#[derive(Clone, Debug, PartialEq)]
pub struct PlayerActor {
    position: Position,
    facing: Facing,
    pools: ActorCombatPools,
    abilities: AbilityManager,
}

impl PlayerActor {
    pub fn new(config: &SimConfig, tuning: &AbilityTuning, position: Position) -> Self {
        let pools = ActorCombatPools::new(config.player_max_health, config.player_max_mana)
            .with_mana_regen(config.mana_regen_per_second);
        Self {
            position,
            facing: Facing::default(),
            pools,
            abilities: AbilityManager::with_loadout(EntityId::PLAYER, tuning),
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    pub fn pools(&self) -> &ActorCombatPools {
        &self.pools
    }

    pub fn abilities(&self) -> &AbilityManager {
        &self.abilities
    }

    pub(crate) fn abilities_mut(&mut self) -> &mut AbilityManager {
        &mut self.abilities
    }

    pub fn is_alive(&self) -> bool {
        self.pools.is_alive()
    }

    pub fn is_dashing(&self) -> bool {
        self.abilities
            .get(AbilityId::Dash)
            .is_some_and(|dash| dash.is_active())
    }

    /// Delay multiplier the movement collaborator applies to steps.
    pub fn movement_delay_multiplier(&self, config: &SimConfig) -> f32 {
        if self.pools.is_slowed() {
            config.slow_multiplier
        } else {
            1.0
        }
    }

    pub(crate) fn set_pose(&mut self, position: Position, facing: Facing) {
        self.position = position;
        self.facing = facing;
    }

    pub(crate) fn set_facing(&mut self, facing: Facing) {
        self.facing = facing;
    }

    pub(crate) fn activate(
        &mut self,
        slot: usize,
        aim: Option<Position>,
    ) -> Result<Activation, ActivationError> {
        let ctx = ActivationContext::new(EntityId::PLAYER, self.position, self.facing).with_aim(aim);
        self.abilities.activate_slot(slot, &mut self.pools, &ctx)
    }

    /// Regenerates, counts modifiers down and advances every ability.
    pub(crate) fn advance(&mut self, delta: Duration, aim: Option<Position>) -> Vec<SlotSignal> {
        self.pools.advance(delta);
        self.abilities.advance(delta, aim)
    }

    /// Full pools, cleared modifiers and reset ability timers. Levels stay.
    pub(crate) fn respawn(&mut self, position: Position) {
        self.position = position;
        self.pools.reset();
        self.abilities.force_reset();
    }
}

impl Combatant for PlayerActor {
    fn id(&self) -> EntityId {
        EntityId::PLAYER
    }

    fn pools(&self) -> &ActorCombatPools {
        &self.pools
    }

    fn pools_mut(&mut self) -> &mut ActorCombatPools {
        &mut self.pools
    }

    fn cells(&self) -> Vec<Position> {
        vec![self.position]
    }
}
