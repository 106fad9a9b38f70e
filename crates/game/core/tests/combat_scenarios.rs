use std::time::Duration;

use maze_core::{
    AbilityId, AbilityKind, ActivationError, ArchetypeProfile, AttackStyle, BehaviorState, Combatant,
    DamageSource, EnemyTier, Facing, MagicPhase, Position, SimEnv, SimEvent, Simulation,
    StaticInput,
};

const FRAME: Duration = Duration::from_millis(50);

const MELEE: usize = 0;
const DASH: usize = 1;
const MAGIC: usize = 2;

/// Runs `ticks` frames and returns every event they produced.
fn run(sim: &mut Simulation, env: &SimEnv<'_>, ticks: usize) -> Vec<SimEvent> {
    (0..ticks).flat_map(|_| sim.tick(FRAME, env).events).collect()
}

/// Stationary target that never attacks.
fn dummy(max_health: i32) -> ArchetypeProfile {
    ArchetypeProfile {
        max_health,
        move_interval: None,
        contact_damage: 0,
        ..ArchetypeProfile::bean()
    }
}

fn hits_on(events: &[SimEvent]) -> Vec<i32> {
    events
        .iter()
        .filter_map(|event| match event {
            SimEvent::AttackHit { damage, .. } => Some(*damage),
            _ => None,
        })
        .collect()
}

/// Level-3 melee against an 8 HP target: the first swing leaves 1 HP, the
/// second kills, and a third swing finds nothing to hit.
#[test]
fn melee_swings_whittle_down_and_kill() {
    let mut sim = Simulation::with_defaults(Position::new(5, 5));
    sim.set_player_pose(Position::new(5, 5), Facing::Right);
    assert!(sim.upgrade_ability(AbilityId::Melee));
    assert!(sim.upgrade_ability(AbilityId::Melee));
    let target = sim
        .spawn_enemy_with(EnemyTier::E02, dummy(8), Position::new(6, 5))
        .expect("roster has room");
    let env = SimEnv::empty();

    // ================================================================
    // First swing
    // ================================================================
    sim.queue_activation(MELEE);
    let events = run(&mut sim, &env, 30);
    assert_eq!(hits_on(&events), vec![7]);
    assert_eq!(sim.enemy(target).map(|enemy| enemy.pools().health()), Some(1));

    // ================================================================
    // Second swing kills and the roster is compacted
    // ================================================================
    sim.queue_activation(MELEE);
    let events = run(&mut sim, &env, 30);
    // Overkill is reported in full: 1 HP left, 7 dealt.
    assert_eq!(hits_on(&events), vec![7]);
    assert!(events.contains(&SimEvent::EnemyDeath {
        enemy: target,
        tier: EnemyTier::E02,
        special_kill: false,
    }));
    assert!(sim.enemy(target).is_none());

    // ================================================================
    // Third swing is a no-op on an empty arc
    // ================================================================
    sim.queue_activation(MELEE);
    let report = sim.tick(FRAME, &env);
    assert!(report.rejected.is_empty());
    assert_eq!(report.count("ability_activated"), 1);
    let events = run(&mut sim, &env, 10);
    assert!(hits_on(&events).is_empty());
}

#[test]
fn chase_is_left_only_beyond_the_hysteresis_band() {
    let mut sim = Simulation::with_defaults(Position::new(6, 0));
    let id = sim
        .spawn_enemy(EnemyTier::E03, Position::ORIGIN)
        .expect("roster has room");
    let env = SimEnv::empty();

    sim.tick(FRAME, &env);
    assert_eq!(sim.enemy(id).map(|enemy| enemy.state()), Some(BehaviorState::Chase));

    // Detect range 7: 10 tiles is outside it but inside 7 * 1.5.
    sim.set_player_pose(Position::new(10, 0), Facing::Left);
    sim.tick(FRAME, &env);
    assert_eq!(sim.enemy(id).map(|enemy| enemy.state()), Some(BehaviorState::Chase));

    sim.set_player_pose(Position::new(11, 0), Facing::Left);
    let report = sim.tick(FRAME, &env);
    assert_eq!(sim.enemy(id).map(|enemy| enemy.state()), Some(BehaviorState::Patrol));
    assert!(report.events.contains(&SimEvent::EnemyStateChanged {
        enemy: id,
        from: BehaviorState::Chase,
        to: BehaviorState::Patrol,
    }));
}

#[test]
fn dash_through_a_shell_shatters_it() {
    let mut sim = Simulation::with_defaults(Position::new(3, 5));
    sim.set_player_pose(Position::new(3, 5), Facing::Right);
    let shell = sim
        .spawn_enemy(EnemyTier::E04, Position::new(7, 5))
        .expect("roster has room");
    let env = SimEnv::empty();

    sim.queue_activation(DASH);
    let report = sim.tick(FRAME, &env);
    assert!(report.events.contains(&SimEvent::DashStarted { charges_left: 1 }));

    // The movement collaborator carries the player onto the shell.
    sim.set_player_pose(Position::new(8, 6), Facing::Right);
    let report = sim.tick(FRAME, &env);
    assert!(report.events.contains(&SimEvent::AttackHit {
        target: shell,
        damage: 50,
        source: DamageSource::DashCollision,
    }));
    assert!(report.events.contains(&SimEvent::EnemyDeath {
        enemy: shell,
        tier: EnemyTier::E04,
        special_kill: true,
    }));
    assert!(sim.enemy(shell).is_none());
    assert_eq!(sim.player().pools().health(), 100);
}

#[test]
fn dash_charges_drain_and_recharge() {
    let mut sim = Simulation::with_defaults(Position::ORIGIN);
    let env = SimEnv::empty();
    let charges = |sim: &Simulation| match sim.player().abilities().slot(DASH).map(|a| a.kind()) {
        Some(AbilityKind::Dash(dash)) => dash.charges(),
        _ => panic!("dash expected in slot 1"),
    };

    sim.queue_activation(DASH);
    run(&mut sim, &env, 17);
    sim.queue_activation(DASH);
    run(&mut sim, &env, 17);
    assert_eq!(charges(&sim), 0);

    sim.queue_activation(DASH);
    let report = sim.tick(FRAME, &env);
    assert_eq!(
        report.rejected,
        vec![ActivationError::NotReady {
            ability: AbilityId::Dash
        }]
    );

    // One charge per two seconds, counted from the first spend.
    run(&mut sim, &env, 10);
    assert_eq!(charges(&sim), 1);
}

#[test]
fn area_cast_hits_every_target_then_heals_by_hit_count() {
    let mut sim = Simulation::with_defaults(Position::new(5, 5));
    let bruiser = ArchetypeProfile {
        contact_damage: 20,
        ..dummy(3)
    };
    sim.spawn_enemy_with(EnemyTier::E02, bruiser, Position::new(5, 5));
    sim.spawn_enemy_with(EnemyTier::E02, dummy(3), Position::new(6, 5));
    sim.spawn_enemy_with(EnemyTier::E02, dummy(3), Position::new(5, 7));
    sim.spawn_enemy_with(EnemyTier::E02, dummy(3), Position::new(8, 8));

    let input = StaticInput::new(Some(Position::new(5, 5)), None);
    let env = SimEnv::empty().with_pointer(&input);

    let report = sim.tick(FRAME, &env);
    assert_eq!(report.count("player_damaged"), 1);
    assert_eq!(sim.player().pools().health(), 80);

    // ================================================================
    // Aim, hold past the minimum, commit
    // ================================================================
    sim.queue_activation(MAGIC);
    run(&mut sim, &env, 4);
    sim.queue_activation(MAGIC);
    let report = sim.tick(FRAME, &env);
    assert!(report.events.contains(&SimEvent::AoeResolved {
        center: Position::new(5, 5),
        radius: 2,
        targets_hit: 3,
    }));
    assert_eq!(report.count("enemy_death"), 3);
    assert_eq!(sim.enemies().len(), 1);

    // ================================================================
    // Deferred heal: 10% + 1% per target
    // ================================================================
    let events = run(&mut sim, &env, 25);
    assert!(events.contains(&SimEvent::PlayerHealed {
        amount: 13,
        health: 93,
    }));
    let magic = sim.player().abilities().slot(MAGIC).expect("magic slot");
    match magic.kind() {
        AbilityKind::Magic(magic) => assert_eq!(magic.phase(), MagicPhase::Cooldown),
        other => panic!("magic expected, got {other:?}"),
    }
}

#[test]
fn sniper_bolt_reaches_the_player() {
    let mut sim = Simulation::with_defaults(Position::new(4, 5));
    sim.spawn_enemy(EnemyTier::E01, Position::new(0, 5));
    let env = SimEnv::empty();

    let events = run(&mut sim, &env, 30);
    assert!(events.iter().any(|event| matches!(event, SimEvent::ProjectileSpawned { .. })));
    let first_hit = events.iter().find_map(|event| match event {
        SimEvent::PlayerDamaged {
            amount,
            health,
            source,
        } => Some((*amount, *health, *source)),
        _ => None,
    });
    assert_eq!(first_hit, Some((10, 90, DamageSource::Projectile)));
}

#[test]
fn contact_attacker_misses_a_player_who_stepped_away() {
    let mut sim = Simulation::with_defaults(Position::new(2, 0));
    let brute = ArchetypeProfile {
        max_health: 20,
        detect_range: 4.0,
        attack_range: 1.0,
        prepare: Duration::from_millis(100),
        cooldown: Duration::from_secs(1),
        move_interval: None,
        attack: AttackStyle::Contact { damage: 12 },
        ..ArchetypeProfile::bean()
    };
    let id = sim
        .spawn_enemy_with(EnemyTier::E03, brute, Position::new(1, 0))
        .expect("roster has room");
    let env = SimEnv::empty();

    // Patrol -> Chase -> Prepare on consecutive ticks.
    run(&mut sim, &env, 2);
    assert_eq!(sim.enemy(id).map(|enemy| enemy.state()), Some(BehaviorState::Prepare));

    sim.set_player_pose(Position::new(4, 0), Facing::Right);
    let events = run(&mut sim, &env, 4);
    assert!(!events.iter().any(|event| matches!(event, SimEvent::PlayerDamaged { .. })));
    assert_eq!(sim.enemy(id).map(|enemy| enemy.state()), Some(BehaviorState::Cooldown));
}

/// The juggernaut slams an adjacent player, cools down, and goes straight
/// back to chasing because the player never left detect range.
#[test]
fn juggernaut_slams_then_rechases_a_player_in_range() {
    let mut sim = Simulation::with_defaults(Position::new(1, 0));
    let id = sim
        .spawn_enemy(EnemyTier::E03, Position::ORIGIN)
        .expect("roster has room");
    let env = SimEnv::empty();

    let events = run(&mut sim, &env, 80);
    let states: Vec<BehaviorState> = events
        .iter()
        .filter_map(|event| match event {
            SimEvent::EnemyStateChanged { enemy, to, .. } if *enemy == id => Some(*to),
            _ => None,
        })
        .collect();
    assert_eq!(
        states,
        vec![
            BehaviorState::Chase,
            BehaviorState::Prepare,
            BehaviorState::Attack,
            BehaviorState::Cooldown,
            BehaviorState::Chase,
            BehaviorState::Prepare,
            BehaviorState::Attack,
            BehaviorState::Cooldown,
        ]
    );

    let damage: Vec<(i32, i32, DamageSource)> = events
        .iter()
        .filter_map(|event| match event {
            SimEvent::PlayerDamaged {
                amount,
                health,
                source,
            } => Some((*amount, *health, *source)),
            _ => None,
        })
        .collect();
    assert_eq!(
        damage,
        vec![(10, 90, DamageSource::Slam), (10, 80, DamageSource::Slam)]
    );
}

#[test]
fn ability_records_survive_a_fresh_simulation() {
    let mut sim = Simulation::with_defaults(Position::new(5, 5));
    assert!(sim.upgrade_ability(AbilityId::Magic));
    let input = StaticInput::new(Some(Position::new(7, 5)), None);
    let env = SimEnv::empty().with_pointer(&input);

    sim.queue_activation(MAGIC);
    run(&mut sim, &env, 2);
    sim.queue_activation(DASH);
    sim.tick(FRAME, &env);
    let records = sim.save_abilities();
    assert_eq!(records.len(), 3);

    let mut restored = Simulation::with_defaults(Position::new(5, 5));
    assert_eq!(restored.restore_abilities(&records), 3);

    let abilities = restored.player().abilities();
    match abilities.slot(MAGIC).map(|ability| (ability.level(), ability.kind())) {
        Some((2, AbilityKind::Magic(magic))) => {
            assert_eq!(magic.phase(), MagicPhase::Aiming);
            assert_eq!(magic.target(), Some(Position::new(7, 5)));
            assert_eq!(magic.radius(), 3);
        }
        other => panic!("level 2 magic expected, got {other:?}"),
    }
    match abilities.slot(DASH).map(|ability| ability.kind()) {
        Some(AbilityKind::Dash(dash)) => assert_eq!(dash.charges(), 1),
        other => panic!("dash expected, got {other:?}"),
    }
}
