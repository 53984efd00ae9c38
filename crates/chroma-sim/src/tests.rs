//! Tests for the simulation engine: actions, economy, splits, game over,
//! restart, and rendering.

use glam::Vec2;
use rand::rngs::mock::StepRng;

use chroma_core::balance::BalanceConfig;
use chroma_core::commands::PlayerCommand;
use chroma_core::constants::MAX_DELTA;
use chroma_core::enums::*;
use chroma_core::events::GameEvent;
use chroma_core::types::GridCell;

use crate::engine::{clamp_delta, SimConfig, SimulationEngine};
use crate::render::{draw_frame, DrawCommand, DrawList};

const DT: f32 = 1.0 / 32.0;

/// Default balance with the timed spawner pushed out of reach, so only
/// scripted enemies appear.
fn quiet_balance() -> BalanceConfig {
    let mut balance = BalanceConfig::default();
    balance.spawner.initial_interval = 1.0e6;
    balance
}

fn quiet_config(mode: GameMode, fire_mode: FireMode) -> SimConfig {
    SimConfig {
        mode,
        fire_mode,
        balance: quiet_balance(),
        ..Default::default()
    }
}

fn snapshot_json<R: rand::Rng + Clone>(engine: &SimulationEngine<R>) -> String {
    serde_json::to_string(&engine.snapshot()).unwrap()
}

// ---- Determinism ----

#[test]
fn test_determinism_same_seed() {
    let config = SimConfig {
        seed: 12345,
        mode: GameMode::Hard,
        ..Default::default()
    };
    let mut engine_a = SimulationEngine::new(config.clone());
    let mut engine_b = SimulationEngine::new(config);
    assert!(engine_a.try_place_tower(1, 3, Hue::Red));
    assert!(engine_b.try_place_tower(1, 3, Hue::Red));

    for _ in 0..600 {
        let changes_a = engine_a.tick(DT);
        let changes_b = engine_b.tick(DT);
        assert_eq!(changes_a, changes_b);
        assert_eq!(
            snapshot_json(&engine_a),
            snapshot_json(&engine_b),
            "Snapshots diverged with same seed"
        );
    }
}

#[test]
fn test_determinism_different_seeds() {
    let mut engine_a = SimulationEngine::new(SimConfig {
        seed: 111,
        mode: GameMode::Hard,
        ..Default::default()
    });
    let mut engine_b = SimulationEngine::new(SimConfig {
        seed: 222,
        mode: GameMode::Hard,
        ..Default::default()
    });

    // Shapes are rolled per spawn; a handful of spawns is enough to differ.
    let mut diverged = false;
    for _ in 0..3000 {
        engine_a.tick(DT);
        engine_b.tick(DT);
        if snapshot_json(&engine_a) != snapshot_json(&engine_b) {
            diverged = true;
            break;
        }
    }
    assert!(diverged, "Different seeds should produce divergent output");
}

// ---- Delta clamping ----

#[test]
fn test_delta_is_clamped() {
    assert_eq!(clamp_delta(10.0), MAX_DELTA);
    assert_eq!(clamp_delta(-1.0), 0.0);
    assert_eq!(clamp_delta(f32::NAN), 0.0);
    assert_eq!(clamp_delta(f32::INFINITY), MAX_DELTA);
    assert_eq!(clamp_delta(DT), DT);

    let mut engine = SimulationEngine::new(SimConfig::default());
    engine.tick(5.0);
    assert_eq!(engine.time().tick, 1);
    assert!((engine.time().elapsed_secs - MAX_DELTA as f64).abs() < 1e-9);
}

#[test]
fn test_stalled_frame_moves_enemy_one_max_step() {
    let mut engine = SimulationEngine::new(quiet_config(GameMode::Normal, FireMode::Projectile));
    engine.spawn_enemy(Hue::Red, Shape::Circle);
    engine.tick(60.0);
    let enemy = &engine.enemies()[0];
    // Circle speed 70 for at most 1/30 s.
    let moved = enemy.position.x - engine.map().path().first().x;
    assert!((moved - 70.0 * MAX_DELTA).abs() < 1e-3);
}

// ---- Tower placement ----

#[test]
fn test_place_tower_spends_money() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    assert_eq!(engine.money(), 100);

    assert!(engine.try_place_tower(0, 0, Hue::Red));
    assert_eq!(engine.money(), 75);
    let tower = engine.tower_at(GridCell::new(0, 0)).unwrap();
    assert_eq!(tower.color, Hue::Red);
    assert_eq!(tower.range.value, 110.0);
    assert_eq!(tower.targeting, TargetingMode::Closest);
    assert_eq!(tower.position, Vec2::new(20.0, 20.0));

    let changes = engine.take_changes();
    assert_eq!(
        changes.events,
        vec![GameEvent::TowerPlaced {
            cell: GridCell::new(0, 0),
            color: Hue::Red,
            cost: 25,
        }]
    );
}

#[test]
fn test_place_tower_rejections_leave_money_untouched() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    assert!(engine.try_place_tower(0, 0, Hue::Red));
    engine.take_changes();

    // Occupied.
    assert!(!engine.try_place_tower(0, 0, Hue::Green));
    // Path cell.
    assert!(!engine.try_place_tower(3, 2, Hue::Red));
    // Off the grid.
    assert!(!engine.try_place_tower(-1, 0, Hue::Red));
    assert!(!engine.try_place_tower(20, 0, Hue::Red));
    assert!(!engine.try_place_tower(0, 15, Hue::Red));
    // 75 left, Blue costs 100.
    assert!(!engine.try_place_tower(5, 5, Hue::Blue));

    assert_eq!(engine.money(), 75);
    assert_eq!(engine.towers().len(), 1);
    assert!(!engine.take_changes().is_changed());
}

#[test]
fn test_hard_mode_starts_poorer() {
    let engine = SimulationEngine::new(SimConfig {
        mode: GameMode::Hard,
        ..Default::default()
    });
    assert_eq!(engine.money(), 50);
    assert_eq!(engine.lives(), 20);
    assert_eq!(engine.wave(), 1);
    assert!(engine.spawner().started);
}

// ---- Upgrades and targeting ----

#[test]
fn test_upgrade_costs_and_effects() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    let cell = GridCell::new(0, 0);
    assert!(engine.try_place_tower(0, 0, Hue::Red));

    assert!(engine.try_upgrade(cell, StatKind::Range));
    assert_eq!(engine.money(), 55);
    let tower = engine.tower_at(cell).unwrap();
    assert_eq!(tower.range.level, 2);
    assert!((tower.range.value - 126.5).abs() < 1e-3);
    assert_eq!(tower.range.next_cost, 30);

    assert!(engine.try_upgrade(cell, StatKind::Damage));
    assert_eq!(engine.money(), 25);
    let tower = engine.tower_at(cell).unwrap();
    assert_eq!(tower.damage.level, 2);
    assert_eq!(tower.damage.value, 10.0);
    assert_eq!(tower.damage.next_cost, 45);

    // 25 left, next damage level costs 45.
    assert!(!engine.try_upgrade(cell, StatKind::Damage));
    assert_eq!(engine.money(), 25);
    // No tower there.
    assert!(!engine.try_upgrade(GridCell::new(5, 5), StatKind::Range));

    let upgrades: Vec<_> = engine
        .take_changes()
        .events
        .into_iter()
        .filter(|e| matches!(e, GameEvent::TowerUpgraded { .. }))
        .collect();
    assert_eq!(upgrades.len(), 2);
}

#[test]
fn test_set_targeting_is_free() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    let cell = GridCell::new(0, 0);
    assert!(engine.try_place_tower(0, 0, Hue::Green));
    engine.take_changes();

    assert!(engine.set_targeting(cell, TargetingMode::Strongest));
    assert_eq!(engine.money(), 50);
    assert_eq!(engine.tower_at(cell).unwrap().targeting, TargetingMode::Strongest);
    assert_eq!(
        engine.take_changes().events,
        vec![GameEvent::TargetingChanged {
            cell,
            mode: TargetingMode::Strongest
        }]
    );

    assert!(!engine.set_targeting(GridCell::new(9, 9), TargetingMode::Closest));
}

// ---- Selection ----

#[test]
fn test_click_selects_and_clears() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    assert!(engine.try_place_tower(0, 0, Hue::Red));
    let money = engine.money();

    assert!(engine.handle_click(Vec2::new(20.0, 20.0)));
    assert_eq!(engine.selected_tower(), Some(GridCell::new(0, 0)));

    // Empty cell clears the selection.
    assert!(!engine.handle_click(Vec2::new(300.0, 500.0)));
    assert_eq!(engine.selected_tower(), None);

    // Outside the field clears too.
    engine.handle_click(Vec2::new(5.0, 5.0));
    assert!(!engine.handle_click(Vec2::new(-50.0, 900.0)));
    assert_eq!(engine.selected_tower(), None);

    assert_eq!(engine.money(), money);
}

#[test]
fn test_execute_dispatches_commands() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    let place: PlayerCommand =
        serde_json::from_str(r#"{"type":"PlaceTower","cell_x":4,"cell_y":4,"color":"Green"}"#).unwrap();
    assert!(engine.execute(place));
    assert_eq!(engine.money(), 50);

    let cell = GridCell::new(4, 4);
    assert!(engine.execute(PlayerCommand::UpgradeTower {
        cell,
        stat: StatKind::FireRate
    }));
    assert_eq!(engine.money(), 25);
    assert!(engine.execute(PlayerCommand::Click {
        x: cell.center().x,
        y: cell.center().y
    }));
    assert_eq!(engine.selected_tower(), Some(cell));
    assert!(engine.execute(PlayerCommand::Restart));
    assert_eq!(engine.money(), 100);
    assert!(engine.towers().is_empty());
}

// ---- Spawning gate ----

#[test]
fn test_normal_mode_waits_for_first_tower() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    for _ in 0..200 {
        engine.tick(DT);
    }
    assert!(engine.enemies().is_empty());
    assert!(!engine.spawner().started);

    assert!(engine.try_place_tower(0, 0, Hue::Red));
    let mut spawned = false;
    for _ in 0..40 {
        let changes = engine.tick(DT);
        spawned |= changes
            .iter()
            .any(|e| matches!(e, GameEvent::EnemySpawned { .. }));
    }
    assert!(spawned);
    assert!(engine.spawner().started);
}

// ---- Splits ----

#[test]
fn test_square_splits_into_triangles_then_circles() {
    let mut engine = SimulationEngine::new(quiet_config(GameMode::Normal, FireMode::Projectile));
    let parent = engine.spawn_enemy(Hue::Red, Shape::Square);
    engine.tick(DT);
    let before = engine.enemies()[0].clone();

    assert!(engine.damage_enemy(parent, 1.0e6));
    let changes = engine.tick(DT);
    assert!(changes.iter().any(|e| *e
        == GameEvent::EnemySplit {
            parent_id: parent,
            child_ids: vec![1, 2],
        }));

    let triangles = engine.enemies();
    assert_eq!(triangles.len(), 2);
    for child in &triangles {
        assert_eq!(child.shape, Shape::Triangle);
        assert_eq!(child.color, Hue::Red);
        assert!((child.max_health - 60.0 * 0.6).abs() < 1e-3);
        assert_eq!(child.health, child.max_health);
        // Children keep the parent's place on the path; they start moving next tick.
        assert_eq!(child.position, before.position);
        assert_eq!(child.waypoint_index, before.waypoint_index);
        assert_eq!(child.progress, before.progress);
    }
    assert_eq!(engine.money(), 108);
    assert_eq!(engine.kills(), 1);
    assert_eq!(engine.death_markers().len(), 1);

    for child in &triangles {
        assert!(engine.damage_enemy(child.id, 1.0e6));
    }
    engine.tick(DT);
    let circles = engine.enemies();
    assert_eq!(circles.len(), 6);
    for circle in &circles {
        assert_eq!(circle.shape, Shape::Circle);
        assert!((circle.max_health - 36.0 * 0.4).abs() < 1e-3);
    }

    for circle in &circles {
        assert!(engine.damage_enemy(circle.id, 1.0e6));
    }
    engine.tick(DT);
    assert!(engine.enemies().is_empty());
    assert_eq!(engine.kills(), 9);
    assert_eq!(engine.money(), 100 + 8 + 2 * 5 + 6 * 3);
    assert_eq!(engine.score(), 8 + 2 * 5 + 6 * 3);
}

#[test]
fn test_enemy_ids_are_unique() {
    let mut engine = SimulationEngine::new(quiet_config(GameMode::Normal, FireMode::Projectile));
    let a = engine.spawn_enemy(Hue::Blue, Shape::Square);
    let b = engine.spawn_enemy(Hue::Blue, Shape::Triangle);
    engine.damage_enemy(a, 1.0e6);
    engine.damage_enemy(b, 1.0e6);
    engine.tick(DT);

    let mut ids: Vec<u32> = engine.enemies().iter().map(|e| e.id).collect();
    assert_eq!(ids.len(), 5);
    ids.dedup();
    assert_eq!(ids.len(), 5);
    assert!(ids.iter().all(|&id| id > b));
}

// ---- Health bounds ----

#[test]
fn test_health_stays_within_bounds() {
    let mut engine = SimulationEngine::new(SimConfig {
        seed: 7,
        mode: GameMode::Hard,
        fire_mode: FireMode::Hitscan,
        ..Default::default()
    });
    assert!(engine.try_place_tower(1, 3, Hue::Red));
    assert!(engine.try_place_tower(4, 3, Hue::Red));

    for _ in 0..2000 {
        engine.tick(DT);
        for enemy in engine.enemies() {
            assert!(enemy.health >= 0.0);
            assert!(enemy.health <= enemy.max_health);
        }
    }
    assert!(engine.kills() > 0);
}

#[test]
fn test_damage_ignores_enemies_at_end() {
    let mut engine = SimulationEngine::new(quiet_config(GameMode::Normal, FireMode::Projectile));
    let id = engine.spawn_enemy(Hue::Red, Shape::Circle);
    assert!(!engine.damage_enemy(id + 1, 5.0));
    assert!(engine.damage_enemy(id, 5.0));
    assert_eq!(engine.enemies()[0].health, 15.0);
}

// ---- Projectiles ----

#[test]
fn test_projectile_tower_kills_scripted_enemy() {
    let mut engine = SimulationEngine::new(quiet_config(GameMode::Normal, FireMode::Projectile));
    assert!(engine.try_place_tower(1, 3, Hue::Red));
    engine.spawn_enemy(Hue::Red, Shape::Circle);

    // Red fires every 22 ticks at 1.5 shots/s.
    for _ in 0..22 {
        engine.tick(DT);
    }
    let tower = engine.tower_at(GridCell::new(1, 3)).unwrap();
    assert_eq!(tower.projectiles.len(), 1);
    assert_eq!(tower.projectiles[0].target_id, 0);

    for _ in 0..200 {
        engine.tick(DT);
    }
    assert_eq!(engine.kills(), 1);
    assert_eq!(engine.money(), 100 - 25 + 3);
    assert!(engine.enemies().is_empty());
}

#[test]
fn test_cooldown_gates_fire_rate() {
    let mut balance = quiet_balance();
    balance.enemies[Shape::Circle.index()].speed = 0.0;
    balance.enemies[Shape::Circle.index()].base_health = 1.0e6;
    let mut engine = SimulationEngine::new(SimConfig {
        fire_mode: FireMode::Hitscan,
        balance,
        ..Default::default()
    });
    assert!(engine.try_place_tower(1, 3, Hue::Red));
    engine.spawn_enemy(Hue::Red, Shape::Circle);

    let mut shot_ticks = Vec::new();
    for tick in 1..=220 {
        let changes = engine.tick(DT);
        if changes.iter().any(|e| matches!(e, GameEvent::ShotFired { .. })) {
            shot_ticks.push(tick);
        }
    }
    // 1 / 1.5 s interval: the cooldown first reaches it after 22 ticks.
    assert_eq!(shot_ticks, (1..=10).map(|n| n * 22).collect::<Vec<_>>());
}

// ---- Game over ----

#[test]
fn test_lives_hit_zero_and_ticks_become_noops() {
    let mut engine = SimulationEngine::new(quiet_config(GameMode::Normal, FireMode::Projectile));
    for _ in 0..21 {
        engine.spawn_enemy(Hue::Red, Shape::Circle);
    }
    engine.take_changes();

    let mut lives_lost = 0;
    let mut ticks = 0;
    while !engine.is_game_over() && ticks < 5000 {
        let changes = engine.tick(DT);
        lives_lost += changes
            .iter()
            .filter(|e| matches!(e, GameEvent::LifeLost { .. }))
            .count();
        ticks += 1;
    }

    assert!(engine.is_game_over());
    assert_eq!(engine.lives(), 0);
    assert_eq!(lives_lost, 21);

    let before = snapshot_json(&engine);
    let changes = engine.tick(DT);
    assert!(!changes.is_changed());
    assert_eq!(snapshot_json(&engine), before);

    assert!(!engine.try_place_tower(0, 0, Hue::Red));
    assert_eq!(snapshot_json(&engine), before);
}

#[test]
fn test_each_escape_costs_one_life() {
    let mut engine = SimulationEngine::new(quiet_config(GameMode::Normal, FireMode::Projectile));
    engine.spawn_enemy(Hue::Red, Shape::Circle);
    engine.spawn_enemy(Hue::Red, Shape::Square);

    let mut events = Vec::new();
    for _ in 0..3000 {
        events.extend(engine.tick(DT).events);
    }
    let lost: Vec<i32> = events
        .iter()
        .filter_map(|e| match e {
            GameEvent::LifeLost { lives_left, .. } => Some(*lives_left),
            _ => None,
        })
        .collect();
    assert_eq!(lost, vec![19, 18]);
    assert_eq!(engine.lives(), 18);
    assert!(!engine.is_game_over());
}

// ---- Restart ----

#[test]
fn test_restart_matches_fresh_engine() {
    let config = SimConfig {
        seed: 99,
        mode: GameMode::Hard,
        ..Default::default()
    };
    let fresh = SimulationEngine::new(config.clone());
    let mut engine = SimulationEngine::new(config);

    assert!(engine.try_place_tower(1, 3, Hue::Red));
    engine.handle_click(Vec2::new(60.0, 140.0));
    for _ in 0..400 {
        engine.tick(DT);
    }
    assert_ne!(snapshot_json(&engine), snapshot_json(&fresh));

    engine.restart();
    assert_eq!(snapshot_json(&engine), snapshot_json(&fresh));
    assert_eq!(engine.take_changes().events, vec![GameEvent::Restarted]);
}

#[test]
fn test_restart_replays_the_same_random_sequence() {
    let config = SimConfig {
        seed: 5,
        mode: GameMode::Hard,
        ..Default::default()
    };
    let mut reference = SimulationEngine::new(config.clone());
    let mut engine = SimulationEngine::new(config);
    for _ in 0..300 {
        engine.tick(DT);
    }
    engine.restart();

    for _ in 0..300 {
        reference.tick(DT);
        engine.tick(DT);
    }
    assert_eq!(snapshot_json(&engine), snapshot_json(&reference));
}

#[test]
fn test_restart_after_game_over() {
    let mut engine = SimulationEngine::new(quiet_config(GameMode::Normal, FireMode::Projectile));
    for _ in 0..20 {
        engine.spawn_enemy(Hue::Green, Shape::Circle);
    }
    for _ in 0..2000 {
        engine.tick(DT);
    }
    assert!(engine.is_game_over());
    // Actions other than restart fail.
    assert!(!engine.execute(PlayerCommand::PlaceTower {
        cell_x: 0,
        cell_y: 0,
        color: Hue::Red
    }));

    assert!(engine.execute(PlayerCommand::Restart));
    assert!(!engine.is_game_over());
    assert_eq!(engine.lives(), 20);
    assert!(engine.enemies().is_empty());
}

// ---- Scripted rng ----

#[test]
fn test_step_rng_spawns_red_circles() {
    let config = SimConfig {
        mode: GameMode::Hard,
        ..Default::default()
    };
    let mut engine = SimulationEngine::with_rng(config, StepRng::new(0, 0));
    for _ in 0..(32 * 5) {
        engine.tick(DT);
    }
    let enemies = engine.enemies();
    assert_eq!(enemies.len(), 5);
    assert!(enemies
        .iter()
        .all(|e| e.color == Hue::Red && e.shape == Shape::Circle));
}

// ---- Rendering ----

#[test]
fn test_draw_frame_emits_scene() {
    let mut engine = SimulationEngine::new(quiet_config(GameMode::Normal, FireMode::Projectile));
    assert!(engine.try_place_tower(1, 3, Hue::Blue));
    engine.handle_click(Vec2::new(60.0, 140.0));
    engine.spawn_enemy(Hue::Green, Shape::Circle);
    engine.tick(DT);

    let snapshot = engine.snapshot();
    let mut list = DrawList::new();
    draw_frame(engine.map(), &snapshot, &mut list);

    assert!(matches!(list.commands[0], DrawCommand::Clear { .. }));

    let enemy = &snapshot.enemies[0];
    let enemy_circles = list
        .commands
        .iter()
        .filter(|c| {
            matches!(c, DrawCommand::FillCircle { center, radius, .. }
                if *center == enemy.position && *radius == enemy.radius)
        })
        .count();
    assert_eq!(enemy_circles, 1);

    let lines = list
        .commands
        .iter()
        .filter(|c| matches!(c, DrawCommand::Line { .. }))
        .count();
    // Grid (21 + 16), path legs (6), range ring of the selected tower (48).
    assert_eq!(lines, 21 + 16 + 6 + 48);

    // The recorded list is plain data a host can ship elsewhere.
    let json = serde_json::to_string(&list).unwrap();
    assert!(json.starts_with(r#"{"commands":[{"op":"Clear""#));
}
