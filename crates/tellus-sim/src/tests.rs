//! Tests for the world engine, the tick loop, spawning, and the event triggers.

use glam::DVec2;
use proptest::prelude::*;

use tellus_core::city::City;
use tellus_core::enums::{EntityKind, FlavorCause, Good, Orientation, ScoutMode, WorkerMode};
use tellus_core::events::NotificationKind;
use tellus_core::ids::{CityId, EntityId, PlateId};
use tellus_core::types::TileCoord;
use tellus_terrain::{BlockLayout, Terrain};

use crate::config::SimConfig;
use crate::engine::{TickReport, World};
use crate::entity::{Entity, EntityBody};
use crate::factory::{CropFactory, SpawnError, SpawnRequest};
use crate::save::SaveState;
use crate::trigger::earthquake::damage_at;
use crate::trigger::{
    AshCloudConfig, DroughtConfig, EarthquakeConfig, Empty, EmptyConfig, EndOfTheWorld,
    EventTrigger, ForeignDrought, LocalAshCloud, LocalEarthquake, RollTarget, TriggerConfig,
};

// ---- Fixtures ----

/// `n` one-tile plates in a row: plate distance is the difference of ids.
fn strip(n: u32) -> Terrain {
    Terrain::block_layout(BlockLayout {
        plates_x: n,
        plates_y: 1,
        plate_size: 1,
    })
    .unwrap()
}

fn bare_world(terrain: Terrain) -> World {
    World::new(&SimConfig::bare(42), terrain).unwrap()
}

fn crop_at(world: &mut World, x: i32, health: u32) -> EntityId {
    world
        .spawn_kind(EntityKind::Crop, SpawnRequest::new(TileCoord::new(x, 0), health))
        .unwrap()
}

fn health(world: &World, id: EntityId) -> Option<u32> {
    world.entity(id).map(|e| e.element().health())
}

/// 3×3 plates of 4×4 tiles with moving plates, a volcano, two cities and a
/// handful of entities. Every trigger is likely enough to fire within a few
/// dozen ticks.
fn demo_world(seed: u64) -> World {
    let layout = BlockLayout {
        plates_x: 3,
        plates_y: 3,
        plate_size: 4,
    };
    let mut terrain = Terrain::block_layout(layout).unwrap();
    for i in 0..9u32 {
        let angle = f64::from(i) * 0.7;
        terrain
            .set_movement(PlateId(i), DVec2::new(angle.cos(), angle.sin()) * f64::from(i % 3 + 1))
            .unwrap();
    }
    terrain.set_volcanic(TileCoord::new(5, 5), true).unwrap();
    terrain.set_volcanic(TileCoord::new(6, 5), true).unwrap();

    let config = SimConfig {
        seed,
        triggers: vec![
            TriggerConfig::Empty(EmptyConfig {
                probability: 0.1,
                ..EmptyConfig::default()
            }),
            TriggerConfig::LocalEarthquake(EarthquakeConfig {
                k: 0.02,
                base_damage: 5,
                ..EarthquakeConfig::default()
            }),
            TriggerConfig::LocalAshCloud(AshCloudConfig {
                k: 0.02,
                duration_ticks: 5,
                ..AshCloudConfig::default()
            }),
            TriggerConfig::ForeignDrought(DroughtConfig {
                max_probability: 0.2,
                duration_ticks: 4,
                ..DroughtConfig::default()
            }),
            TriggerConfig::EndOfTheWorld(crate::trigger::EndOfTheWorldConfig {
                target_tick: Some(20),
                fired: false,
            }),
        ],
    };
    let mut world = World::new(&config, terrain).unwrap();
    let rome = world.add_city(
        City::new("Rome")
            .with_latitude(3.0)
            .with_export(Good::Grain, 80)
            .with_import(Good::Ore, 10),
    );
    world.add_city(City::new("Thule").with_latitude(64.0));

    let owned = |x, y| SpawnRequest::new(TileCoord::new(x, y), 40).owned_by(rome);
    let worker = world.spawn_kind(EntityKind::Worker, owned(1, 1)).unwrap();
    let scout = world.spawn_kind(EntityKind::Scout, owned(6, 6)).unwrap();
    world.spawn_kind(EntityKind::Airport, owned(9, 2)).unwrap();
    world.spawn_kind(EntityKind::Farm, owned(2, 9)).unwrap();
    for x in [0, 4, 8, 11] {
        world
            .spawn_kind(EntityKind::Crop, SpawnRequest::new(TileCoord::new(x, 11), 25))
            .unwrap();
    }
    if let Some(EntityBody::Worker(w)) = world.entity_mut(worker) {
        w.select(WorkerMode::Farming);
    }
    if let Some(EntityBody::Scout(s)) = world.entity_mut(scout) {
        s.select(ScoutMode::Wander);
    }
    world
}

fn count<F: Fn(&NotificationKind) -> bool>(report: &TickReport, pred: F) -> usize {
    report.notifications.iter().filter(|n| pred(&n.kind)).count()
}

// ---- Determinism ----

#[test]
fn test_determinism_same_seed() {
    let mut world_a = demo_world(12345);
    let mut world_b = demo_world(12345);

    for _ in 0..300 {
        let report_a = world_a.advance_tick();
        let report_b = world_b.advance_tick();
        assert_eq!(report_a, report_b);

        let json_a = serde_json::to_string(&world_a.snapshot()).unwrap();
        let json_b = serde_json::to_string(&world_b.snapshot()).unwrap();
        assert_eq!(json_a, json_b, "Snapshots diverged with same seed");
    }
}

#[test]
fn test_determinism_different_seeds() {
    let mut world_a = demo_world(111);
    let mut world_b = demo_world(222);

    let mut diverged = false;
    for _ in 0..200 {
        world_a.advance_tick();
        world_b.advance_tick();
        let json_a = serde_json::to_string(&world_a.snapshot()).unwrap();
        let json_b = serde_json::to_string(&world_b.snapshot()).unwrap();
        if json_a != json_b {
            diverged = true;
            break;
        }
    }
    assert!(diverged, "Different seeds should produce divergent output");
}

#[test]
fn test_tick_counter_starts_at_zero() {
    let mut world = bare_world(strip(2));
    assert_eq!(world.tick(), 0);
    assert_eq!(world.advance_tick().tick, 1);
    assert_eq!(world.advance_tick().tick, 2);
    assert_eq!(world.snapshot().time.tick, 2);
}

// ---- Spawning ----

#[test]
fn test_ids_strictly_increase() {
    let mut world = bare_world(strip(4));
    let ids: Vec<EntityId> = (0..4).map(|x| crop_at(&mut world, x, 5)).collect();
    assert!(ids.windows(2).all(|w| w[0] < w[1]));

    world.remove_entity(ids[3]).unwrap();
    let next = crop_at(&mut world, 3, 5);
    assert!(next > ids[3], "ids are never reused");
}

#[test]
fn test_failed_spawn_changes_nothing() {
    let mut terrain = strip(3);
    terrain.set_volcanic(TileCoord::new(1, 0), true).unwrap();
    let mut world = bare_world(terrain);
    crop_at(&mut world, 0, 5);

    let before = world.save().unwrap().to_json().unwrap();
    let err = world
        .spawn(&CropFactory, SpawnRequest::new(TileCoord::new(1, 0), 5))
        .unwrap_err();
    assert!(matches!(err, SpawnError::Rejected { kind: EntityKind::Crop, .. }));
    let err = world
        .spawn_kind(
            EntityKind::Worker,
            SpawnRequest::new(TileCoord::new(2, 0), 5).owned_by(CityId(3)),
        )
        .unwrap_err();
    assert!(matches!(err, SpawnError::UnknownCity(CityId(3))));
    let after = world.save().unwrap().to_json().unwrap();
    assert_eq!(before, after);

    assert_eq!(crop_at(&mut world, 2, 5), EntityId(1));
}

#[test]
fn test_entities_in_tile() {
    let mut world = bare_world(strip(3));
    let a = crop_at(&mut world, 1, 5);
    let b = crop_at(&mut world, 1, 5);
    crop_at(&mut world, 2, 5);
    let here: Vec<EntityId> = world
        .entities_in_tile(TileCoord::new(1, 0))
        .map(|e| e.id())
        .collect();
    assert_eq!(here, vec![a, b]);
}

#[test]
fn test_patrolling_scout_turns_and_steps() {
    let terrain = Terrain::block_layout(BlockLayout {
        plates_x: 1,
        plates_y: 1,
        plate_size: 5,
    })
    .unwrap();
    let mut world = bare_world(terrain);
    let city = world.add_city(City::new("Delos"));
    let id = world
        .spawn_kind(
            EntityKind::Scout,
            SpawnRequest::new(TileCoord::new(2, 2), 10).owned_by(city),
        )
        .unwrap();
    if let Some(EntityBody::Scout(s)) = world.entity_mut(id) {
        s.select(ScoutMode::Patrol);
    }
    world.advance_tick();
    let element = world.entity(id).unwrap().element().clone();
    assert_eq!(element.orientation, Orientation::East);
    assert_eq!(element.position, TileCoord::new(3, 2));

    // Four turns bring it back to where it started.
    for _ in 0..3 {
        world.advance_tick();
    }
    assert_eq!(world.entity(id).unwrap().element().position, TileCoord::new(2, 2));
}

#[test]
fn test_mutable_access_keeps_identity() {
    let mut world = bare_world(strip(3));
    let a = crop_at(&mut world, 0, 10);
    let b = crop_at(&mut world, 1, 10);
    {
        let element = world.entity_mut(a).unwrap().element_mut();
        element.position = TileCoord::new(2, 0);
        element.orientation = Orientation::West;
        element.apply_damage(4);
    }
    assert_eq!(world.entity(a).unwrap().id(), a);
    assert_eq!(world.entity(a).unwrap().element().position, TileCoord::new(2, 0));
    let ids: Vec<EntityId> = world.entities().iter().map(|e| e.id()).collect();
    assert_eq!(ids, vec![a, b]);
}

// ---- LocalEarthquake ----

#[test]
fn test_earthquake_damage_falls_off_with_plate_distance() {
    let mut terrain = strip(5);
    terrain.set_movement(PlateId(0), DVec2::new(1.0, 0.0)).unwrap();
    terrain.set_movement(PlateId(1), DVec2::new(-1.0, 0.0)).unwrap();
    let mut world = bare_world(terrain);
    let crops: Vec<EntityId> = (1..5).map(|x| crop_at(&mut world, x, 100)).collect();
    world.register_trigger(Box::new(LocalEarthquake::new(EarthquakeConfig {
        k: 0.5,
        base_damage: 6,
        radius: 2,
    })));

    let report = world.advance_tick();
    let healths: Vec<u32> = crops.iter().map(|&id| health(&world, id).unwrap()).collect();
    assert_eq!(healths, vec![94, 97, 98, 100]);

    let quake = report
        .notifications
        .iter()
        .find_map(|n| match &n.kind {
            NotificationKind::Earthquake { epicenter, hits, .. } => Some((*epicenter, hits.clone())),
            _ => None,
        })
        .unwrap();
    assert_eq!(quake.0, (PlateId(0), PlateId(1)));
    let trace: Vec<(u32, u32)> = quake.1.iter().map(|h| (h.distance, h.amount)).collect();
    assert_eq!(trace, vec![(0, 6), (1, 3), (2, 2)]);
}

#[test]
fn test_earthquake_picks_most_active_boundary() {
    let mut terrain = strip(4);
    terrain.set_movement(PlateId(1), DVec2::new(0.0, 1.0)).unwrap();
    terrain.set_movement(PlateId(3), DVec2::new(0.0, 3.0)).unwrap();
    let world = bare_world(terrain);
    let quake = LocalEarthquake::new(EarthquakeConfig {
        k: 0.1,
        ..EarthquakeConfig::default()
    });
    let rolls = quake.rolls(world.state()).unwrap();
    assert_eq!(rolls.len(), 1);
    assert_eq!(rolls[0].target, RollTarget::Boundary(PlateId(2), PlateId(3)));
    assert!((rolls[0].probability - 0.3).abs() < 1e-12);
}

#[test]
fn test_earthquake_ties_go_to_first_boundary() {
    let world = bare_world(strip(3));
    let quake = LocalEarthquake::new(EarthquakeConfig::default());
    let rolls = quake.rolls(world.state()).unwrap();
    assert_eq!(rolls[0].target, RollTarget::Boundary(PlateId(0), PlateId(1)));
    assert_eq!(rolls[0].probability, 0.0);
}

#[test]
fn test_single_plate_has_no_earthquakes() {
    let world = bare_world(strip(1));
    let quake = LocalEarthquake::new(EarthquakeConfig::default());
    assert!(quake.rolls(world.state()).unwrap().is_empty());
    assert_eq!(quake.probability(world.state()).unwrap(), 0.0);
}

// ---- LocalAshCloud ----

#[test]
fn test_ash_cloud_expires_after_duration() {
    let mut terrain = strip(5);
    terrain.set_volcanic(TileCoord::new(0, 0), true).unwrap();
    let mut world = bare_world(terrain);
    let handle = world.register_trigger(Box::new(LocalAshCloud::new(AshCloudConfig {
        k: 1.0,
        duration_ticks: 3,
        pollution_increment: 2,
        radius: 2,
    })));

    let report = world.advance_tick();
    assert_eq!(count(&report, |k| matches!(k, NotificationKind::AshCloud { .. })), 1);
    world.unregister_trigger(handle).unwrap();
    for plate in 0..3 {
        assert_eq!(world.ash_state(PlateId(plate)).map(|a| a.remaining_ticks), Some(3));
    }
    assert!(world.ash_state(PlateId(3)).is_none());

    world.advance_tick();
    world.advance_tick();
    assert!(world.terrain().is_ashed(TileCoord::new(2, 0)));
    let report = world.advance_tick();
    assert_eq!(report.tick, 4);
    assert_eq!(
        count(&report, |k| matches!(k, NotificationKind::AshCloudCleared { .. })),
        3
    );
    assert!(world.ash_state(PlateId(0)).is_none());
    assert!(!world.terrain().is_ashed(TileCoord::new(0, 0)));

    let polluted = world.terrain().plate_pollution(PlateId(1));
    assert_eq!(polluted, 6);
    world.advance_tick();
    assert_eq!(world.terrain().plate_pollution(PlateId(1)), polluted);
    assert_eq!(world.terrain().plate_pollution(PlateId(3)), 0);
}

#[test]
fn test_plates_without_magma_never_erupt() {
    let world = bare_world(strip(3));
    let ash = LocalAshCloud::new(AshCloudConfig {
        k: 1.0,
        ..AshCloudConfig::default()
    });
    assert!(ash.rolls(world.state()).unwrap().is_empty());
}

#[test]
fn test_ash_grounds_airports() {
    let mut terrain = strip(5);
    terrain.set_volcanic(TileCoord::new(0, 0), true).unwrap();
    let mut world = bare_world(terrain);
    let city = world.add_city(City::new("Pompeii"));
    let near = world
        .spawn_kind(EntityKind::Airport, SpawnRequest::new(TileCoord::new(1, 0), 10).owned_by(city))
        .unwrap();
    let far = world
        .spawn_kind(EntityKind::Airport, SpawnRequest::new(TileCoord::new(4, 0), 10).owned_by(city))
        .unwrap();
    let crop = crop_at(&mut world, 3, 10);
    assert_eq!(world.airport_grounded(crop), None);
    assert!(world.air_connection_allowed(near, far));

    let handle = world.register_trigger(Box::new(LocalAshCloud::new(AshCloudConfig {
        k: 1.0,
        duration_ticks: 2,
        ..AshCloudConfig::default()
    })));
    world.advance_tick();
    world.unregister_trigger(handle);
    assert_eq!(world.airport_grounded(near), Some(true));
    assert_eq!(world.airport_grounded(far), Some(false));
    assert!(!world.air_connection_allowed(near, far));

    world.advance_tick();
    world.advance_tick();
    assert!(world.air_connection_allowed(near, far));
}

#[test]
fn test_crops_do_not_grow_under_ash() {
    let mut terrain = strip(4);
    terrain.set_volcanic(TileCoord::new(0, 0), true).unwrap();
    let mut world = bare_world(terrain);
    let ashed = crop_at(&mut world, 1, 10);
    let clear = crop_at(&mut world, 3, 10);
    world.register_trigger(Box::new(LocalAshCloud::new(AshCloudConfig {
        k: 1.0,
        duration_ticks: 50,
        radius: 1,
        ..AshCloudConfig::default()
    })));
    for _ in 0..5 {
        world.advance_tick();
    }
    let growth = |world: &World, id| match world.entity(id) {
        Some(EntityBody::Feature(f)) => f.growth(),
        _ => panic!("not a crop"),
    };
    // Ash arrives at the end of tick 1, after the crops grew once.
    assert_eq!(growth(&world, ashed), 1);
    assert_eq!(growth(&world, clear), 5);
}

// ---- ForeignDrought ----

#[test]
fn test_drought_probability_follows_latitude_band() {
    let mut world = bare_world(strip(1));
    world.add_city(City::new("Equator").with_latitude(0.0));
    world.add_city(City::new("North").with_latitude(20.0));
    world.add_city(City::new("Edge").with_latitude(7.5));
    world.add_city(City::new("Nowhere"));
    let drought = ForeignDrought::new(DroughtConfig {
        max_probability: 1.0,
        ..DroughtConfig::default()
    });

    let rolls = drought.rolls(world.state()).unwrap();
    let probabilities: Vec<f64> = rolls.iter().map(|r| r.probability).collect();
    assert_eq!(probabilities, vec![1.0, 0.0, 0.5, 0.0]);
    let targets: Vec<RollTarget> = rolls.iter().map(|r| r.target).collect();
    assert_eq!(
        targets,
        (0..4).map(|i| RollTarget::City(CityId(i))).collect::<Vec<_>>()
    );
}

#[test]
fn test_drought_cuts_farming_trade_and_reverts() {
    let mut world = bare_world(strip(1));
    let hot = world.add_city(
        City::new("Kemet")
            .with_latitude(0.0)
            .with_export(Good::Grain, 100)
            .with_export(Good::Ore, 40)
            .with_import(Good::Fruit, 20),
    );
    let cold = world.add_city(City::new("Thule").with_latitude(20.0).with_export(Good::Grain, 100));
    let handle = world.register_trigger(Box::new(ForeignDrought::new(DroughtConfig {
        max_probability: 1.0,
        duration_ticks: 2,
        export_cut_pct: 50,
        import_boost_pct: 50,
        ..DroughtConfig::default()
    })));

    let report = world.advance_tick();
    world.unregister_trigger(handle);
    assert_eq!(count(&report, |k| matches!(k, NotificationKind::Drought { city, .. } if *city == hot)), 1);
    let kemet = world.city(hot).unwrap();
    assert_eq!(kemet.export_capacity(Good::Grain), 50);
    assert_eq!(kemet.export_capacity(Good::Ore), 40);
    assert_eq!(kemet.import_demand(Good::Fruit), 30);
    assert_eq!(world.city(cold).unwrap().export_capacity(Good::Grain), 100);

    world.advance_tick();
    let report = world.advance_tick();
    assert_eq!(count(&report, |k| matches!(k, NotificationKind::DroughtEnded { .. })), 1);
    let kemet = world.city(hot).unwrap();
    assert!(kemet.drought().is_none());
    assert_eq!(kemet.export_capacity(Good::Grain), 100);
    assert_eq!(kemet.import_demand(Good::Fruit), 20);
}

// ---- Empty ----

#[test]
fn test_empty_trigger_leaves_world_untouched() {
    let mut world = demo_world(9);
    for _ in 0..10 {
        world.advance_tick();
    }
    world.state_mut().notifications.clear();
    let before_save = world.save().unwrap().to_json().unwrap();
    let mut before_snapshot = world.snapshot();
    before_snapshot.notifications.clear();

    let mut empty = Empty::new(EmptyConfig::default());
    for _ in 0..1000 {
        empty.apply(RollTarget::World, world.state_mut()).unwrap();
    }

    let flavor: Vec<FlavorCause> = world
        .notifications()
        .iter()
        .filter_map(|n| match n.kind {
            NotificationKind::Flavor { cause, .. } => Some(cause),
            _ => None,
        })
        .collect();
    assert_eq!(flavor.len(), 1000);
    assert_eq!(&flavor[..5], &FlavorCause::ALL[..]);

    let mut after_snapshot = world.snapshot();
    after_snapshot.notifications.clear();
    assert_eq!(before_snapshot, after_snapshot);
    assert_eq!(before_save, world.save().unwrap().to_json().unwrap());
}

// ---- EndOfTheWorld ----

#[test]
fn test_end_of_the_world_fires_once() {
    let mut world = bare_world(strip(2));
    let handle = world.register_trigger(Box::new(EndOfTheWorld::at(5)));
    let mut fired_at = Vec::new();
    for _ in 0..20 {
        let report = world.advance_tick();
        if count(&report, |k| matches!(k, NotificationKind::WorldDidNotEnd { target_tick: 5 })) > 0 {
            fired_at.push(report.tick);
        }
    }
    assert_eq!(fired_at, vec![5]);
    assert_eq!(world.trigger_fire_count(handle), Some(1));
}

// ---- Trigger framework ----

#[test]
fn test_bad_probability_is_isolated() {
    let mut terrain = strip(2);
    terrain.set_movement(PlateId(0), DVec2::new(1.0, 0.0)).unwrap();
    let mut world = bare_world(terrain);
    let quake = world.register_trigger(Box::new(LocalEarthquake::new(EarthquakeConfig {
        k: f64::NAN,
        ..EarthquakeConfig::default()
    })));
    let empty = world.register_trigger(Box::new(Empty::new(EmptyConfig {
        probability: 1.0,
        next_cause: 0,
    })));

    let report = world.advance_tick();
    let failed: Vec<&str> = report
        .notifications
        .iter()
        .filter_map(|n| match &n.kind {
            NotificationKind::TriggerFailed { trigger, .. } => Some(trigger.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(failed, vec!["LocalEarthquake"]);
    assert_eq!(count(&report, |k| matches!(k, NotificationKind::Flavor { .. })), 1);
    assert_eq!(world.trigger_fire_count(quake), Some(0));
    assert_eq!(world.trigger_fire_count(empty), Some(1));
}

/// Rolls twice at certainty and fails every apply.
#[derive(Debug)]
struct AlwaysFails;

impl EventTrigger for AlwaysFails {
    fn name(&self) -> &str {
        "AlwaysFails"
    }

    fn rolls(&self, _state: &crate::WorldState) -> Result<Vec<crate::trigger::Roll>, crate::trigger::TriggerError> {
        Ok(vec![
            crate::trigger::Roll::new(1.0, RollTarget::World),
            crate::trigger::Roll::new(1.0, RollTarget::World),
        ])
    }

    fn apply(
        &mut self,
        target: RollTarget,
        _state: &mut crate::WorldState,
    ) -> Result<(), crate::trigger::TriggerError> {
        Err(crate::trigger::TriggerError::UnexpectedTarget(target))
    }
}

#[test]
fn test_failed_apply_skips_remaining_rolls() {
    let mut world = bare_world(strip(1));
    let failing = world.register_trigger(Box::new(AlwaysFails));
    let report = world.advance_tick();
    assert_eq!(
        count(&report, |k| matches!(k, NotificationKind::TriggerFailed { .. })),
        1
    );
    assert_eq!(world.trigger_fire_count(failing), Some(0));
}

#[test]
fn test_unregistered_trigger_stops_firing() {
    let mut world = bare_world(strip(1));
    let handle = world.register_trigger(Box::new(Empty::new(EmptyConfig {
        probability: 1.0,
        next_cause: 0,
    })));
    let report = world.advance_tick();
    assert_eq!(count(&report, |k| matches!(k, NotificationKind::Flavor { .. })), 1);

    assert!(world.unregister_trigger(handle).is_some());
    assert!(world.unregister_trigger(handle).is_none());
    let report = world.advance_tick();
    assert!(report.notifications.is_empty());
    assert_eq!(world.trigger_fire_count(handle), None);
}

#[test]
fn test_probability_is_max_over_rolls() {
    let mut world = bare_world(strip(1));
    world.add_city(City::new("A").with_latitude(12.0));
    world.add_city(City::new("B").with_latitude(3.0));
    let drought = ForeignDrought::new(DroughtConfig {
        max_probability: 0.5,
        ..DroughtConfig::default()
    });
    let p = drought.probability(world.state()).unwrap();
    assert!((p - 0.4).abs() < 1e-12);
}

// ---- Removal policy ----

#[test]
fn test_destroyed_elements_are_removed_at_end_of_tick() {
    let mut terrain = strip(3);
    terrain.set_movement(PlateId(0), DVec2::new(2.0, 0.0)).unwrap();
    let mut world = bare_world(terrain);
    let fragile = crop_at(&mut world, 0, 3);
    let sturdy = crop_at(&mut world, 1, 50);
    world.register_trigger(Box::new(LocalEarthquake::new(EarthquakeConfig {
        k: 1.0,
        base_damage: 6,
        radius: 2,
    })));

    let report = world.advance_tick();
    assert!(world.entity(fragile).is_none());
    assert_eq!(health(&world, sturdy), Some(44));
    let destroyed: Vec<(EntityId, EntityKind)> = report
        .notifications
        .iter()
        .filter_map(|n| match n.kind {
            NotificationKind::ElementDestroyed { entity, kind } => Some((entity, kind)),
            _ => None,
        })
        .collect();
    assert_eq!(destroyed, vec![(fragile, EntityKind::Crop)]);
    assert!(world.snapshot().entities.iter().all(|e| e.id != fragile));
}

// ---- Persistence ----

#[test]
fn test_restored_world_continues_identically() {
    let mut original = demo_world(77);
    for _ in 0..25 {
        original.advance_tick();
    }
    let json = original.save().unwrap().to_json().unwrap();
    let mut restored = World::restore(SaveState::from_json(&json).unwrap()).unwrap();
    assert_eq!(restored.tick(), 25);

    for _ in 0..50 {
        let a = original.advance_tick();
        let b = restored.advance_tick();
        assert_eq!(a, b);
        assert_eq!(
            serde_json::to_string(&original.snapshot()).unwrap(),
            serde_json::to_string(&restored.snapshot()).unwrap()
        );
    }
}

#[test]
fn test_restore_rejects_stale_id_counter() {
    let mut world = bare_world(strip(3));
    crop_at(&mut world, 0, 10);
    crop_at(&mut world, 1, 10);
    let json = world.save().unwrap().to_json().unwrap();
    assert!(json.contains(r#""next":2"#));

    let stale = json.replace(r#""next":2"#, r#""next":0"#);
    let result = World::restore(SaveState::from_json(&stale).unwrap());
    assert!(matches!(
        result,
        Err(crate::save::SaveError::InconsistentEntityIds)
    ));

    let mut restored = World::restore(SaveState::from_json(&json).unwrap()).unwrap();
    assert_eq!(crop_at(&mut restored, 2, 10), EntityId(2));
}

#[test]
fn test_restore_keeps_floats_bit_exact() {
    let world = demo_world(5);
    let json = world.save().unwrap().to_json().unwrap();
    let restored = World::restore(SaveState::from_json(&json).unwrap()).unwrap();
    for (a, b) in world.terrain().plates().iter().zip(restored.terrain().plates()) {
        assert_eq!(a.movement.x.to_bits(), b.movement.x.to_bits());
        assert_eq!(a.movement.y.to_bits(), b.movement.y.to_bits());
    }
    assert_eq!(world.save().unwrap(), restored.save().unwrap());
}

#[derive(Debug)]
struct Unsaveable;

impl EventTrigger for Unsaveable {
    fn name(&self) -> &str {
        "Unsaveable"
    }

    fn rolls(&self, _state: &crate::WorldState) -> Result<Vec<crate::trigger::Roll>, crate::trigger::TriggerError> {
        Ok(Vec::new())
    }

    fn apply(
        &mut self,
        _target: RollTarget,
        _state: &mut crate::WorldState,
    ) -> Result<(), crate::trigger::TriggerError> {
        Ok(())
    }
}

#[test]
fn test_custom_trigger_without_config_cannot_be_saved() {
    let mut world = bare_world(strip(1));
    world.register_trigger(Box::new(Unsaveable));
    assert!(matches!(
        world.save(),
        Err(crate::save::SaveError::UnpersistableTrigger { .. })
    ));
}

// ---- Properties ----

proptest! {
    #[test]
    fn prop_damage_never_grows_with_distance(base in 0u32..10_000, d in 0u32..10) {
        prop_assert!(damage_at(base, d + 1, 2) <= damage_at(base, d, 2));
        prop_assert_eq!(damage_at(base, d + 3, 2), 0);
    }

    #[test]
    fn prop_drought_probability_stays_in_band(lat in -90.0f64..90.0) {
        let config = DroughtConfig::default();
        let p = config.drought_probability(lat);
        prop_assert!((0.0..=config.max_probability).contains(&p));
        if (lat - config.band_center).abs() >= config.band_half_width {
            prop_assert_eq!(p, 0.0);
        }
    }
}
