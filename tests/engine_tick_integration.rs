//! Engine tick integration tests for time, movement, facing sync, composite
//! advance and the render pass.

use std::sync::Arc;

use bevy_ecs::prelude::*;
use smallvec::SmallVec;

use isocomposite::components::appearance::EntityAppearance;
use isocomposite::components::composite::Composite;
use isocomposite::components::composite::direction::resolve_direction;
use isocomposite::components::layerslot::LayerSlot;
use isocomposite::components::missile::{Missile, MissileRecord};
use isocomposite::components::mover::{Mover, TilePoint};
use isocomposite::error::{CompositeError, Result};
use isocomposite::resources::animationdata::{AnimationDataTable, AnimationTiming};
use isocomposite::resources::assetstore::{AssetSource, FrameSheet, MemoryAssetStore};
use isocomposite::resources::cof::{CofLayer, DirectionDescriptor};
use isocomposite::resources::worldtime::WorldTime;
use isocomposite::surface::{BlendMode, FrameRef, Surface};
use isocomposite::systems::composite::{
    composite_advance_system, render_composites, screen_translation, sync_composite_facing_system,
};
use isocomposite::systems::movement::{missile_system, path_movement_system};
use isocomposite::systems::time::update_world_time;

const EPSILON: f64 = 1e-6;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

const BASE: &str = "/data/global/monsters";
const FRAMES: usize = 4;

// ==================== Fixtures ====================

/// Records draw positions; fails draws whose path contains `fail_on`.
#[derive(Default)]
struct RecordingSurface {
    translations: Vec<(i32, i32)>,
    draws: Vec<(String, (i32, i32))>,
    fail_on: Option<&'static str>,
}

impl Surface for RecordingSurface {
    fn push_translation(&mut self, x: i32, y: i32) {
        self.translations.push((x, y));
    }

    fn push_blend(&mut self, _blend: BlendMode) {
        self.translations.push((0, 0));
    }

    fn pop(&mut self) {
        self.translations.pop();
    }

    fn draw_frame(&mut self, frame: FrameRef<'_>) -> Result<()> {
        if self.fail_on.is_some_and(|fragment| frame.path.contains(fragment)) {
            return Err(CompositeError::Render(frame.path.to_string()));
        }
        let at = self
            .translations
            .iter()
            .fold((0, 0), |(ax, ay), (x, y)| (ax + x, ay + y));
        self.draws.push((frame.path.to_string(), at));
        Ok(())
    }
}

fn layer_path(key: &str, code: &str) -> String {
    format!("{BASE}/ZM/{key}/ZM{key}{code}WLHTH.dcc")
}

fn assets() -> Arc<dyn AssetSource> {
    let order: SmallVec<[u8; 16]> = SmallVec::from_slice(&[1, 0]);
    let mut store = MemoryAssetStore::new();
    store.insert_descriptor(
        format!("{BASE}/ZM/COF/ZMWLHTH.COF"),
        DirectionDescriptor {
            direction_count: 8,
            frames_per_direction: FRAMES,
            layers: vec![CofLayer::new(0), CofLayer::new(1)],
            priority: (0..8).map(|_| vec![order.clone(); FRAMES]).collect(),
        },
    );
    store.insert_sheet(layer_path("HD", "BH"), FrameSheet::new(8, FRAMES));
    store.insert_sheet(layer_path("HD", "CR"), FrameSheet::new(8, FRAMES));
    // Decodes but cannot play
    store.insert_sheet(layer_path("HD", "NO"), FrameSheet::new(8, 0));
    store.insert_sheet(layer_path("TR", "LIT"), FrameSheet::new(8, FRAMES));
    store.insert_sheet("/data/global/missiles/firebolt.dcc", FrameSheet::new(16, 6));
    Arc::new(store)
}

fn timing() -> Arc<AnimationDataTable> {
    let mut timing = AnimationDataTable::new();
    timing.insert(
        "zmwlhth",
        AnimationTiming {
            frames_per_direction: FRAMES,
            animation_speed: 256,
        },
    );
    Arc::new(timing)
}

fn walking_composite(assets: &Arc<dyn AssetSource>, head: &str, direction: usize) -> Composite {
    let appearance = EntityAppearance::new(BASE, "ZM")
        .with_layer(LayerSlot::Head, head)
        .with_layer(LayerSlot::Torso, "LIT");
    let mut composite = Composite::new(Arc::new(appearance), "units", Arc::clone(assets), timing());
    composite.set_mode("WL", "HTH", direction).unwrap();
    composite
}

fn make_world() -> World {
    let mut world = World::new();
    world.insert_resource(WorldTime::default());
    world
}

fn tick(world: &mut World, dt: f64) {
    update_world_time(world, dt);
    let mut schedule = Schedule::default();
    schedule.add_systems(
        (
            path_movement_system,
            sync_composite_facing_system,
            composite_advance_system,
            missile_system,
        )
            .chain(),
    );
    schedule.run(world);
}

// ==================== Time ====================

#[test]
fn world_time_counts_ticks_and_scales() {
    let mut world = make_world();
    world.resource_mut::<WorldTime>().time_scale = 2.0;
    tick(&mut world, 0.25);
    tick(&mut world, 0.25);

    let time = world.resource::<WorldTime>();
    assert!(approx_eq(time.delta, 0.5));
    assert!(approx_eq(time.elapsed, 1.0));
    assert_eq!(time.frame_count, 2);
}

// ==================== Composite advance ====================

#[test]
fn composites_advance_by_world_delta() {
    let assets = assets();
    let mut world = make_world();
    let entity = world.spawn(walking_composite(&assets, "BH", 0)).id();

    tick(&mut world, 0.5);

    let composite = world.get::<Composite>(entity).unwrap();
    // 12 frames of 0.04s: three loops of four
    assert_eq!(composite.played_count(), 3);
    assert_eq!(composite.mode().unwrap().frame_index(), 0);
}

#[test]
fn time_scale_slows_composites() {
    let assets = assets();
    let mut world = make_world();
    world.resource_mut::<WorldTime>().time_scale = 0.5;
    let entity = world.spawn(walking_composite(&assets, "BH", 0)).id();

    tick(&mut world, 0.1);

    let mode = world.get::<Composite>(entity).unwrap().mode().unwrap();
    assert_eq!(mode.frame_index(), 1);
}

#[test]
fn failing_composite_does_not_stop_others() {
    let assets = assets();
    let mut world = make_world();
    let broken = world.spawn(walking_composite(&assets, "NO", 0)).id();
    let healthy = world.spawn(walking_composite(&assets, "BH", 0)).id();

    tick(&mut world, 0.05);

    let healthy = world.get::<Composite>(healthy).unwrap().mode().unwrap();
    assert_eq!(healthy.layer(LayerSlot::Torso).unwrap().frame_index(), 1);

    let broken = world.get::<Composite>(broken).unwrap().mode().unwrap();
    assert_eq!(broken.frame_index(), 1);
    assert_eq!(broken.layer(LayerSlot::Torso).unwrap().frame_index(), 0);
}

// ==================== Movement and facing ====================

#[test]
fn movers_walk_their_path() {
    let mut world = make_world();
    let mut mover = Mover::new(0.0, 0.0).with_speed(5.0);
    mover.set_path([TilePoint::new(1, 0), TilePoint::new(1, 1)], None);
    let entity = world.spawn(mover).id();

    tick(&mut world, 1.0);
    let mover = world.get::<Mover>(entity).unwrap();
    assert_eq!(mover.tile(), (1, 0));

    tick(&mut world, 1.0);
    let mover = world.get::<Mover>(entity).unwrap();
    assert_eq!(mover.tile(), (1, 1));
    assert!(mover.is_idle());
}

#[test]
fn composite_turns_with_its_mover() {
    let assets = assets();
    let mut world = make_world();
    let mut mover = Mover::new(0.0, 0.0).with_speed(1.0);
    mover.set_target(10.0, 0.0, None);
    let facing = mover.facing();
    let entity = world.spawn((walking_composite(&assets, "BH", 0), mover)).id();

    tick(&mut world, 0.1);

    let composite = world.get::<Composite>(entity).unwrap();
    let mode = composite.mode().unwrap();
    assert_eq!(mode.direction(), resolve_direction(facing, 8));
    assert_ne!(mode.direction(), resolve_direction(0, 8));
    assert_eq!(mode.animation_mode(), "WL");
    assert_eq!(mode.weapon_class(), "HTH");
}

#[test]
fn unchanged_facing_keeps_playing() {
    let assets = assets();
    let mut world = make_world();
    let mut mover = Mover::new(0.0, 0.0).with_speed(1.0);
    mover.set_target(100.0, 0.0, None);
    let facing = mover.facing();
    let entity = world.spawn((walking_composite(&assets, "BH", facing), mover)).id();

    for _ in 0..10 {
        tick(&mut world, 0.05);
    }

    let composite = world.get::<Composite>(entity).unwrap();
    // A rebuild would have reset the loop count
    assert_eq!(composite.played_count(), 3);
}

#[test]
fn missiles_fly_and_animate() {
    let assets = assets();
    let record = MissileRecord {
        name: "firebolt".to_string(),
        cel_file_name: "firebolt".to_string(),
        has_sub_loop: false,
        sub_starting_frame: 0,
        sub_ending_frame: 0,
        loop_animation: true,
        velocity: 10.0,
    };
    let mut missile = Missile::new(0.0, 0.0, &record, assets.as_ref(), "units").unwrap();
    missile.set_radians(0.0, 50.0, None).unwrap();

    let mut world = make_world();
    let entity = world.spawn(missile).id();
    tick(&mut world, 0.5);

    let missile = world.get::<Missile>(entity).unwrap();
    assert!(approx_eq(missile.mover().position().x, 5.0));
    assert_eq!(missile.animation().frame_index(), 3);
}

// ==================== Render pass ====================

#[test]
fn render_pass_draws_back_to_front() {
    let assets = assets();
    let mut world = make_world();
    world.spawn((walking_composite(&assets, "BH", 0), Mover::new(20.0, 20.0)));
    world.spawn((walking_composite(&assets, "BH", 0), Mover::new(5.0, 0.0)));
    world.spawn(walking_composite(&assets, "BH", 0));

    let mut surface = RecordingSurface::default();
    render_composites(&mut world, &mut surface);

    let positions: Vec<(i32, i32)> = surface.draws.iter().map(|(_, at)| *at).collect();
    assert_eq!(
        positions,
        vec![
            (0, 0),
            (0, 0),
            screen_translation(&Mover::new(5.0, 0.0)),
            screen_translation(&Mover::new(5.0, 0.0)),
            screen_translation(&Mover::new(20.0, 20.0)),
            screen_translation(&Mover::new(20.0, 20.0)),
        ]
    );
    assert!(surface.translations.is_empty());
}

#[test]
fn render_pass_continues_after_error() {
    let assets = assets();
    let mut world = make_world();
    world.spawn((walking_composite(&assets, "BH", 0), Mover::new(0.0, 0.0)));
    world.spawn((walking_composite(&assets, "CR", 0), Mover::new(5.0, 5.0)));

    let mut surface = RecordingSurface {
        fail_on: Some("HDBH"),
        ..Default::default()
    };
    render_composites(&mut world, &mut surface);

    let paths: Vec<&str> = surface.draws.iter().map(|(path, _)| path.as_str()).collect();
    assert_eq!(
        paths,
        vec![
            layer_path("TR", "LIT").as_str(),
            layer_path("TR", "LIT").as_str(),
            layer_path("HD", "CR").as_str(),
        ]
    );
    assert!(surface.translations.is_empty());
}

#[test]
fn render_pass_includes_missiles() {
    let assets = assets();
    let record = MissileRecord {
        name: "firebolt".to_string(),
        cel_file_name: "firebolt".to_string(),
        has_sub_loop: false,
        sub_starting_frame: 0,
        sub_ending_frame: 0,
        loop_animation: true,
        velocity: 10.0,
    };
    let mut world = make_world();
    world.spawn(Missile::new(5.0, 0.0, &record, assets.as_ref(), "units").unwrap());

    let mut surface = RecordingSurface::default();
    render_composites(&mut world, &mut surface);

    assert_eq!(surface.draws.len(), 1);
    assert_eq!(surface.draws[0].0, "/data/global/missiles/firebolt.dcc");
    assert_eq!(surface.draws[0].1, screen_translation(&Mover::new(5.0, 0.0)));
}
