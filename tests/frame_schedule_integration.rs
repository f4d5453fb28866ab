//! Frame scheduler integration tests: phase ordering, once-per-frame
//! invocation and per-entity batching.

use bevy_ecs::prelude::*;

use rigidframe::game::{
    BEGIN_CAMERA_PHASE, BEGIN_RENDER_PHASE, END_CAMERA_PHASE, END_RENDER_PHASE,
    LOGIC_UPDATE_PHASE, RENDER_PHASE, RenderMode, UPDATE_CAMERA_PHASE, build_scheduler,
    frame_phases,
};
use rigidframe::resources::worldcontext::WorldContext;
use rigidframe::schedule::phase::{PhaseError, PhaseGraph, PhaseId};
use rigidframe::schedule::scheduler::FrameScheduler;
use rigidframe::schedule::system::{FrameSystem, Requirements};

#[derive(Resource, Default)]
struct CallLog(Vec<&'static str>);

#[derive(Resource, Default)]
struct Batches(Vec<Vec<Entity>>);

#[derive(Component)]
struct Marker;

#[derive(Component)]
struct Extra;

fn recorder(name: &'static str) -> FrameSystem {
    FrameSystem::unconditional(name, move |world, _ctx| {
        world.resource_mut::<CallLog>().0.push(name);
    })
}

const ALL_PHASES: [PhaseId; 7] = [
    LOGIC_UPDATE_PHASE,
    BEGIN_RENDER_PHASE,
    BEGIN_CAMERA_PHASE,
    UPDATE_CAMERA_PHASE,
    END_CAMERA_PHASE,
    RENDER_PHASE,
    END_RENDER_PHASE,
];

fn seven_phase_scheduler() -> FrameScheduler {
    let graph = frame_phases().unwrap();
    let mut scheduler = FrameScheduler::new(&graph).unwrap();
    // Registered back to front; execution still follows phase order.
    for phase in ALL_PHASES.iter().rev() {
        scheduler.add_system(*phase, recorder(phase.as_str())).unwrap();
    }
    scheduler
}

#[test]
fn seven_phases_resolve_in_chain_order() {
    let scheduler = FrameScheduler::new(&frame_phases().unwrap()).unwrap();
    assert_eq!(scheduler.phase_order(), ALL_PHASES.to_vec());
}

#[test]
fn each_system_runs_once_per_frame_in_phase_order() {
    let mut world = World::new();
    world.init_resource::<CallLog>();
    let mut ctx = WorldContext::new();
    let mut scheduler = seven_phase_scheduler();

    scheduler.run_frame(&mut world, &mut ctx);

    let expected: Vec<&str> = ALL_PHASES.iter().map(PhaseId::as_str).collect();
    assert_eq!(world.resource::<CallLog>().0, expected);
    assert_eq!(scheduler.frame_count(), 1);
}

#[test]
fn repeated_frames_repeat_the_same_sequence() {
    let mut world = World::new();
    world.init_resource::<CallLog>();
    let mut ctx = WorldContext::new();
    let mut scheduler = seven_phase_scheduler();

    for _ in 0..3 {
        scheduler.run_frame(&mut world, &mut ctx);
    }

    let log = &world.resource::<CallLog>().0;
    assert_eq!(log.len(), 21);
    for frame in log.chunks(7) {
        assert_eq!(frame[0], "logic_update");
        assert_eq!(frame[6], "end_render");
    }
    assert_eq!(scheduler.frame_count(), 3);
}

#[test]
fn systems_in_one_phase_run_in_registration_order() {
    let mut graph = PhaseGraph::new();
    graph.add_root(PhaseId::new("only")).unwrap();
    let mut scheduler = FrameScheduler::new(&graph).unwrap();
    scheduler
        .add_system(PhaseId::new("only"), recorder("first"))
        .unwrap()
        .add_system(PhaseId::new("only"), recorder("second"))
        .unwrap()
        .add_system(PhaseId::new("only"), recorder("third"))
        .unwrap();

    let mut world = World::new();
    world.init_resource::<CallLog>();
    scheduler.run_frame(&mut world, &mut WorldContext::new());

    assert_eq!(world.resource::<CallLog>().0, vec!["first", "second", "third"]);
    assert_eq!(scheduler.system_names(), vec!["first", "second", "third"]);
}

#[test]
fn later_phase_sees_earlier_phase_writes() {
    let mut graph = PhaseGraph::new();
    graph
        .add_root(PhaseId::new("write"))
        .unwrap()
        .add_after(PhaseId::new("read"), PhaseId::new("write"))
        .unwrap();
    let mut scheduler = FrameScheduler::new(&graph).unwrap();
    scheduler
        .add_system(
            PhaseId::new("read"),
            FrameSystem::unconditional("read", |world, _ctx| {
                let seen = world.resource::<CallLog>().0.contains(&"written");
                assert!(seen);
                world.resource_mut::<CallLog>().0.push("read");
            }),
        )
        .unwrap()
        .add_system(
            PhaseId::new("write"),
            FrameSystem::unconditional("write", |world, _ctx| {
                world.resource_mut::<CallLog>().0.push("written");
            }),
        )
        .unwrap();

    let mut world = World::new();
    world.init_resource::<CallLog>();
    scheduler.run_frame(&mut world, &mut WorldContext::new());

    assert_eq!(world.resource::<CallLog>().0, vec!["written", "read"]);
}

#[test]
fn per_entity_system_gets_only_matching_entities() {
    let mut world = World::new();
    world.init_resource::<Batches>();
    let both = world.spawn((Marker, Extra)).id();
    let marker_only = world.spawn(Marker).id();
    world.spawn(Extra);

    let requirements = Requirements::new()
        .with::<Marker>(&mut world)
        .with::<Extra>(&mut world);
    let system = FrameSystem::per_entity("both", requirements, &mut world, |world, _ctx, entities| {
        world.resource_mut::<Batches>().0.push(entities.to_vec());
    });

    let mut graph = PhaseGraph::new();
    graph.add_root(LOGIC_UPDATE_PHASE).unwrap();
    let mut scheduler = FrameScheduler::new(&graph).unwrap();
    scheduler.add_system(LOGIC_UPDATE_PHASE, system).unwrap();

    scheduler.run_frame(&mut world, &mut WorldContext::new());
    world.entity_mut(marker_only).insert(Extra);
    scheduler.run_frame(&mut world, &mut WorldContext::new());

    let batches = &world.resource::<Batches>().0;
    assert_eq!(batches.len(), 2);
    assert_eq!(batches[0], vec![both]);
    assert_eq!(batches[1].len(), 2);
    assert!(batches[1].contains(&both));
    assert!(batches[1].contains(&marker_only));
}

#[test]
fn per_entity_system_runs_with_empty_batch() {
    let mut world = World::new();
    world.init_resource::<Batches>();
    let requirements = Requirements::new().with::<Marker>(&mut world);
    let mut system = FrameSystem::per_entity("none", requirements, &mut world, |world, _ctx, entities| {
        world.resource_mut::<Batches>().0.push(entities.to_vec());
    });

    system.run(&mut world, &mut WorldContext::new());

    let batches = &world.resource::<Batches>().0;
    assert_eq!(batches.len(), 1);
    assert!(batches[0].is_empty());
}

#[test]
fn adding_to_unknown_phase_fails() {
    let mut scheduler = FrameScheduler::new(&frame_phases().unwrap()).unwrap();
    let result = scheduler
        .add_system(PhaseId::new("post_render"), recorder("late"))
        .map(|_| ());
    assert_eq!(result, Err(PhaseError::UnknownPhase("post_render")));
    assert!(scheduler.system_names().is_empty());
}

#[test]
fn cyclic_graph_refuses_to_build_scheduler() {
    let mut graph = PhaseGraph::new();
    graph
        .add_phase(PhaseId::new("a"), &[PhaseId::new("b")])
        .unwrap()
        .add_phase(PhaseId::new("b"), &[PhaseId::new("a")])
        .unwrap();
    assert!(matches!(
        FrameScheduler::new(&graph),
        Err(PhaseError::DependencyCycle { .. })
    ));
}

#[test]
fn headless_scheduler_has_no_render_systems() {
    let mut world = World::new();
    let scheduler = build_scheduler(&mut world, RenderMode::Headless).unwrap();
    assert_eq!(
        scheduler.system_names(),
        vec!["logic_update", "respawn", "physics_sync", "body_telemetry"]
    );
}

#[test]
fn window_scheduler_brackets_the_frame() {
    let mut world = World::new();
    let scheduler = build_scheduler(&mut world, RenderMode::Window).unwrap();
    let names = scheduler.system_names();
    assert_eq!(names.first(), Some(&"logic_update"));
    assert_eq!(names.last(), Some(&"end_frame"));
    let begin = names.iter().position(|n| *n == "begin_camera").unwrap();
    let end = names.iter().position(|n| *n == "end_camera").unwrap();
    let draw = names.iter().position(|n| *n == "draw_models").unwrap();
    assert!(begin < draw && draw < end);
}
