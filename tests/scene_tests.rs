use std::{cell::RefCell, rc::Rc};

use actor_dynamics::*;
use approx::assert_relative_eq;

#[derive(Debug, Default)]
struct Calls {
    start: u32,
    update: u32,
    late_update: u32,
    unload: u32,
}

#[derive(Clone, Default)]
struct Recorder {
    calls: Rc<RefCell<Calls>>,
}

impl Component for Recorder {
    fn type_name(&self) -> &'static str {
        "Recorder"
    }

    fn start(&mut self, _ctx: &mut UpdateContext<'_>) {
        self.calls.borrow_mut().start += 1;
    }

    fn update(&mut self, _ctx: &mut UpdateContext<'_>) {
        self.calls.borrow_mut().update += 1;
    }

    fn late_update(&mut self, _ctx: &mut UpdateContext<'_>) {
        self.calls.borrow_mut().late_update += 1;
    }

    fn unload(&mut self, _ctx: &mut UpdateContext<'_>) {
        self.calls.borrow_mut().unload += 1;
    }

    fn clone_component(&self) -> Box<dyn Component> {
        Box::new(self.clone())
    }
}

fn scene_without_gravity() -> Scene {
    Scene::with_physics(PhysicsWorld::with_gravity(Vec3::ZERO))
}

#[test]
fn start_runs_exactly_once() {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut scene = Scene::new();
    let recorder = Recorder::default();
    let calls = recorder.calls.clone();
    let id = scene.create_actor("recorder");
    scene.actor_mut(id).unwrap().attach_component(recorder);

    for _ in 0..5 {
        scene.update(1.0 / 60.0);
    }

    let calls = calls.borrow();
    assert_eq!(calls.start, 1);
    assert_eq!(calls.update, 5);
    assert_eq!(calls.late_update, 5);
}

#[test]
fn deleted_ids_are_never_reassigned() {
    let mut scene = Scene::new();
    let first = scene.create_actor("first");
    let doomed = scene.create_actor("doomed");

    scene.actor_mut(doomed).unwrap().delete();
    assert!(scene.actor(doomed).is_some(), "deletion waits for the frame to end");
    scene.update(1.0 / 60.0);

    let later = scene.create_actor("later");
    assert!(scene.actor(doomed).is_none());
    assert_ne!(later, doomed);
    assert_ne!(later, first);
    assert_eq!(scene.actors().len(), 2);
}

#[test]
fn reparenting_moves_child_exactly_once() {
    let mut scene = Scene::new();
    let old_parent = scene.create_actor("old");
    let new_parent = scene.create_actor("new");
    let child = scene.actors_mut().create_child("child", old_parent);

    assert!(scene.actors_mut().set_parent(child, Some(new_parent)));

    let actors = scene.actors();
    assert!(!actors.get(old_parent).unwrap().transform.children().contains(&child));
    assert_eq!(
        actors
            .get(new_parent)
            .unwrap()
            .transform
            .children()
            .iter()
            .filter(|c| **c == child)
            .count(),
        1
    );
    assert_eq!(actors.get(child).unwrap().transform.parent(), Some(new_parent));
}

#[test]
fn deletion_unloads_components_and_reroots_children() {
    let mut scene = Scene::new();
    let recorder = Recorder::default();
    let calls = recorder.calls.clone();
    let parent = scene.create_actor("parent");
    let child = scene.actors_mut().create_child("child", parent);
    scene.actor_mut(parent).unwrap().attach_component(recorder);

    scene.actors_mut().delete(parent);
    scene.update(1.0 / 60.0);

    assert_eq!(calls.borrow().unload, 1);
    assert!(scene.actor(parent).is_none());
    assert_eq!(scene.actor(child).unwrap().transform.parent(), None);
}

#[test]
fn recursive_deletion_removes_subtree() {
    let mut scene = Scene::new();
    let root = scene.create_actor("root");
    let child = scene.actors_mut().create_child("child", root);
    let grandchild = scene.actors_mut().create_child("grandchild", child);

    scene.actors_mut().delete_recursive(root);
    scene.update(1.0 / 60.0);

    assert!(scene.actor(root).is_none());
    assert!(scene.actor(child).is_none());
    assert!(scene.actor(grandchild).is_none());
}

#[test]
fn queued_and_disabled_actors_are_skipped() {
    let mut scene = Scene::new();
    let queued = Recorder::default();
    let queued_calls = queued.calls.clone();
    let hidden = Recorder::default();
    let hidden_calls = hidden.calls.clone();

    let a = scene.create_actor("queued");
    scene.actor_mut(a).unwrap().attach_component(queued);
    scene.actor_mut(a).unwrap().delete();

    let parent = scene.create_actor("parent");
    let b = scene.actors_mut().create_child("hidden", parent);
    scene.actor_mut(b).unwrap().attach_component(hidden);
    scene.actors_mut().set_enabled(parent, false);

    scene.update(1.0 / 60.0);

    assert_eq!(queued_calls.borrow().update, 0);
    assert_eq!(hidden_calls.borrow().update, 0);
}

#[test]
fn rigid_body_component_falls_with_actor() {
    let mut scene = Scene::with_physics(PhysicsWorld::with_gravity(Vec3::new(0.0, -10.0, 0.0)));
    let id = scene.create_actor("crate");
    scene.actor_mut(id).unwrap().transform.position = Vec3::new(0.0, 5.0, 0.0);
    scene.actor_mut(id).unwrap().attach_component(RigidBodyComponent::new(1.0));

    for _ in 0..3 {
        scene.update(0.1);
    }

    let y = scene.actor(id).unwrap().transform.position.y;
    assert!(y < 5.0, "actor should follow its body down, y = {y}");

    let component = scene.actor(id).unwrap().get_component::<RigidBodyComponent>().unwrap();
    let velocity = component.velocity(scene.physics()).unwrap();
    assert!(velocity.y < 0.0);
}

#[test]
fn collider_components_bind_to_sibling_body() {
    let mut scene = scene_without_gravity();
    let id = scene.create_actor("box");
    scene.actor_mut(id).unwrap().transform.scale = Vec3::splat(2.0);
    {
        let actor = scene.actor_mut(id).unwrap();
        actor.attach_component(RigidBodyComponent::new(1.0));
        actor.attach_component(BoxColliderComponent::new(Vec3::new(1.0, 2.0, 3.0)));
    }

    scene.update(1.0 / 60.0);

    let actor = scene.actor(id).unwrap();
    let body = actor.get_component::<RigidBodyComponent>().unwrap().body().unwrap();
    let collider = actor.get_component::<BoxColliderComponent>().unwrap().collider().unwrap();

    let physics = scene.physics();
    assert_eq!(physics.collider(collider).unwrap().body, Some(body));
    assert_eq!(physics.body(body).unwrap().collider, Some(collider));
    assert_eq!(
        physics.collider(collider).unwrap().shape,
        ColliderShape::Box {
            size: Vec3::new(1.0, 2.0, 3.0)
        }
    );
}

#[test]
fn ball_bounces_on_static_floor_through_components() {
    let mut scene = scene_without_gravity();

    let floor = scene.create_actor("floor");
    {
        let actor = scene.actor_mut(floor).unwrap();
        actor.transform.scale = Vec3::new(20.0, 2.0, 20.0);
        actor.attach_component(RigidBodyComponent::new(1.0).with_static(true));
        actor.attach_component(BoxColliderComponent::new(Vec3::ONE));
    }

    let ball = scene.create_actor("ball");
    {
        let actor = scene.actor_mut(ball).unwrap();
        actor.transform.position = Vec3::new(0.0, 2.0, 0.0);
        actor.attach_component(RigidBodyComponent::new(1.0));
        actor.attach_component(SphereColliderComponent::new(1.0));
    }

    // First frame registers bodies and binds colliders.
    scene.update(1.0 / 60.0);
    let body = scene
        .actor(ball)
        .unwrap()
        .get_component::<RigidBodyComponent>()
        .unwrap()
        .body()
        .unwrap();
    scene.physics_mut().body_mut(body).unwrap().velocity = Vec3::new(0.0, -30.0, 0.0);

    let mut bounced = false;
    for _ in 0..10 {
        scene.update(1.0 / 60.0);
        if scene.physics().body(body).unwrap().velocity.y > 0.0 {
            bounced = true;
            break;
        }
    }
    assert!(bounced, "ball should bounce off the floor");
}

#[test]
fn removing_bridge_component_releases_physics_handles() {
    let mut scene = scene_without_gravity();
    let id = scene.create_actor("ball");
    scene.actor_mut(id).unwrap().attach_component(RigidBodyComponent::new(1.0));
    scene.actor_mut(id).unwrap().attach_component(SphereColliderComponent::new(0.5));
    scene.update(1.0 / 60.0);
    assert_eq!(scene.physics().body_count(), 1);
    assert_eq!(scene.physics().collider_count(), 1);

    assert!(scene.remove_component(id, "SphereCollider", 0));
    assert!(scene.remove_component(id, "RigidBody", 0));

    assert_eq!(scene.physics().body_count(), 0);
    assert_eq!(scene.physics().collider_count(), 0);
}

#[test]
fn component_in_parent_checks_self_then_ancestors() {
    let mut scene = Scene::new();
    let root = scene.create_actor("root");
    let middle = scene.actors_mut().create_child("middle", root);
    let leaf = scene.actors_mut().create_child("leaf", middle);
    scene
        .actor_mut(root)
        .unwrap()
        .attach_component(ScriptComponent::new("Root"));

    let found = scene
        .actors()
        .get_component_in_parent::<ScriptComponent>(leaf)
        .unwrap();
    assert_eq!(found.class_name, "Root");
    assert!(scene
        .actors()
        .get_component_in_parent::<RigidBodyComponent>(leaf)
        .is_none());
}

#[test]
fn duplicate_copies_subtree_with_fresh_components() {
    let mut scene = Scene::new();
    let root = scene.create_actor("root");
    let child = scene.actors_mut().create_child("child", root);
    scene.actor_mut(root).unwrap().transform.position = Vec3::new(1.0, 2.0, 3.0);
    scene.actor_mut(child).unwrap().attach_component(ScriptComponent::new("Leaf"));
    scene.update(1.0 / 60.0);

    let copy = scene.duplicate_actor(root).unwrap();

    let copy_actor = scene.actor(copy).unwrap();
    assert_eq!(copy_actor.name, "root");
    assert_eq!(copy_actor.transform.position, Vec3::new(1.0, 2.0, 3.0));
    assert_eq!(copy_actor.transform.parent(), None);

    let copied_child = copy_actor.transform.children()[0];
    assert_ne!(copied_child, child);
    let slot = &scene.actor(copied_child).unwrap().components()[0];
    assert_eq!(slot.state(), ComponentState::Uninitialized);
    assert_eq!(slot.entity(), copied_child);
}

#[test]
fn engine_ticks_scene_with_configured_gravity() {
    let config =
        EngineConfig::from_toml_str("gravity = [0.0, -2.0, 0.0]\ntime_step = 0.5\n").unwrap();
    let mut engine = Engine::new(config);
    let id = engine.scene_mut().create_actor("body");
    engine
        .scene_mut()
        .actor_mut(id)
        .unwrap()
        .attach_component(RigidBodyComponent::new(1.0));

    engine.step();
    engine.step();

    let y = engine.scene().actor(id).unwrap().transform.position.y;
    // v = -1 then -2 over two half-second steps.
    assert_relative_eq!(y, -1.5, epsilon = 1e-5);
}

#[test]
fn context_gives_access_to_sibling_components() {
    let mut scene = scene_without_gravity();
    let id = scene.create_actor("ball");
    scene.actor_mut(id).unwrap().transform.position = Vec3::new(3.0, 4.0, 5.0);
    scene.actor_mut(id).unwrap().attach_component(RigidBodyComponent::new(1.0));
    scene.update(1.0 / 60.0);

    let mut ctx = scene.context(id, 1.0 / 60.0);
    ctx.sibling_mut::<RigidBodyComponent>().unwrap().restitution = 0.9;
    let component = ctx.sibling::<RigidBodyComponent>().unwrap().clone();
    component.apply_force(ctx.physics, Vec3::X);
    component.reset(&mut ctx);

    assert_eq!(ctx.transform().unwrap().position, Vec3::ZERO);
    let body = component.body().unwrap();
    assert_eq!(scene.physics().body(body).unwrap().velocity, Vec3::ZERO);
    assert_eq!(scene.physics().body(body).unwrap().force, Vec3::X);

    scene.update(1.0 / 60.0);
    assert_eq!(scene.physics().body(body).unwrap().restitution, 0.9);
}
