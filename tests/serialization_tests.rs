use actor_dynamics::*;
use serde_json::json;

fn build_scene() -> Scene {
    let mut scene = Scene::new();

    let floor = scene.create_actor("floor");
    {
        let actor = scene.actor_mut(floor).unwrap();
        actor.transform.scale = Vec3::new(10.0, 1.0, 10.0);
        actor.attach_component(RigidBodyComponent::new(5.0).with_static(true));
        actor.attach_component(BoxColliderComponent::new(Vec3::new(1.0, 0.5, 1.0)));
    }

    let player = scene.create_actor("player");
    {
        let actor = scene.actor_mut(player).unwrap();
        actor.transform.position = Vec3::new(0.0, 3.0, -2.0);
        actor.transform.rotation = Vec3::new(0.0, 45.0, 0.0);
        actor.attach_component(RigidBodyComponent::new(2.0).with_restitution(0.25));
        actor.attach_component(SphereColliderComponent::new(0.75));
        let mut script = ScriptComponent::new("PlayerController");
        script.fields.insert("speed".into(), json!(6.5));
        actor.attach_component(script);
        actor.attach_component(ScriptComponent::new("Inventory"));
    }

    let camera = scene.actors_mut().create_child("camera", player);
    scene.actor_mut(camera).unwrap().transform.position = Vec3::new(0.0, 1.5, -4.0);
    scene.actor_mut(camera).unwrap().set_enabled(false);

    scene
}

fn find<'a>(scene: &'a Scene, name: &str) -> &'a Actor {
    let id = scene.actors().find_by_name(name).expect("actor should survive round-trip");
    scene.actor(id).unwrap()
}

#[test]
fn scene_round_trips_through_json() {
    let original = build_scene();
    let text = original.to_json().unwrap();
    let factory = ComponentFactory::with_builtin();

    let loaded = Scene::from_json(&text, &factory).unwrap();

    assert_eq!(loaded.actors().len(), original.actors().len());
    for (_, actor) in original.actors().iter() {
        let copy = find(&loaded, &actor.name);
        assert_eq!(copy.transform.position, actor.transform.position);
        assert_eq!(copy.transform.rotation, actor.transform.rotation);
        assert_eq!(copy.transform.scale, actor.transform.scale);
        assert_eq!(copy.is_enabled_self(), actor.is_enabled_self());
        assert_eq!(copy.component_count(), actor.component_count());
    }

    let player = find(&loaded, "player");
    assert_eq!(
        player.get_component::<RigidBodyComponent>(),
        Some(&RigidBodyComponent::new(2.0).with_restitution(0.25))
    );
    assert_eq!(player.get_component::<SphereColliderComponent>().unwrap().radius, 0.75);
    let scripts: Vec<_> = player.get_components::<ScriptComponent>().collect();
    assert_eq!(scripts.len(), 2);
    assert_eq!(scripts[0].class_name, "PlayerController");
    assert_eq!(scripts[0].fields.get("speed"), Some(&json!(6.5)));
    assert_eq!(scripts[1].class_name, "Inventory");

    let floor = find(&loaded, "floor");
    assert!(floor.get_component::<RigidBodyComponent>().unwrap().is_static);
    assert_eq!(
        floor.get_component::<BoxColliderComponent>().unwrap().size,
        Vec3::new(1.0, 0.5, 1.0)
    );
}

#[test]
fn hierarchy_survives_round_trip() {
    let original = build_scene();
    let factory = ComponentFactory::with_builtin();

    let loaded = Scene::from_document(&original.to_document(), &factory).unwrap();

    let player = loaded.actors().find_by_name("player").unwrap();
    let camera = loaded.actors().find_by_name("camera").unwrap();
    assert_eq!(loaded.actors().parent_of(camera), Some(player));
    assert_eq!(loaded.actor(player).unwrap().transform.children(), &[camera]);
    assert!(!loaded.actors().is_enabled_in_hierarchy(camera));
}

#[test]
fn document_uses_indices_for_links() {
    let mut scene = build_scene();
    let floor = scene.actors().find_by_name("floor").unwrap();
    scene.actor_mut(floor).unwrap().delete();
    scene.flush_deletions();

    let document = scene.to_document();

    assert_eq!(document.actors.len(), 2);
    assert_eq!(document.actors[0].name, "player");
    assert_eq!(document.actors[0].transform.children, vec![1]);
    assert_eq!(document.actors[1].transform.parent, Some(0));
    assert_eq!(document.actors[0].components[0].type_name, "RigidBody");
}

#[test]
fn unknown_component_type_is_rejected() {
    let text = r#"{ "actors": [ { "name": "a", "components": [ { "type": "Teleporter" } ] } ] }"#;
    let factory = ComponentFactory::with_builtin();

    let result = Scene::from_json(text, &factory);

    assert!(matches!(result, Err(EngineError::UnknownComponent(name)) if name == "Teleporter"));
}

#[test]
fn failed_load_leaves_scene_untouched() {
    let mut scene = build_scene();
    let before = scene.actors().len();
    let document = SceneDocument::from_json(
        r#"{ "actors": [
            { "name": "ok" },
            { "name": "bad", "components": [
                { "type": "SphereCollider", "fields": { "radius": "big" } }
            ] }
        ] }"#,
    )
    .unwrap();

    let result = scene.load_document(&document, &ComponentFactory::with_builtin());

    assert!(matches!(result, Err(EngineError::InvalidComponentData { .. })));
    assert_eq!(scene.actors().len(), before);
}

#[test]
fn malformed_json_reports_json_error() {
    let factory = ComponentFactory::with_builtin();
    assert!(matches!(
        Scene::from_json("{ not json", &factory),
        Err(EngineError::Json(_))
    ));
}

#[derive(Debug, Default)]
struct Light {
    enabled: bool,
    intensity: f32,
}

impl Component for Light {
    fn type_name(&self) -> &'static str {
        "Light"
    }

    fn save(&self) -> ComponentData {
        let mut data = ComponentData::new();
        data.insert("enabled".into(), json!(self.enabled));
        data.insert("intensity".into(), json!(self.intensity));
        data
    }

    fn load(&mut self, data: &ComponentData) -> Result<(), EngineError> {
        self.enabled = data.get("enabled").and_then(|v| v.as_bool()).unwrap_or(true);
        self.intensity = data.get("intensity").and_then(|v| v.as_f64()).unwrap_or(1.0) as f32;
        Ok(())
    }

    fn clone_component(&self) -> Box<dyn Component> {
        Box::new(Light {
            enabled: self.enabled,
            intensity: self.intensity,
        })
    }
}

#[test]
fn component_fields_named_like_document_keys_round_trip() {
    let mut scene = Scene::new();
    let lamp = scene.create_actor("lamp");
    scene.actor_mut(lamp).unwrap().attach_component(Light {
        enabled: false,
        intensity: 3.0,
    });
    let mut factory = ComponentFactory::with_builtin();
    factory.register::<Light>("Light");

    let text = scene.to_json().unwrap();
    let loaded = Scene::from_json(&text, &factory).unwrap();

    let actor = find(&loaded, "lamp");
    let light = actor.get_component::<Light>().unwrap();
    assert!(!light.enabled);
    assert_eq!(light.intensity, 3.0);
    assert!(actor.components()[0].is_enabled());
}
