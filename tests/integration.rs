use chain_engine::Engine;
use chain_engine::assembly::SessionState;
use chain_engine::config::surface::{SurfaceConfig, SurfaceId, SurfaceKind};
use chain_engine::config::{Material, SavedConfiguration};
use chain_engine::layout::DEFAULT_SPACING;
use chain_engine::scene::{BoundingBox, SceneNode, Vec3};

const LINK_WIDTH: f64 = 10.0;

fn link_geometry() -> SceneNode {
    let body_bounds = BoundingBox::new(
        Vec3::new(-LINK_WIDTH / 2.0, -1.5, -0.5),
        Vec3::new(LINK_WIDTH / 2.0, 1.5, 0.5),
    );
    let stone_bounds = BoundingBox::new(Vec3::new(-0.2, 1.4, -0.2), Vec3::new(0.2, 1.6, 0.2));

    SceneNode::new("link").with_children(vec![
        SceneNode::new("Link_Body").with_bounds(body_bounds),
        SceneNode::new("Link_Body_Top1").with_bounds(body_bounds),
        SceneNode::new("Diamond-Octagon_Top1_1").with_bounds(stone_bounds),
        SceneNode::new("Diamond-Octagon_Top1_2").with_bounds(stone_bounds),
        SceneNode::new("Diamond-Octagon_Top1_3").with_bounds(stone_bounds),
        SceneNode::new("Diamond-Octagon_Side1_1").with_bounds(stone_bounds),
        SceneNode::new("Diamond-Octagon_Side1_2").with_bounds(stone_bounds),
        SceneNode::new("Enamel_Side1").with_bounds(stone_bounds),
        SceneNode::new("Plane").with_bounds(body_bounds),
    ])
}

/// Bouwt een engine met een volledig geladen ketting van de gegeven types.
fn loaded_engine(link_types: &[&str]) -> Engine {
    let mut engine = Engine::new();
    for link_type in link_types {
        engine.add_link(link_type).expect("schakel toegevoegd");
    }

    let generation = engine.session().generation();
    for index in 0..link_types.len() {
        assert!(
            engine
                .session_mut()
                .geometry_loaded(generation, index, link_geometry())
        );
    }
    engine.refresh();
    engine
}

#[test]
fn engine_initializes() {
    let engine = Engine::new();
    assert!(engine.is_initialized());
    assert_eq!(engine.session().state(), SessionState::Empty);
}

#[test]
fn full_pipeline_produces_decorated_scene() {
    let engine = loaded_engine(&["part1", "part3", "part1"]);

    assert_eq!(engine.session().state(), SessionState::Decorated);
    assert!(engine.is_stable());
    assert_eq!(engine.session().scene().len(), 3);
}

#[test]
fn default_links_are_silver_with_hidden_decoration() {
    let engine = loaded_engine(&["part1"]);
    let state = &engine.session().scene()[0];

    for mesh in &state.meshes {
        if mesh.mesh.starts_with("Diamond") || mesh.mesh.starts_with("Enamel") {
            assert!(
                !mesh.visible,
                "decoratie `{}` hoort verborgen te zijn",
                mesh.mesh
            );
        }
        if mesh.mesh == "Plane" {
            assert!(!mesh.visible);
        }
    }
}

#[test]
fn material_edit_touches_only_target_link() {
    let mut engine = loaded_engine(&["part1", "part1", "part1"]);
    engine.set_link_material(1, "gold").expect("materiaal gezet");
    engine.refresh();

    let config = engine.session().config();
    assert_eq!(config.links[0].material, Material::Silver);
    assert_eq!(config.links[1].material, Material::Gold);
    assert_eq!(config.links[2].material, Material::Silver);
}

#[test]
fn unknown_material_is_rejected() {
    let mut engine = loaded_engine(&["part1"]);
    assert!(engine.set_link_material(0, "koper").is_err());
}

#[test]
fn top_surface_gets_three_stones_side_gets_two() {
    let engine = loaded_engine(&["part1"]);

    let top = SurfaceConfig::default_for(SurfaceKind::Gemstones, SurfaceId::Top1);
    let updated = engine
        .session()
        .config()
        .set_surface(0, SurfaceId::Top1, top.clone())
        .set_surface(0, SurfaceId::Side1, top);

    let link = &updated.links[0];
    let top_colors = link
        .surface(SurfaceId::Top1)
        .gemstone_colors()
        .expect("steenkleuren top");
    assert_eq!(top_colors.stone1, "#ffffff");
    assert_eq!(top_colors.stone2, "#ffffff");
    assert_eq!(top_colors.stone3.as_deref(), Some("#ffffff"));

    let side_colors = link
        .surface(SurfaceId::Side1)
        .gemstone_colors()
        .expect("steenkleuren zijkant");
    assert!(side_colors.stone3.is_none());
}

#[test]
fn link_positions_follow_index_step_and_offset() {
    let engine = loaded_engine(&["part1", "part3", "part1"]);
    let scene = engine.session().scene();

    let step = LINK_WIDTH * DEFAULT_SPACING;
    let offset = engine
        .session()
        .catalog()
        .resolve("part1")
        .connection_offset;

    let x0 = scene[0].transform.position.x;
    let x2 = scene[2].transform.position.x;
    assert!((x2 - x0 - (2.0 * step + offset)).abs() < 1e-9);
}

#[test]
fn decoration_state_never_moves_links() {
    let mut engine = loaded_engine(&["part1", "part3", "part1"]);
    let before: Vec<_> = engine
        .session()
        .scene()
        .iter()
        .map(|state| state.transform)
        .collect();

    engine.set_all_materials("black").expect("materiaal gezet");
    engine.refresh();

    let after: Vec<_> = engine
        .session()
        .scene()
        .iter()
        .map(|state| state.transform)
        .collect();
    assert_eq!(before, after);
}

#[test]
fn chain_touches_the_ground_after_layout() {
    let engine = loaded_engine(&["part3", "part3", "part3"]);

    // part3 kantelt niet; de bodem van elke schakel ligt op positie.y - 1.5.
    let lowest = engine
        .session()
        .scene()
        .iter()
        .map(|state| state.transform.position.y - 1.5)
        .fold(f64::INFINITY, f64::min);

    assert!(lowest.abs() < 1e-9, "laagste punt {lowest} raakt de grond niet");
}

#[test]
fn remove_last_link_is_rejected() {
    let mut engine = loaded_engine(&["part1"]);
    assert!(engine.remove_link(0).is_err());
    assert_eq!(engine.session().link_types().len(), 1);
}

#[test]
fn save_and_load_round_trip() {
    let mut engine = loaded_engine(&["part1", "part4"]);
    engine.set_link_material(1, "gold").expect("materiaal gezet");
    engine.refresh();

    let json = engine.save_configuration().expect("configuratie opgeslagen");
    let saved = SavedConfiguration::from_json(&json).expect("bestand leesbaar");
    assert_eq!(saved.model_urls, vec!["models/part1.glb", "models/part4.glb"]);

    let mut restored = Engine::new();
    restored
        .load_configuration(&json)
        .expect("configuratie geladen");
    assert_eq!(restored.session().config(), &saved.chain_config);
    assert_eq!(restored.session().state(), SessionState::Loading);
}

#[test]
fn malformed_file_keeps_previous_state() {
    let mut engine = loaded_engine(&["part1", "part3"]);
    let before = engine.session().config().clone();

    assert!(engine.load_configuration("{ kapot bestand").is_err());
    assert_eq!(engine.session().config(), &before);
    assert_eq!(engine.session().link_types().len(), 2);
}

#[test]
fn stale_geometry_after_list_change_is_ignored() {
    let mut engine = Engine::new();
    engine.add_link("part1").expect("schakel toegevoegd");
    let old_generation = engine.session().generation();

    engine.add_link("part3").expect("schakel toegevoegd");

    assert!(
        !engine
            .session_mut()
            .geometry_loaded(old_generation, 0, link_geometry())
    );
    assert!(!engine.is_stable());
}

#[test]
fn failed_geometry_reports_but_keeps_other_links() {
    let mut engine = Engine::new();
    engine.add_link("part5").expect("schakel toegevoegd");
    engine.add_link("part5").expect("schakel toegevoegd");

    let generation = engine.session().generation();
    engine
        .session_mut()
        .geometry_loaded(generation, 0, link_geometry());
    engine
        .session_mut()
        .geometry_failed(generation, 1, "404".to_owned());
    engine.refresh();

    assert_eq!(engine.session().scene().len(), 1);
    assert_eq!(
        engine.session().load_failures(),
        vec![(1, "404".to_owned())]
    );
    // De sessie is wel stabiel: alles wat geladen kon worden is verwerkt.
    assert!(engine.is_stable());
}

#[test]
fn spacing_change_spreads_the_chain() {
    let mut engine = loaded_engine(&["part5", "part5"]);
    let scene = engine.session().scene();
    let before = scene[1].transform.position.x - scene[0].transform.position.x;

    engine.set_spacing(1.2);
    assert!(!engine.is_stable());
    engine.refresh();

    let scene = engine.session().scene();
    let after = scene[1].transform.position.x - scene[0].transform.position.x;
    assert!(after > before);
    assert!(engine.is_stable());
}

#[test]
fn unknown_link_type_still_assembles() {
    let engine = loaded_engine(&["nieuwe-schakel"]);
    assert_eq!(engine.session().state(), SessionState::Decorated);
    assert_eq!(engine.session().scene().len(), 1);
    assert!((engine.session().scene()[0].transform.scale - 1.0).abs() < f64::EPSILON);
}
