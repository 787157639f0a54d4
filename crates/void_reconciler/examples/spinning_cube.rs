//! Spinning cube
//!
//! Mounts a renderer with a green cube and a camera, then re-renders the
//! tree with an increasing rotation. The renderer receives a `frame` prop
//! so every revision also redraws.
//!
//! Run with: RUST_LOG=debug cargo run -p void_reconciler --example spinning_cube

use void_reconciler::prelude::*;

const FRAMES: i64 = 120;
const STEP: f64 = 0.01;

fn xyz(pairs: &[(&str, f64)]) -> Value {
    pairs.iter().map(|(k, v)| (*k, *v)).collect()
}

fn app(frame: i64) -> Node {
    let angle = frame as f64 * STEP;
    let cube = Element::new("threeMesh")
        .prop("rotation", xyz(&[("x", angle), ("y", angle)]))
        .child(
            Element::new("threeBoxGeometry")
                .prop("width", 1)
                .prop("height", 1)
                .prop("depth", 1),
        )
        .child(
            Element::new("threeMeshBasicMaterial")
                .prop("parameters", [("color", "#00ff00")].into_iter().collect::<Value>()),
        );

    Element::new("threeWebGLRenderer")
        .prop("width", 300)
        .prop("height", 300)
        .prop("frame", frame)
        .child(Element::new("threeScene").child(cube))
        .child(
            Element::new("threePerspectiveCamera")
                .prop("fov", 75)
                .prop("aspect", 1)
                .prop("near", 0.1)
                .prop("far", 1000)
                .prop("position", xyz(&[("z", 5.0)])),
        )
        .into()
}

fn main() -> Result<()> {
    env_logger::init();

    let config = match std::env::args().nth(1) {
        Some(path) => ReconcilerConfig::load(&path).unwrap_or_else(|e| {
            log::warn!("Using default config, failed to load {}: {}", path, e);
            ReconcilerConfig::default()
        }),
        None => ReconcilerConfig::default(),
    };

    let mut container = Container::new();
    let mut reconciler = Reconciler::new(SceneHost::new(config));
    reconciler.mount(&app(0), &mut container)?;

    for frame in 1..=FRAMES {
        reconciler.update(&app(frame), &mut container)?;
    }

    let Some(Instance::Renderer(composite)) = reconciler.root_instance() else {
        log::error!("Root is not a renderer");
        return Ok(());
    };
    let store = reconciler.host().store();
    let info = store.renderer(composite.renderer)?.info();
    let mesh = composite
        .scene
        .map(|scene| store.scene(scene))
        .transpose()?
        .and_then(|scene| scene.children().first().copied());

    log::info!(
        "Rendered {} frames, {} draw calls in the last one",
        info.frames,
        info.last_draw_calls
    );
    if let Some(mesh) = mesh {
        let rotation = store.mesh(mesh)?.rotation;
        log::info!("Final rotation: x={:.2} y={:.2}", rotation.x, rotation.y);
    }

    reconciler.unmount(&mut container)?;
    Ok(())
}
