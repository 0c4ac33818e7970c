use anyhow::{Context, bail};
use skmvis::{LoaderSettings, MeshBuffer, Session};

fn print_model(model: &MeshBuffer) {
    println!("Model: {}", model.source_path);
    match model.degrade_reason() {
        None => println!("Pose: animated"),
        Some(reason) => println!("Pose: bind pose only ({})", reason.name()),
    }
    println!(
        "Vertices: {}, indices: {}, scale: {:.4}",
        model.vertices.len(),
        model.indices.len(),
        model.framing.scale
    );

    println!("Bones ({}):", model.bone_names.len());
    for (i, (name, p)) in model.bone_names.iter().zip(model.bone_positions()).enumerate() {
        println!(
            "  [{i}] {name} parent={} at ({:.3}, {:.3}, {:.3})",
            model.bone_parents[i], p.x, p.y, p.z
        );
    }

    println!("Materials ({}):", model.materials.len());
    for (path, material) in model.material_paths.iter().zip(&model.materials) {
        println!(
            "  {path}: {} with {} layer(s), blend {}",
            material.material_type.name(),
            material.texture_count,
            material.material_blend_type.name()
        );
    }

    println!("Groups ({}):", model.groups.len());
    for group in &model.groups {
        println!(
            "  material {} faces {} at index {}",
            group.material_index,
            group.face_count(),
            group.offset
        );
    }

    if !model.animation_names.is_empty() {
        println!("Animations ({}):", model.animation_names.len());
        for name in &model.animation_names {
            println!("  {name}");
        }
    }

    for failure in &model.texture_failures {
        println!("Texture failed: {} ({})", failure.path, failure.error);
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let json = args.iter().any(|a| a == "--json");
    let Some(path) = args.iter().find(|a| !a.starts_with("--")) else {
        bail!("usage: skmvis <mesh.skm> [--json]");
    };

    let mut session = Session::new(LoaderSettings::load());
    let model = session
        .open(path)
        .with_context(|| format!("failed to load model '{path}'"))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&model.summary())?);
    } else {
        print_model(model);
    }

    Ok(())
}
