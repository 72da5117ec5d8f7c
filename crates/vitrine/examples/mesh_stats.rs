//! Mesh stats — tessellate the desk headless and print what each mesh costs.
//!
//! No window or GPU is needed. Pass a config path to try other detail levels.

use vitrine::{Scene, ViewerConfig};

fn main() {
    env_logger::init();

    let config = match ViewerConfig::from_args() {
        Ok(config) => config,
        Err(e) => {
            log::error!("{e}");
            std::process::exit(1);
        }
    };
    let scene = match Scene::desk(&config) {
        Ok(scene) => scene,
        Err(e) => {
            log::error!("{e}");
            std::process::exit(1);
        }
    };

    let detail = &config.tessellation;
    println!(
        "detail: {} sectors, {} stacks, {}",
        detail.sectors,
        detail.stacks,
        if detail.smooth { "smooth" } else { "flat" }
    );
    println!("{:<4} {:<9} {:>9} {:>9} {:>10}", "id", "kind", "vertices", "indices", "bytes");
    let mut total = 0;
    for (i, mesh) in scene.meshes().iter().enumerate() {
        let bytes = mesh.buffer.vertex_bytes().len() + mesh.buffer.index_bytes().len();
        total += bytes;
        println!(
            "{:<4} {:<9} {:>9} {:>9} {:>10}",
            i,
            mesh.desc.kind(),
            mesh.buffer.vertex_count(),
            mesh.buffer.index_count(),
            bytes
        );
    }
    println!("{} objects share {} meshes, {} bytes total", scene.objects().len(), scene.meshes().len(), total);
}
