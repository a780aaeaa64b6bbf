use anyhow::Result;

use litcube_engine::device::GpuInit;
use litcube_engine::logging::{init_logging, LoggingConfig};
use litcube_engine::render::Renderer;
use litcube_engine::scene::SceneConfig;
use litcube_engine::shader::ShaderSources;
use litcube_engine::window::{Runtime, RuntimeConfig};

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    // Optional override: `litcube-demo <vertex.wgsl> <fragment.wgsl>`.
    let args: Vec<String> = std::env::args().skip(1).collect();
    let shaders = match args.as_slice() {
        [vertex, fragment] => ShaderSources::from_files(vertex, fragment)?,
        [] => ShaderSources::default(),
        _ => anyhow::bail!("usage: litcube-demo [<vertex.wgsl> <fragment.wgsl>]"),
    };

    log::info!("starting litcube");

    let renderer = Renderer::new(SceneConfig::default(), shaders);
    Runtime::run(RuntimeConfig::default(), GpuInit::default(), renderer)
}
