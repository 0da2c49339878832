//! Geodesic dome generator.
//!
//! Usage:
//! ```text
//! geodome                          # default dome, statistics only
//! geodome dome.json                # configured dome, statistics only
//! geodome dome.json dome.obj       # also write dome.obj and dome.mtl
//! geodome - dome.obj               # default dome written to OBJ
//! ```

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use geodome::error::SinkError;
use geodome::sink::write_mtl;
use geodome::{Dome, DomeConfig, GeodomeError, MemorySink, ObjSink};

fn main() -> Result<(), GeodomeError> {
    // Default: WARN for everything, INFO for geodome.
    // Override with RUST_LOG env var (e.g. RUST_LOG=geodome=debug).
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into())
        .add_directive("geodome=info".parse().unwrap_or_default());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let mut args = std::env::args().skip(1);
    let config = match args.next().as_deref() {
        None | Some("-") => DomeConfig::default(),
        Some(path) => DomeConfig::from_json_file(path)?,
    };
    let dome = Dome::new(config);

    let stats = if let Some(out) = args.next() {
        let obj_path = PathBuf::from(out);
        let mtl_path = obj_path.with_extension("mtl");
        let mtllib = mtl_path
            .file_name()
            .map_or_else(|| "geodome.mtl".into(), |name| name.to_string_lossy().into_owned());

        let file = File::create(&obj_path).map_err(SinkError::from)?;
        let mut sink = ObjSink::new(BufWriter::new(file)).with_mtllib(mtllib);
        let stats = dome.generate(&mut sink)?;
        let materials = sink.materials().to_vec();
        sink.finish()?;

        let mtl = File::create(&mtl_path).map_err(SinkError::from)?;
        write_mtl(&materials, BufWriter::new(mtl))?;
        tracing::info!(
            obj = %obj_path.display(),
            mtl = %mtl_path.display(),
            solids = stats.solids(),
            "wrote OBJ"
        );
        stats
    } else {
        dome.generate(&mut MemorySink::new())?
    };

    println!("{stats}");
    Ok(())
}
