//! Generates the gRPC client for `proto/wharf/api/v5/builds.proto`.

use std::path::Path;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    if std::env::var_os("PROTOC").is_none() {
        std::env::set_var("PROTOC", protoc_bin_vendored::protoc_bin_path()?);
    }
    let well_known = protoc_bin_vendored::include_path()?;

    tonic_build::configure()
        .build_server(false)
        .compile_protos(
            &["proto/wharf/api/v5/builds.proto"],
            &[Path::new("proto"), well_known.as_path()],
        )?;
    println!("cargo:rerun-if-changed=proto");
    Ok(())
}
