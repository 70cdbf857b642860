use std::{error::Error, path::Path};

const PROTO_ROOT: &str = "proto";
const SCHEMA: &str = "proto/mesos/containerizer.proto";

fn main() -> Result<(), Box<dyn Error>> {
    println!("cargo:rerun-if-changed={SCHEMA}");

    // No system protoc required.
    let protoc = protoc_bin_vendored::protoc_bin_path()?;
    // SAFETY: build scripts are single-threaded.
    unsafe {
        std::env::set_var("PROTOC", &protoc);
    }

    // The containerizer protocol runs over stdio: messages only, no gRPC stubs.
    tonic_build::configure()
        .build_server(false)
        .build_client(false)
        .compile_protos(&[Path::new(SCHEMA)], &[Path::new(PROTO_ROOT)])?;

    Ok(())
}
