use std::env;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Fall back to the bundled protoc when the host has none configured.
    if env::var_os("PROTOC").is_none() {
        let protoc = protoc_bin_vendored::protoc_bin_path()
            .map_err(|e| format!("vendored protoc unavailable: {e:?}"))?;
        env::set_var("PROTOC", protoc);
    }

    tonic_build::compile_protos("proto/scoregraph.proto")?;

    Ok(())
}
