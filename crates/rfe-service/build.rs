fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=proto/rfe.proto");
    tonic_build::compile_protos("proto/rfe.proto")?;
    Ok(())
}
