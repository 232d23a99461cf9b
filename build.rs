fn main() {
    // Rebuild if the embedded shader sources change
    println!("cargo:rerun-if-changed=shaders/field_vert.wgsl");
    println!("cargo:rerun-if-changed=shaders/field_frag.wgsl");
}
