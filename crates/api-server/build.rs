fn main() {
    // Re-embed the UI when it changes
    println!("cargo:rerun-if-changed=../../frontend/");
}
