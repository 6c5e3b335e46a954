fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // ESP-IDF link environment is only needed for the on-target build.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
