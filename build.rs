fn main() {
    // Build-time config override is baked in through option_env!.
    println!("cargo:rerun-if-env-changed=VOLTWATCH_CONFIG");

    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
