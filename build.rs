fn main() {
    // Only emit ESP-IDF link/env propagation when building firmware images;
    // host-side test builds have no ESP-IDF toolchain available.
    if std::env::var_os("CARGO_FEATURE_ESPIDF").is_some() {
        embuild::espidf::sysenv::output();
    }
}
