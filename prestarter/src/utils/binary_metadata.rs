pub(crate) const VERSION: &str =
    konst::option::unwrap_or!(option_env!("PRESTARTER_VERSION"), "development");
pub(crate) const GIT_COMMIT: &str =
    konst::option::unwrap_or!(option_env!("GIT_COMMIT"), "development");
pub(crate) const RUST_VERSION: &str = env!("CARGO_PKG_RUST_VERSION");

pub fn binary_metadata() -> String {
    format!("Prestarter Version: {VERSION}, Rust Version: {RUST_VERSION}, GitCommit: {GIT_COMMIT}")
}
