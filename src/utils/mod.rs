pub mod path_validator;

/// Environment switch set by `--verbose`.
pub const VERBOSE_ENV: &str = "NPMBUMP_VERBOSE";

pub fn verbose_enabled() -> bool {
    std::env::var(VERBOSE_ENV).is_ok_and(|v| v == "1")
}
