/// Environment variable carrying the reduced-motion preference
pub const REDUCE_MOTION_VAR: &str = "REDUCE_MOTION";

/// Read the preference once; `forced` comes from `--reduced-motion`
pub fn prefers_reduced_motion(forced: bool) -> bool {
    forced || is_truthy(std::env::var(REDUCE_MOTION_VAR).ok().as_deref())
}

fn is_truthy(value: Option<&str>) -> bool {
    match value {
        Some(v) => matches!(
            v.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on" | "reduce"
        ),
        None => false,
    }
}
