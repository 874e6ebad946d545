//! Configuration module for stduritemplate
//! Compile-time limits come from the TOML profile selected at build time

// Include generated constants from build.rs
include!(concat!(env!("OUT_DIR"), "/constants.rs"));

pub mod runtime;

/// Build information and configuration metadata
pub mod build_info {
    /// Returns the configuration profile used during build
    pub fn profile() -> &'static str {
        option_env!("STDURITEMPLATE_BUILD_PROFILE").unwrap_or("development")
    }

    /// Returns the configuration directory used during build
    pub fn config_dir() -> &'static str {
        option_env!("STDURITEMPLATE_CONFIG_DIR").unwrap_or("config")
    }

    /// Returns configuration source information
    pub fn source_info() -> String {
        format!("Generated from {}/{}.toml", config_dir(), profile())
    }
}

#[cfg(test)]
mod tests {
    use super::compile_time;

    #[test]
    fn test_generated_limits_are_sane() {
        assert!(compile_time::template::MAX_TEMPLATE_SIZE > 0);
        assert!(compile_time::template::MAX_EXPRESSION_COUNT > 0);
        assert!(compile_time::expansion::MAX_OUTPUT_SIZE > 0);
        assert!(compile_time::logging::MAX_LOG_MESSAGE_LENGTH > 0);
        assert!(compile_time::conformance::MAX_WORKER_THREADS > 0);
    }

    /// Limit lines of a profile file, e.g. `max_template_size = 1048576`
    fn expansion_limits(profile: &str) -> Vec<&str> {
        profile
            .lines()
            .map(str::trim)
            .filter(|line| {
                ["max_template_size", "max_expression_count", "max_output_size"]
                    .iter()
                    .any(|key| line.starts_with(key))
            })
            .collect()
    }

    #[test]
    fn test_profiles_share_expansion_limits() {
        let development = include_str!("../../../config/development.toml");
        let production = include_str!("../../../config/production.toml");

        assert_eq!(expansion_limits(development).len(), 3);
        assert_eq!(expansion_limits(development), expansion_limits(production));
    }

    #[test]
    fn test_source_info_mentions_profile() {
        let info = super::build_info::source_info();
        assert!(info.contains(super::build_info::profile()));
        assert!(info.ends_with(".toml"));
    }
}
