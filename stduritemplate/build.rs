// build.rs - TOML-driven compile-time limit generation
use std::env;
use std::fs;
use std::path::Path;

#[derive(serde::Deserialize)]
struct CompileTimeConfig {
    template: TemplateLimits,
    expansion: ExpansionLimits,
    logging: LoggingLimits,
    conformance: ConformanceLimits,
}

#[derive(serde::Deserialize)]
struct TemplateLimits {
    max_template_size: usize,
    max_expression_count: usize,
}

#[derive(serde::Deserialize)]
struct ExpansionLimits {
    max_output_size: usize,
}

#[derive(serde::Deserialize)]
struct LoggingLimits {
    max_log_message_length: usize,
}

#[derive(serde::Deserialize)]
struct ConformanceLimits {
    max_suite_file_size: u64,
    max_worker_threads: usize,
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=STDURITEMPLATE_BUILD_PROFILE");
    println!("cargo:rerun-if-env-changed=STDURITEMPLATE_CONFIG_DIR");

    let profile =
        env::var("STDURITEMPLATE_BUILD_PROFILE").unwrap_or_else(|_| "development".to_string());
    let config_dir = env::var("STDURITEMPLATE_CONFIG_DIR").unwrap_or_else(|_| "config".to_string());

    // Workspace root is the parent of the stduritemplate directory
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").unwrap();
    let workspace_root = Path::new(&manifest_dir)
        .parent()
        .expect("Could not find workspace root (parent directory)");

    let config_path = workspace_root
        .join(&config_dir)
        .join(format!("{}.toml", profile));

    println!("cargo:rerun-if-changed={}", config_path.display());

    if !config_path.exists() {
        panic!(
            "Configuration file not found: {}\nWorkspace root: {}\nLooking for: {}/{}/{}.toml",
            config_path.display(),
            workspace_root.display(),
            workspace_root.display(),
            config_dir,
            profile
        );
    }

    let config_content = fs::read_to_string(&config_path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", config_path.display(), e));

    let config: CompileTimeConfig = toml::from_str(&config_content)
        .unwrap_or_else(|e| panic!("Invalid TOML in {}: {}", config_path.display(), e));

    validate_limits(&config, &profile);
    generate_constants(&config, &profile);
}

fn validate_limits(config: &CompileTimeConfig, profile: &str) {
    const ABSOLUTE_MAX_TEMPLATE_SIZE: usize = 100_000_000;
    const ABSOLUTE_MAX_OUTPUT_SIZE: usize = 1_000_000_000;

    if config.template.max_template_size == 0 || config.expansion.max_output_size == 0 {
        panic!("LIMITS: template and output sizes must be non-zero");
    }

    if config.template.max_template_size > ABSOLUTE_MAX_TEMPLATE_SIZE {
        panic!("LIMITS: max_template_size exceeds absolute maximum");
    }

    if config.expansion.max_output_size > ABSOLUTE_MAX_OUTPUT_SIZE {
        panic!("LIMITS: max_output_size exceeds absolute maximum");
    }

    if config.conformance.max_worker_threads == 0 {
        panic!("LIMITS: max_worker_threads must be at least 1");
    }

    if profile == "production" && config.template.max_template_size > 10_000_000 {
        panic!("PRODUCTION: max_template_size too high for production");
    }
}

fn generate_constants(config: &CompileTimeConfig, profile: &str) {
    let out_dir = env::var("OUT_DIR").unwrap();
    let output_path = Path::new(&out_dir).join("constants.rs");

    let constants_code = format!(
        r#"
// Generated compile-time constants from TOML configuration
// Profile: {}
// DO NOT EDIT - Generated by build.rs

pub mod compile_time {{
    pub mod template {{
        pub const MAX_TEMPLATE_SIZE: usize = {};
        pub const MAX_EXPRESSION_COUNT: usize = {};
    }}

    pub mod expansion {{
        pub const MAX_OUTPUT_SIZE: usize = {};
    }}

    pub mod logging {{
        pub const MAX_LOG_MESSAGE_LENGTH: usize = {};
    }}

    pub mod conformance {{
        pub const MAX_SUITE_FILE_SIZE: u64 = {};
        pub const MAX_WORKER_THREADS: usize = {};
    }}
}}
"#,
        profile,
        config.template.max_template_size,
        config.template.max_expression_count,
        config.expansion.max_output_size,
        config.logging.max_log_message_length,
        config.conformance.max_suite_file_size,
        config.conformance.max_worker_threads,
    );

    fs::write(output_path, constants_code).unwrap();
}
