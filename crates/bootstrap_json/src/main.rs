#![forbid(unsafe_code)]

fn main() {
    bootstrap_json::util::init_tracing();
    let integration = bootstrap_json::util::OutputIntegration::detect();
    if let Err(error) = bootstrap_json::run_from_env() {
        integration.report_error(&error);
        std::process::exit(error.exit_code());
    }
}
