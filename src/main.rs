use logtail::cli::{self, Cli};

fn main() {
    // Parse CLI and execute command
    if let Err(e) = Cli::run() {
        cli::report_error(&e);
        std::process::exit(1);
    }
}
