//! Binary entrypoint that serves the retirement coach over HTTP.

use std::process::ExitCode;

use retirechat::start_retirechat;

/// Start the coach server on `RETIRECHAT_PORT` (default 3000).
fn main() -> ExitCode {
    start_retirechat::run()
}
