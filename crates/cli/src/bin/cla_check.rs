use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    cla_cli::main_entry().await
}
