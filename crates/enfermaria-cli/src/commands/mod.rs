pub mod export;
pub mod init;
pub mod options;
pub mod visit;

use enfermaria_config::AppConfig;
use enfermaria_engine::Session;

/// Open the configured store, pointing the operator at `init` when unset
pub fn open_session(config: AppConfig) -> Result<Session, Box<dyn std::error::Error>> {
    Session::start(config).map_err(|e| {
        format!("{}\nRun `enfermaria init --db <PATH>` to choose a store file", e).into()
    })
}
