/*
 * Responsibility
 * - boot the tokio runtime
 * - call app::run() (no logic here)
 */
use anyhow::Result;

use flightontime_gate::app;

#[tokio::main]
async fn main() -> Result<()> {
    app::run().await
}
