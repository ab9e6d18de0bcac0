//! ecs-deploy binary

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if !ecs_deploy_cli::run().await? {
        std::process::exit(1);
    }
    Ok(())
}
