#[tokio::main]
async fn main() -> anyhow::Result<()> {
    featured::start_server().await
}
