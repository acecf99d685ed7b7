use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    taggable_cli::main_entry().await
}
