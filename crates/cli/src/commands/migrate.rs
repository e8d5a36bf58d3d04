use anyhow::Result;

pub(crate) async fn run() -> Result<()> {
    let storage = super::connect().await?;
    storage.migrate().await?;
    println!("Migrations applied");
    Ok(())
}
