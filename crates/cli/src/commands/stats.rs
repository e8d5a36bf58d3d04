use anyhow::Result;
use ocdtracker_storage::EntityKind;

pub(crate) async fn run(entity: Option<&str>) -> Result<()> {
    let kinds = match entity {
        Some(name) => vec![name.parse::<EntityKind>()?],
        None => EntityKind::ALL.to_vec(),
    };

    let storage = super::connect().await?;
    let mut counts = serde_json::Map::new();
    for kind in kinds {
        let rows = storage.count_rows(kind).await?;
        counts.insert(kind.table().to_owned(), rows.into());
    }
    println!("{}", serde_json::to_string_pretty(&counts)?);
    Ok(())
}
