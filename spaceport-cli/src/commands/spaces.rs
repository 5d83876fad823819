use super::connect;
use crate::ConnectionArgs;
use anyhow::Result;
use spaceport::directory::list_spaces;
use spaceport::Config;

/// Print the spaces found on an instance.
pub async fn run_spaces(config: &Config, connection: &ConnectionArgs) -> Result<()> {
    let client = connect(config, connection)?;
    let spaces = list_spaces(&client).await?;

    println!("{:<24} {:<32} {}", "ID", "NAME", "COLOR");
    for space in &spaces {
        println!(
            "{:<24} {:<32} {}",
            space.id,
            space.name,
            space.color.as_deref().unwrap_or("-")
        );
    }
    println!();
    println!("{} spaces", spaces.len());

    Ok(())
}
