use anyhow::Result;

use crate::cli::Output;
use crate::config::ReposweepConfig;

/// Print every repository that a sweep would visit, in enumeration order.
///
/// Paths go to stdout one per line, unstyled, so the output can be piped.
pub async fn execute(config: ReposweepConfig, output: &Output) -> Result<()> {
    let (root, repos) = super::discover(&config, output).await?;

    for repo in &repos {
        println!("{repo}");
    }

    output.verbose(&format!(
        "{} repositories under {}",
        repos.len(),
        root.display()
    ));
    Ok(())
}
