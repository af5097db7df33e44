use crate::output;
use devstack_core::config::StackConfig;
use devstack_core::{paths, DevstackError};
use std::path::Path;

/// `devstack init` - write the default devstack.yaml.
pub fn run(root: &Path, force: bool) -> anyhow::Result<()> {
    let config_path = paths::config_path(root);
    if config_path.exists() && !force {
        return Err(DevstackError::ConfigExists(config_path.display().to_string()).into());
    }

    let project = root
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "app".to_string());

    let config = StackConfig::new(project);
    config.save(root)?;

    output::success(&format!("wrote {}", config_path.display()));
    println!();
    println!("Next steps:");
    println!("  devstack setup    # install dependencies, create env files");
    println!("  devstack doctor   # validate the environment");
    println!("  devstack dev      # run the stack");
    Ok(())
}
