use std::fs;
use std::path::Path;

use tracing::{debug, info};

use super::{PromptConfig, PromptProfile};

const SYSTEM_FILE: &str = "system.txt";
const CONFIG_FILE: &str = "config.toml";

/// Load every persona under `dir`; each subdirectory is one profile named
/// after the directory, holding `system.txt` and an optional `config.toml`.
pub fn load_prompt_profiles(
    dir: impl AsRef<Path>,
) -> Result<Vec<PromptProfile>, Box<dyn std::error::Error>> {
    let dir = dir.as_ref();
    let mut profiles = Vec::new();

    for entry in fs::read_dir(dir)
        .map_err(|e| format!("Failed to read prompts directory '{}': {}", dir.display(), e))?
    {
        let path = entry?.path();
        if !path.is_dir() {
            continue;
        }

        let profile = load_single_profile(&path)
            .map_err(|e| format!("Failed loading profile '{}': {}", path.display(), e))?;
        debug!("Loaded prompt profile '{}'", profile.name);
        profiles.push(profile);
    }

    profiles.sort_by(|a, b| a.name.cmp(&b.name));
    info!("Loaded {} prompt profiles from {}", profiles.len(), dir.display());
    Ok(profiles)
}

/// Take the profile called `name` out of `profiles`.
pub fn take_profile(
    profiles: &mut Vec<PromptProfile>,
    name: &str,
) -> Result<PromptProfile, Box<dyn std::error::Error>> {
    let index = profiles
        .iter()
        .position(|p| p.name == name)
        .ok_or_else(|| format!("Missing required prompt profile '{}'", name))?;
    Ok(profiles.swap_remove(index))
}

fn load_single_profile(path: &Path) -> Result<PromptProfile, Box<dyn std::error::Error>> {
    let profile_name = path
        .file_name()
        .and_then(|s| s.to_str())
        .ok_or("Invalid profile directory name")?
        .to_ascii_lowercase();

    let system_prompt_path = path.join(SYSTEM_FILE);
    let config_path = path.join(CONFIG_FILE);

    let system_prompt = read_required_file(&system_prompt_path)?.trim().to_string();
    if system_prompt.is_empty() {
        return Err(format!("'{}' is empty", system_prompt_path.display()).into());
    }

    let config: PromptConfig = if config_path.exists() {
        let raw = read_required_file(&config_path)?;
        toml::from_str(&raw).map_err(|e| {
            format!(
                "Failed to parse config file '{}': {}",
                config_path.display(),
                e
            )
        })?
    } else {
        PromptConfig::default()
    };

    Ok(PromptProfile {
        name: profile_name,
        system_prompt,
        config,
    })
}

fn read_required_file(path: &Path) -> Result<String, Box<dyn std::error::Error>> {
    if !path.exists() {
        return Err(format!("Required file '{}' does not exist", path.display()).into());
    }

    fs::read_to_string(path)
        .map_err(|e| format!("Failed to read required file '{}': {}", path.display(), e).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompts::{ADJUST_PROFILE, GENERATE_PROFILE};

    fn shipped_prompts_dir() -> std::path::PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("prompts")
    }

    #[test]
    fn shipped_profiles_load() {
        let mut profiles = load_prompt_profiles(shipped_prompts_dir()).unwrap();

        let generate = take_profile(&mut profiles, GENERATE_PROFILE).unwrap();
        assert!(generate.system_prompt.contains("Forza Horizon 5"));
        assert_eq!(generate.config.max_output_tokens, Some(4000));

        let adjust = take_profile(&mut profiles, ADJUST_PROFILE).unwrap();
        assert!(adjust.system_prompt.contains("geri bildirim"));
    }

    #[test]
    fn missing_profile_is_reported() {
        let mut profiles = Vec::new();
        let err = take_profile(&mut profiles, GENERATE_PROFILE).unwrap_err();
        assert!(err.to_string().contains("generate"));
    }

    #[test]
    fn missing_directory_is_an_error() {
        assert!(load_prompt_profiles("/definitely/not/here").is_err());
    }
}
