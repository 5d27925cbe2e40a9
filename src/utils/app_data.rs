use std::path::{Path, PathBuf};

const APP_NAME: &str = "exactline";
const CONFIG_FILE: &str = "config.json";

/// Get the per-user configuration directory for exactline
pub fn get_config_dir() -> Option<PathBuf> {
    let base = if cfg!(target_os = "macos") {
        dirs::home_dir().map(|h| h.join("Library").join("Application Support"))
    } else {
        // Linux/Unix: XDG_CONFIG_HOME or ~/.config; Windows: roaming app data
        dirs::config_dir()
    };

    base.map(|b| b.join(APP_NAME))
}

/// Path of the default config file, whether or not it exists
pub fn get_default_config_path() -> Option<PathBuf> {
    get_config_dir().map(|dir| dir.join(CONFIG_FILE))
}

/// Expand a leading `~` to the user's home directory
pub fn expand_home(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };

    match dirs::home_dir() {
        Some(home) => home.join(rest),
        None => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_path_name() {
        if let Some(path) = get_default_config_path() {
            assert!(path.ends_with("exactline/config.json"));
        }
    }

    #[test]
    fn test_expand_home() {
        let plain = Path::new("/srv/data/200k.txt");
        assert_eq!(expand_home(plain), plain);

        let relative = Path::new("data/~notes.txt");
        assert_eq!(expand_home(relative), relative);

        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_home(Path::new("~/200k.txt")), home.join("200k.txt"));
            assert_eq!(expand_home(Path::new("~")), home);
        }
    }
}
