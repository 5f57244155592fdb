//! Start-at-login registration

use crate::constants::app;
use crate::error::{AppError, Result};
use std::path::{Path, PathBuf};

pub trait LoginItemRegistrar {
    fn install(&mut self, executable: &Path) -> Result<()>;
    fn remove(&mut self) -> Result<()>;
    fn is_registered(&self) -> bool;
}

/// Template-file registrar: XDG autostart entry or macOS LaunchAgent
#[derive(Debug, Clone)]
pub struct LoginItem {
    path: PathBuf,
}

impl LoginItem {
    pub fn at<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

cfg_if::cfg_if! {
    if #[cfg(target_os = "macos")] {
        fn label() -> String {
            format!("com.{}", app::APP_NAME)
        }

        impl LoginItem {
            pub fn for_current_user() -> Result<Self> {
                let home = dirs::home_dir()
                    .ok_or_else(|| AppError::login("Cannot determine home directory"))?;
                Ok(Self::at(
                    home.join("Library")
                        .join("LaunchAgents")
                        .join(format!("{}.plist", label())),
                ))
            }
        }

        fn render(executable: &Path) -> String {
            format!(
                r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
    <key>Label</key>
    <string>{label}</string>
    <key>ProgramArguments</key>
    <array>
        <string>{exe}</string>
    </array>
    <key>RunAtLoad</key>
    <true/>
</dict>
</plist>
"#,
                label = label(),
                exe = executable.display()
            )
        }

        fn after_install(path: &Path) {
            launchctl("load", path);
        }

        fn before_remove(path: &Path) {
            launchctl("unload", path);
        }

        fn launchctl(verb: &str, path: &Path) {
            match std::process::Command::new("launchctl").arg(verb).arg(path).status() {
                Ok(status) if status.success() => {}
                Ok(status) => log::warn!("launchctl {} exited with {}", verb, status),
                Err(e) => log::warn!("Failed to run launchctl {}: {}", verb, e),
            }
        }
    } else {
        impl LoginItem {
            pub fn for_current_user() -> Result<Self> {
                let config_dir = dirs::config_dir()
                    .ok_or_else(|| AppError::login("Cannot determine config directory"))?;
                Ok(Self::at(
                    config_dir
                        .join("autostart")
                        .join(format!("{}.desktop", app::APP_NAME)),
                ))
            }
        }

        fn render(executable: &Path) -> String {
            format!(
                "[Desktop Entry]\n\
                 Type=Application\n\
                 Name=Float Clock\n\
                 Comment=Always-on-top clock widget\n\
                 Exec=\"{}\"\n\
                 X-GNOME-Autostart-enabled=true\n\
                 NoDisplay=true\n",
                executable.display()
            )
        }

        fn after_install(_path: &Path) {}

        fn before_remove(_path: &Path) {}
    }
}

impl LoginItemRegistrar for LoginItem {
    fn install(&mut self, executable: &Path) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| AppError::login(format!("Failed to create {:?}: {}", parent, e)))?;
        }
        std::fs::write(&self.path, render(executable))?;
        after_install(&self.path);
        log::info!("Registered login item at {:?}", self.path);
        Ok(())
    }

    fn remove(&mut self) -> Result<()> {
        if !self.path.exists() {
            return Ok(());
        }
        before_remove(&self.path);
        std::fs::remove_file(&self.path)?;
        log::info!("Removed login item {:?}", self.path);
        Ok(())
    }

    fn is_registered(&self) -> bool {
        self.path.is_file()
    }
}

#[cfg(all(test, not(target_os = "macos")))]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_install_and_remove() {
        let dir = tempdir().unwrap();
        let mut item = LoginItem::at(dir.path().join("autostart").join("float-clock.desktop"));
        assert!(!item.is_registered());

        item.install(Path::new("/opt/float clock/float_clock")).unwrap();
        assert!(item.is_registered());
        let content = std::fs::read_to_string(item.path()).unwrap();
        assert!(content.starts_with("[Desktop Entry]"));
        assert!(content.contains("Exec=\"/opt/float clock/float_clock\""));

        item.remove().unwrap();
        assert!(!item.is_registered());
        // removing twice is fine
        item.remove().unwrap();
    }
}
