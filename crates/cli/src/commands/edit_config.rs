use crate::config::config_path;
use std::process::Command;

const NEW_CONFIG: &str = "# Hotelier config (key = value)\n\
# Run `hotelier-cli -show-config` to list the available keys\n";

pub fn run() {
    let path = match config_path() {
        Some(p) => p,
        None => {
            eprintln!("Could not determine config directory");
            return;
        }
    };

    if !path.exists() {
        if let Some(parent) = path.parent()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            eprintln!("Failed to create config directory: {}", e);
            return;
        }
        if let Err(e) = std::fs::write(&path, NEW_CONFIG) {
            eprintln!("Failed to create config file: {}", e);
            return;
        }
        log::info!("created {}", path.display());
    }

    println!("Opening {}", path.display());

    // $VISUAL, then $EDITOR, then platform fallbacks
    for var in ["VISUAL", "EDITOR"] {
        let Ok(editor) = std::env::var(var) else {
            continue;
        };
        if editor.trim().is_empty() {
            continue;
        }
        match Command::new(&editor).arg(&path).status() {
            Ok(s) if s.success() => return,
            Ok(_) => eprintln!("Editor exited with error"),
            Err(e) => eprintln!("Failed to run {}: {}", editor, e),
        }
    }

    #[cfg(target_os = "macos")]
    {
        let _ = Command::new("open").arg("-t").arg(&path).status();
    }

    #[cfg(target_os = "linux")]
    {
        if Command::new("xdg-open").arg(&path).status().is_err() {
            for editor in &["nano", "vim", "vi"] {
                if Command::new(editor).arg(&path).status().is_ok() {
                    return;
                }
            }
        }
    }

    #[cfg(target_os = "windows")]
    {
        let _ = Command::new("notepad").arg(&path).status();
    }
}
