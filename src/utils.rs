use anyhow::{anyhow, Context, Result};
use std::process::Command;

/// Program and arguments that hand `url` to the desktop's default browser on `os`.
///
/// `start` takes its first quoted argument as a window title, so an empty title goes first.
pub fn launcher_for(os: &str, url: &str) -> Option<(&'static str, Vec<String>)> {
    let (program, mut args): (&'static str, Vec<String>) = match os {
        "macos" => ("open", Vec::new()),
        "windows" => ("cmd", vec!["/C".into(), "start".into(), String::new()]),
        "linux" | "freebsd" | "openbsd" | "netbsd" | "dragonfly" => ("xdg-open", Vec::new()),
        _ => return None,
    };
    args.push(url.to_string());
    Some((program, args))
}

/// Opens the served map page in the default browser.
pub fn open_map_in_browser(url: &str) -> Result<()> {
    let os = std::env::consts::OS;
    let (program, args) =
        launcher_for(os, url).ok_or_else(|| anyhow!("No browser launcher known for {}", os))?;

    tracing::debug!(program, ?args, "Launching browser");
    Command::new(program)
        .args(&args)
        .spawn()
        .with_context(|| format!("Failed to run {}", program))?;
    tracing::info!("Opened map at {}", url);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "http://127.0.0.1:3001";

    #[test]
    fn desktop_launchers() {
        assert_eq!(launcher_for("macos", URL), Some(("open", vec![URL.to_string()])));
        assert_eq!(
            launcher_for("linux", URL),
            Some(("xdg-open", vec![URL.to_string()]))
        );
        assert_eq!(launcher_for("freebsd", URL).unwrap().0, "xdg-open");
    }

    #[test]
    fn windows_start_gets_an_empty_title() {
        let (program, args) = launcher_for("windows", URL).unwrap();
        assert_eq!(program, "cmd");
        assert_eq!(args, vec!["/C", "start", "", URL]);
    }

    #[test]
    fn unknown_platform_has_no_launcher() {
        assert!(launcher_for("ios", URL).is_none());
    }
}
