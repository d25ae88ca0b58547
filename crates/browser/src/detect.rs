//! Chromium detection and install guidance.

use std::path::PathBuf;

/// Chromium-based executables that speak CDP, in preference order.
const CHROMIUM_EXECUTABLES: &[&str] = &[
    "chrome",
    "google-chrome",
    "google-chrome-stable",
    "chromium",
    "chromium-browser",
    "msedge",
    "microsoft-edge-stable",
    "brave-browser",
];

#[cfg(target_os = "macos")]
const MACOS_APP_PATHS: &[&str] = &[
    "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
    "/Applications/Chromium.app/Contents/MacOS/Chromium",
    "/Applications/Microsoft Edge.app/Contents/MacOS/Microsoft Edge",
    "/Applications/Brave Browser.app/Contents/MacOS/Brave Browser",
];

/// Result of browser detection.
#[derive(Debug, Clone)]
pub struct DetectionResult {
    pub found: bool,
    pub path: Option<PathBuf>,
    pub install_hint: String,
}

/// Detect a usable Chromium-based browser.
///
/// Checks the configured path, then the `CHROME` environment variable,
/// then platform install locations, then executables on `PATH`.
pub fn detect_browser(custom_path: Option<&str>) -> DetectionResult {
    if let Some(path) = custom_path {
        let p = PathBuf::from(path);
        if p.exists() {
            return found(p);
        }
    }

    if let Ok(path) = std::env::var("CHROME") {
        let p = PathBuf::from(&path);
        if p.exists() {
            return found(p);
        }
    }

    #[cfg(target_os = "macos")]
    for path in MACOS_APP_PATHS {
        let p = PathBuf::from(path);
        if p.exists() {
            return found(p);
        }
    }

    for name in CHROMIUM_EXECUTABLES {
        if let Ok(path) = which::which(name) {
            return found(path);
        }
    }

    DetectionResult {
        found: false,
        path: None,
        install_hint: install_instructions(),
    }
}

fn found(path: PathBuf) -> DetectionResult {
    DetectionResult {
        found: true,
        path: Some(path),
        install_hint: String::new(),
    }
}

/// Platform-specific install instructions for error messages.
pub fn install_instructions() -> String {
    let instructions = if cfg!(target_os = "macos") {
        "  brew install --cask google-chrome"
    } else if cfg!(target_os = "linux") {
        "  Debian/Ubuntu: sudo apt install chromium-browser\n  \
         Fedora:         sudo dnf install chromium\n  \
         Arch:           sudo pacman -S chromium"
    } else {
        "  Download from https://www.google.com/chrome/"
    };

    format!(
        "No Chromium-based browser found. Install one:\n\n\
         {instructions}\n\n\
         Or set `browser.chrome_path` in wortbot.toml, or the CHROME \
         environment variable."
    )
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn install_instructions_mention_a_browser() {
        assert!(install_instructions().contains("Chrom"));
    }

    #[test]
    fn custom_path_takes_precedence() {
        let dir = std::env::temp_dir();
        let fake = dir.join("fake-chromium-for-wortbot-test");
        std::fs::write(&fake, "stub").unwrap();

        let result = detect_browser(fake.to_str());
        assert!(result.found);
        assert_eq!(result.path.as_deref(), Some(fake.as_path()));

        std::fs::remove_file(&fake).unwrap();
    }

    #[test]
    fn missing_custom_path_falls_through() {
        let result = detect_browser(Some("/nonexistent/chrome"));
        // Either a real browser is installed, or we get install guidance.
        assert!(result.found || !result.install_hint.is_empty());
    }
}
