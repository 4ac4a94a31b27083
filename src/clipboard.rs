use tracing::debug;

/// Text register for cut and paste, mirrored to the system clipboard when
/// one is reachable
pub struct Clipboard {
    register: Option<String>,
    use_system: bool,
}

impl Clipboard {
    pub fn new() -> Self {
        Self {
            register: None,
            use_system: true,
        }
    }

    /// A clipboard that never touches the system one
    pub fn local() -> Self {
        Self {
            register: None,
            use_system: false,
        }
    }

    pub fn register(&self) -> Option<&str> {
        self.register.as_deref()
    }

    /// Store cut text. Returns a status message for the user.
    pub fn store(&mut self, text: String) -> String {
        let chars = text.chars().count();
        let message = if self.use_system {
            match copy_to_system_clipboard(&text) {
                Ok(()) => format!("Cut {} character(s) to system clipboard", chars),
                Err(e) => {
                    debug!(error = %e, "system clipboard unavailable");
                    format!("Cut {} character(s)", chars)
                }
            }
        } else {
            format!("Cut {} character(s)", chars)
        };
        self.register = Some(text);
        message
    }

    /// Text to paste: the system clipboard if it has any, else the register
    pub fn fetch(&self) -> Result<String, String> {
        if self.use_system {
            match paste_from_system_clipboard() {
                Ok(text) if !text.is_empty() => return Ok(text),
                Ok(_) => {}
                Err(e) => debug!(error = %e, "system clipboard unavailable"),
            }
        }
        self.register
            .clone()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| "Nothing to paste".to_string())
    }
}

/// Copy text to system clipboard using platform-appropriate method
fn copy_to_system_clipboard(text: &str) -> Result<(), String> {
    // Try command-line tools first on Linux (more reliable with terminal apps)
    #[cfg(target_os = "linux")]
    {
        use std::io::Write;
        use std::process::{Command, Stdio};

        // Try wl-copy (Wayland) first, then xclip (X11)
        let commands = [
            ("wl-copy", vec![]),
            ("xclip", vec!["-selection", "clipboard"]),
            ("xsel", vec!["--clipboard", "--input"]),
        ];

        for (cmd, args) in commands {
            if let Ok(mut child) = Command::new(cmd)
                .args(&args)
                .stdin(Stdio::piped())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .spawn()
            {
                if let Some(mut stdin) = child.stdin.take() {
                    if stdin.write_all(text.as_bytes()).is_ok() {
                        drop(stdin);
                        if child.wait().map(|s| s.success()).unwrap_or(false) {
                            return Ok(());
                        }
                    }
                }
            }
        }

        Err("No clipboard tool found (install xclip or wl-copy)".to_string())
    }

    // Use arboard on other platforms (macOS, Windows)
    #[cfg(not(target_os = "linux"))]
    {
        let mut clipboard = arboard::Clipboard::new()
            .map_err(|e| format!("Clipboard error: {}", e))?;
        clipboard
            .set_text(text)
            .map_err(|e| format!("Clipboard error: {}", e))?;
        Ok(())
    }
}

/// Paste text from system clipboard using platform-appropriate method
fn paste_from_system_clipboard() -> Result<String, String> {
    #[cfg(target_os = "linux")]
    {
        use std::process::{Command, Stdio};

        let commands = [
            ("wl-paste", vec!["--no-newline"]),
            ("xclip", vec!["-selection", "clipboard", "-o"]),
            ("xsel", vec!["--clipboard", "--output"]),
        ];

        for (cmd, args) in commands {
            if let Ok(output) = Command::new(cmd).args(&args).stderr(Stdio::null()).output() {
                if output.status.success() {
                    return String::from_utf8(output.stdout)
                        .map_err(|_| "Clipboard contains invalid UTF-8".to_string());
                }
            }
        }

        Err("No clipboard tool found (install xclip or wl-copy)".to_string())
    }

    #[cfg(not(target_os = "linux"))]
    {
        let mut clipboard = arboard::Clipboard::new()
            .map_err(|e| format!("Clipboard error: {}", e))?;
        clipboard
            .get_text()
            .map_err(|e| format!("Clipboard error: {}", e))
    }
}
