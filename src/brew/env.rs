//! The environment that `brew shellenv` would export.
//!
//! Injecting these variables into each `brew` invocation makes the binaries
//! and manuals under the prefix resolvable without touching the user's shell
//! profile.
use std::fmt;

/// Ordered list of environment variable assignments for a Homebrew prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellEnv {
    vars: Vec<(String, String)>,
}

impl ShellEnv {
    /// Build the environment for `prefix`, extending `PATH`, `MANPATH` and
    /// `INFOPATH` from the current process environment.
    #[must_use]
    pub fn from_process(prefix: &str) -> Self {
        Self::with_lookup(prefix, |name| std::env::var(name).ok())
    }

    /// Build the environment for `prefix`, reading inherited values through
    /// `lookup`.
    ///
    /// Mirrors the shell expansions used by `brew shellenv`:
    /// `${PATH+:$PATH}`, `${MANPATH+:$MANPATH}:` and `${INFOPATH:-}`.
    #[must_use]
    pub fn with_lookup(prefix: &str, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let append_if_set = |name: &str| lookup(name).map_or_else(String::new, |v| format!(":{v}"));

        let vars = vec![
            ("HOMEBREW_PREFIX".to_string(), prefix.to_string()),
            ("HOMEBREW_CELLAR".to_string(), format!("{prefix}/Cellar")),
            ("HOMEBREW_REPOSITORY".to_string(), prefix.to_string()),
            (
                "PATH".to_string(),
                format!("{prefix}/bin:{prefix}/sbin{}", append_if_set("PATH")),
            ),
            (
                "MANPATH".to_string(),
                format!("{prefix}/share/man{}:", append_if_set("MANPATH")),
            ),
            (
                "INFOPATH".to_string(),
                format!(
                    "{prefix}/share/info:{}",
                    lookup("INFOPATH").unwrap_or_default()
                ),
            ),
        ];
        Self { vars }
    }

    /// Look up a single variable.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// The `PATH` value used to resolve `brew`.
    #[must_use]
    pub fn path(&self) -> &str {
        self.get("PATH").unwrap_or_default()
    }

    /// Borrowed `(name, value)` pairs in declaration order.
    #[must_use]
    pub fn pairs(&self) -> Vec<(&str, &str)> {
        self.vars
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect()
    }
}

impl fmt::Display for ShellEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, value) in &self.vars {
            writeln!(f, "{name}={value}")?;
        }
        Ok(())
    }
}
