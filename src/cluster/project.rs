//! Per-run namespace management.

use tracing::{debug, info, warn};

use super::{ClusterCli, ensure_success, render_command};
use crate::error::Result;

/// Prefix for projects created when no namespace is configured.
pub const DEFAULT_PROJECT_PREFIX: &str = "update-buildstatus";

/// Length of the random suffix appended to created project names.
const SUFFIX_LEN: usize = 8;

/// The namespace a run executes in, and whether the run created it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectSession {
    namespace: String,
    owned: bool,
}

impl ProjectSession {
    /// Use an existing namespace. It is never deleted on release.
    #[must_use]
    pub fn existing(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            owned: false,
        }
    }

    /// Use the configured namespace, or create a fresh project named
    /// `<prefix>-<random suffix>`.
    ///
    /// # Errors
    ///
    /// Returns `ClusterError` if the project cannot be created.
    pub async fn acquire<C: ClusterCli>(
        cli: &C,
        configured: Option<&str>,
        prefix: &str,
    ) -> Result<Self> {
        if let Some(namespace) = configured.filter(|ns| !ns.is_empty()) {
            info!(namespace, "using configured namespace");
            return Ok(Self::existing(namespace));
        }

        let namespace = generated_name(prefix);
        let args = vec![
            String::from("new-project"),
            namespace.clone(),
            String::from("--skip-config-write"),
        ];
        run_checked(cli, args).await?;
        info!(namespace = %namespace, "created project");
        Ok(Self {
            namespace,
            owned: true,
        })
    }

    /// The namespace scenarios run in.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Returns whether this session created its namespace.
    #[must_use]
    pub const fn is_owned(&self) -> bool {
        self.owned
    }

    /// Delete the namespace if this session created it and `keep` is false.
    ///
    /// # Errors
    ///
    /// Returns `ClusterError` if the project cannot be deleted.
    pub async fn release<C: ClusterCli>(self, cli: &C, keep: bool) -> Result<()> {
        if !self.owned {
            return Ok(());
        }
        if keep {
            warn!(namespace = %self.namespace, "keeping project for inspection");
            return Ok(());
        }
        let args = vec![
            String::from("delete"),
            String::from("project"),
            self.namespace.clone(),
        ];
        run_checked(cli, args).await?;
        info!(namespace = %self.namespace, "deleted project");
        Ok(())
    }
}

fn generated_name(prefix: &str) -> String {
    let suffix: String = uuid::Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .take(SUFFIX_LEN)
        .collect();
    format!("{prefix}-{suffix}")
}

async fn run_checked<C: ClusterCli>(cli: &C, args: Vec<String>) -> Result<()> {
    debug!(command = %render_command(&args), "invoking cluster client");
    let output = cli.invoke(args.clone()).await?;
    ensure_success(&args, output)?;
    Ok(())
}
