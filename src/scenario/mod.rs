//! The static table of build failure scenarios.
//!
//! Each scenario names a fixture that defines a build configuration rigged to
//! fail in one specific way, the build configuration to start, and the status
//! reason and message the build system is expected to report. The table is
//! immutable; [`Scenario::resolve`] binds a scenario to a fixture directory
//! without altering it.

use camino::{Utf8Path, Utf8PathBuf};

use crate::error::{Result, ScenarioError};
use crate::status::StatusReason;


/// Additional build-start argument needed by a scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtraArg {
    /// Upload a directory, relative to the fixture directory, as binary
    /// build input.
    FromDir(&'static str),
}

/// A named build failure scenario.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scenario {
    /// Short scenario identifier used for selection and reporting.
    pub name: &'static str,
    /// Human-readable description of the failure being exercised.
    pub description: &'static str,
    /// Fixture file name, relative to the fixture directory.
    pub fixture: &'static str,
    /// Build configuration to start once the fixture is created.
    pub build_config: &'static str,
    /// Extra arguments passed when starting the build.
    pub extra_args: &'static [ExtraArg],
    /// The reason the build must report.
    pub expected_reason: StatusReason,
}

impl Scenario {
    /// Returns the message the build must report.
    ///
    /// Every scenario's expected reason belongs to the known taxonomy, so the
    /// message is always present for table entries.
    #[must_use]
    pub fn expected_message(&self) -> &'static str {
        self.expected_reason.message().unwrap_or_default()
    }

    /// Bind the scenario to a fixture directory, checking that every path it
    /// references exists.
    ///
    /// The directory is made absolute first, so a relative `fixtures_dir`
    /// still yields absolute fixture paths and `--from-dir` arguments.
    ///
    /// # Errors
    ///
    /// Returns `ScenarioError::FixtureNotFound` when the fixture directory,
    /// the fixture file or a `--from-dir` directory is missing.
    pub fn resolve(&self, fixtures_dir: &Utf8Path) -> Result<ResolvedScenario> {
        let base = fixtures_dir
            .canonicalize_utf8()
            .map_err(|_| ScenarioError::FixtureNotFound {
                path: fixtures_dir.to_owned(),
            })?;
        let fixture = existing_path(&base, self.fixture)?;
        let extra_args = self
            .extra_args
            .iter()
            .map(|arg| match arg {
                ExtraArg::FromDir(dir) => {
                    existing_path(&base, dir).map(|path| format!("--from-dir={path}"))
                }
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(ResolvedScenario {
            scenario: self.clone(),
            fixture,
            extra_args,
        })
    }
}

fn existing_path(base: &Utf8Path, relative: &str) -> Result<Utf8PathBuf> {
    let path = base.join(relative);
    if path.exists() {
        Ok(path)
    } else {
        Err(ScenarioError::FixtureNotFound { path }.into())
    }
}

/// A scenario bound to concrete fixture paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedScenario {
    /// The scenario definition.
    pub scenario: Scenario,
    /// Absolute path of the fixture file.
    pub fixture: Utf8PathBuf,
    /// Rendered extra build-start arguments.
    pub extra_args: Vec<String>,
}

/// Returns the full scenario table in execution order.
#[must_use]
pub fn scenarios() -> Vec<Scenario> {
    vec![
        Scenario {
            name: "postcommithook",
            description: "Build status postcommit hook failure",
            fixture: "statusfail-postcommithook.yaml",
            build_config: "statusfail-postcommithook",
            extra_args: &[],
            expected_reason: StatusReason::PostCommitHookFailed,
        },
        Scenario {
            name: "fetchsourcedocker",
            description: "Build status Docker fetch source failure",
            fixture: "statusfail-fetchsourcedocker.yaml",
            build_config: "statusfail-fetchsourcedocker",
            extra_args: &[],
            expected_reason: StatusReason::FetchSourceFailed,
        },
        Scenario {
            name: "fetchsources2i",
            description: "Build status fetch S2I source failure",
            fixture: "statusfail-fetchsources2i.yaml",
            build_config: "statusfail-fetchsourcesourcetoimage",
            extra_args: &[],
            expected_reason: StatusReason::FetchSourceFailed,
        },
        Scenario {
            name: "fetchbuilderimage",
            description: "Build status fetch builder image failure",
            fixture: "statusfail-fetchbuilderimage.yaml",
            build_config: "statusfail-builderimage",
            extra_args: &[],
            expected_reason: StatusReason::PullBuilderImageFailed,
        },
        Scenario {
            name: "pushtoregistry",
            description: "Build status push image to registry failure",
            fixture: "statusfail-pushtoregistry.yaml",
            build_config: "statusfail-pushtoregistry",
            extra_args: &[],
            expected_reason: StatusReason::PushImageToRegistryFailed,
        },
        Scenario {
            name: "failedassemble",
            description: "Build status failed assemble container",
            fixture: "statusfail-failedassemble.yaml",
            build_config: "statusfail-assemblescript",
            extra_args: &[ExtraArg::FromDir("statusfail-assemble")],
            expected_reason: StatusReason::AssembleFailed,
        },
    ]
}

/// Select scenarios by name, preserving table order.
///
/// An empty selection returns the whole table.
///
/// # Errors
///
/// Returns `ScenarioError::UnknownScenario` for the first name that does not
/// match any scenario.
pub fn select<S: AsRef<str>>(names: &[S]) -> Result<Vec<Scenario>> {
    let table = scenarios();
    if let Some(unknown) = names
        .iter()
        .map(AsRef::as_ref)
        .find(|name| !table.iter().any(|scenario| scenario.name == *name))
    {
        return Err(ScenarioError::UnknownScenario {
            name: unknown.to_owned(),
        }
        .into());
    }

    if names.is_empty() {
        return Ok(table);
    }

    Ok(table
        .into_iter()
        .filter(|scenario| names.iter().any(|name| name.as_ref() == scenario.name))
        .collect())
}
