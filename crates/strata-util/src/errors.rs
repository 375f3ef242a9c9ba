use miette::Diagnostic;
use thiserror::Error;

/// Unified error type for all Strata operations.
#[derive(Debug, Error, Diagnostic)]
pub enum StrataError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A version string could not be parsed.
    #[error("Could not parse version number: {input}")]
    #[diagnostic(help("Versions look like `1.10`, `1.10.2`, or `1.10 (Beta 4)`"))]
    MalformedVersion { input: String },

    /// A raw dependency spec matches no known dependency shape.
    #[error("Unable to parse dependency: {message}")]
    #[diagnostic(help("Check the dependency entries in your strata.toml"))]
    DependencyParse { message: String },

    /// A remote project's own declared dependency could not be parsed.
    #[error("Unable to flatten dependency {dependency}: a transitive dependency could not be parsed: {message}")]
    TransitiveParse { dependency: String, message: String },

    /// Flatten was called on a dependency that has not been resolved.
    #[error("Dependency {dependency} is not resolved and cannot be flattened")]
    NotResolved { dependency: String },

    /// A managed reference resolved without finding a package release.
    #[error("Could not find a package for {dependency}")]
    NoPackageFound { dependency: String },

    /// A user-supplied pin contradicts an explicit tag on the dependency.
    #[error("A pin is specified for {url}, but the dependency already has a tag specified ({tag})")]
    #[diagnostic(help("Remove either the pin or the dependency's explicit tag"))]
    ConflictingPin { url: String, tag: String },

    /// No resolution strategy produced a ref for a dependency.
    #[error("Unable to resolve dependency {dependency}")]
    UnresolvedDependency { dependency: String },

    /// The fixed-point loop failed to stabilize within the iteration bound.
    #[error("Dependency resolution did not stabilize after {iterations} iterations; still pending: {pending}")]
    #[diagnostic(help(
        "This usually indicates a cycle in the remote dependency graph"
    ))]
    ResolutionIterationLimit { iterations: u32, pending: String },

    /// A single resolution strategy failed (e.g. tag not found). The engine
    /// logs these and moves on to the next strategy.
    #[error("Dependency resolution failed: {message}")]
    Resolution { message: String },

    /// VCS host request failed.
    #[error("VCS error: {message}")]
    Vcs { message: String },

    /// Invalid or missing configuration (e.g. strata.toml).
    #[error("Configuration error: {message}")]
    #[diagnostic(help("Check your strata.toml for syntax errors"))]
    Config { message: String },
}

/// Convenience alias for `miette::Result<T>`.
pub type StrataResult<T> = miette::Result<T>;
