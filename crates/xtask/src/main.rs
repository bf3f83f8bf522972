use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

/// Crates the domain crate must never depend on.
const DOMAIN_FORBIDDEN_DEPS: &[&str] = &[
    "tokio",
    "tracing-subscriber",
    "dashmap",
    "dotenvy",
    "rand",
    "moblevels-engine",
];

const DOMAIN_CRATE: &str = "moblevels-domain";

fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    match args.next().as_deref() {
        Some("arch-check") => arch_check(),
        Some(cmd) => anyhow::bail!("Unknown xtask command: {cmd}"),
        None => anyhow::bail!("Usage: cargo xtask <command>\n\nCommands:\n  arch-check"),
    }
}

#[derive(Debug, Deserialize)]
struct Metadata {
    packages: Vec<Package>,
}

#[derive(Debug, Deserialize)]
struct Package {
    name: String,
    manifest_path: String,
    dependencies: Vec<Dependency>,
}

#[derive(Debug, Deserialize)]
struct Dependency {
    name: String,
    kind: Option<String>,
}

fn arch_check() -> anyhow::Result<()> {
    let output = std::process::Command::new("cargo")
        .args(["metadata", "--format-version", "1", "--no-deps"])
        .output()
        .context("running cargo metadata")?;

    if !output.status.success() {
        anyhow::bail!("cargo metadata failed")
    }

    let metadata: Metadata =
        serde_json::from_slice(&output.stdout).context("parsing cargo metadata")?;
    let domain = metadata
        .packages
        .iter()
        .find(|p| p.name == DOMAIN_CRATE)
        .with_context(|| format!("{DOMAIN_CRATE} not found in workspace"))?;

    let mut violations = forbidden_dependencies(domain);

    let src_dir = Path::new(&domain.manifest_path)
        .parent()
        .context("domain manifest has no parent directory")?
        .join("src");
    violations.extend(forbidden_imports(&src_dir)?);

    if violations.is_empty() {
        println!("arch-check: ok");
        return Ok(());
    }
    for violation in &violations {
        eprintln!("arch-check: {violation}");
    }
    anyhow::bail!("{} architecture violation(s)", violations.len())
}

/// Normal (non-dev) dependencies of the domain crate on forbidden crates.
fn forbidden_dependencies(domain: &Package) -> Vec<String> {
    domain
        .dependencies
        .iter()
        .filter(|d| d.kind.as_deref() != Some("dev"))
        .filter(|d| DOMAIN_FORBIDDEN_DEPS.contains(&d.name.as_str()))
        .map(|d| format!("{DOMAIN_CRATE} depends on {}", d.name))
        .collect()
}

/// `use` statements in domain sources that reach into forbidden crates.
fn forbidden_imports(src_dir: &Path) -> anyhow::Result<Vec<String>> {
    let pattern = regex_lite::Regex::new(
        r"(?m)^\s*(?:pub\s+)?use\s+(tokio|tracing_subscriber|dashmap|dotenvy|rand|moblevels_engine)\b",
    )
    .context("compiling import pattern")?;

    let mut violations = Vec::new();
    let mut pending = vec![src_dir.to_path_buf()];
    while let Some(dir) = pending.pop() {
        for entry in std::fs::read_dir(&dir).with_context(|| format!("reading {}", dir.display()))? {
            let path = entry?.path();
            if path.is_dir() {
                pending.push(path);
                continue;
            }
            if path.extension().and_then(|e| e.to_str()) != Some("rs") {
                continue;
            }
            let source = std::fs::read_to_string(&path)
                .with_context(|| format!("reading {}", path.display()))?;
            for captures in pattern.captures_iter(&source) {
                if let Some(krate) = captures.get(1) {
                    violations.push(format!("{} imports {}", path.display(), krate.as_str()));
                }
            }
        }
    }
    Ok(violations)
}
