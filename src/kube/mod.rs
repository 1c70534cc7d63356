//! Kubernetes client module
//!
//! Builds a configured client from a kubeconfig file: either the path given
//! on the command line or the default `~/.kube/config` location. Proxy
//! settings (`proxy-url` entries, HTTP or SOCKS5) are honored by the client
//! itself.

use anyhow::{Context, Result};
use directories::BaseDirs;
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Client, Config};
use std::path::{Path, PathBuf};

/// Default kubeconfig location, `~/.kube/config`
pub fn default_kubeconfig_path() -> Result<PathBuf> {
    let base_dirs = BaseDirs::new().context("Could not determine home directory")?;
    Ok(base_dirs.home_dir().join(".kube").join("config"))
}

/// Initialize and return a Kubernetes client
///
/// Reads the kubeconfig at `kubeconfig` when given, falling back to the
/// default location otherwise. The file must exist; there is no in-cluster
/// fallback.
pub async fn create_client(kubeconfig: Option<PathBuf>) -> Result<Client> {
    let path = match kubeconfig {
        Some(path) => path,
        None => default_kubeconfig_path()?,
    };
    client_from_kubeconfig(&path).await
}

async fn client_from_kubeconfig(path: &Path) -> Result<Client> {
    if !path.is_file() {
        return Err(anyhow::anyhow!("can't read kubeconfig {}", path.display()));
    }

    let kubeconfig = Kubeconfig::read_from(path)
        .with_context(|| format!("can't read kubeconfig {}", path.display()))?;
    let config = Config::from_custom_kubeconfig(kubeconfig, &KubeConfigOptions::default())
        .await
        .with_context(|| format!("invalid kubeconfig {}", path.display()))?;
    let client = Client::try_from(config)?;
    Ok(client)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_path_points_into_the_home_directory() {
        let path = default_kubeconfig_path().unwrap();
        assert!(path.ends_with(".kube/config"));
    }

    #[tokio::test]
    async fn test_missing_kubeconfig_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing-config");

        let Err(err) = create_client(Some(path.clone())).await else {
            panic!("a missing kubeconfig must not produce a client");
        };
        assert!(
            err.to_string().contains("can't read kubeconfig"),
            "unexpected error: {err:#}"
        );
        assert!(err.to_string().contains(&path.display().to_string()));
    }
}
