//! CLI command implementations

use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use opsiclient::{
    ClientOptions, OpsiClient, OpsiError, PackageUploader, Product, ProductAction, ProductType,
};
use opsiconf::{ConfigSources, OpsiConfig};
use owo_colors::OwoColorize;
use serde::Serialize;

/// How results are printed.
#[derive(Debug, Clone, Copy)]
pub struct Output {
    pub json: bool,
}

impl Output {
    fn print<T: Serialize>(&self, value: &T, table: impl FnOnce(&T)) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            table(value);
        }
        Ok(())
    }
}

fn connect(config: &OpsiConfig) -> Result<OpsiClient> {
    let options = ClientOptions::new(
        config.server.endpoint.as_str(),
        config.server.username.as_str(),
        config.server.password.as_str(),
    )
    .accept_invalid_certs(config.server.accept_invalid_certs)
    .timeout(config.server.timeout());

    OpsiClient::with_options(options)
        .with_context(|| format!("Failed to set up client for {}", config.server.endpoint))
}

fn uploader(config: &OpsiConfig) -> Result<PackageUploader> {
    let uploader = PackageUploader::new(
        &config.webdav.url,
        &config.server.username,
        &config.server.password,
        config.server.accept_invalid_certs,
    )
    .with_context(|| format!("Failed to set up upload to {}", config.webdav.url))?;
    Ok(uploader.with_timeout(config.webdav.timeout()))
}

fn file_name(file: &Path) -> Result<&str> {
    match file.file_name().and_then(|name| name.to_str()) {
        Some(name) => Ok(name),
        None => bail!("{} has no usable file name", file.display()),
    }
}

fn dash(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("-")
}

/// Print backend version and modules
pub async fn info(config: &OpsiConfig, out: Output) -> Result<()> {
    let info = connect(config)?
        .backend()
        .info()
        .await
        .context("backend_info failed")?;

    out.print(&info, |info| {
        println!(
            "{} {}",
            "OPSI".bold(),
            info.opsi_version.as_deref().unwrap_or("unknown version")
        );
        if let Some(modules) = info.modules.as_ref().and_then(|m| m.as_object()) {
            let mut names: Vec<_> = modules.keys().collect();
            names.sort();
            for name in names {
                println!("  {} = {}", name, modules[name.as_str()]);
            }
        }
    })
}

/// List managed clients
pub async fn clients(config: &OpsiConfig, out: Output) -> Result<()> {
    let clients = match connect(config)?.hosts().get_clients().await {
        Ok(clients) => clients,
        Err(e) if e.is_not_found() => Vec::new(),
        Err(e) => return Err(e).context("Failed to list clients"),
    };

    out.print(&clients, |clients| {
        for host in clients {
            println!(
                "{:<40} {:<17} {}",
                host.id,
                dash(&host.hardware_address),
                dash(&host.description).dimmed()
            );
        }
    })
}

/// List products, optionally of one type
pub async fn products(
    config: &OpsiConfig,
    kind: Option<ProductType>,
    out: Output,
) -> Result<()> {
    let products = match connect(config)?.products().get_all(kind).await {
        Ok(products) => products,
        Err(e) if e.is_not_found() => Vec::new(),
        Err(e) => return Err(e).context("Failed to list products"),
    };

    out.print(&products, |products| {
        for product in products {
            let actions: Vec<&str> = product
                .available_actions()
                .iter()
                .map(|a| a.as_opsi_name())
                .collect();
            println!(
                "{:<30} {:<18} {:<14} {}",
                product.id.bold(),
                dash(&product.product_type),
                format!(
                    "{}-{}",
                    dash(&product.product_version),
                    dash(&product.package_version)
                ),
                actions.join(",")
            );
        }
    })
}

/// Show product state on one client
pub async fn client_products(config: &OpsiConfig, client_id: &str, out: Output) -> Result<()> {
    let assigned = match connect(config)?.products_on_client(client_id)?.get_all().await {
        Ok(assigned) => assigned,
        Err(e) if e.is_not_found() => Vec::new(),
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to list products of {}", client_id))
        }
    };

    out.print(&assigned, |assigned| {
        for poc in assigned {
            println!(
                "{:<30} {:<16} {:<14} {}",
                poc.product_id.bold(),
                dash(&poc.installation_status),
                dash(&poc.action_request),
                dash(&poc.action_result).dimmed()
            );
        }
    })
}

/// Request `action` for products on a client
pub async fn set_action(
    config: &OpsiConfig,
    client_id: &str,
    action: ProductAction,
    product_ids: &[String],
) -> Result<()> {
    let client = connect(config)?;
    let products = client.products();

    // Product types are needed to assign products the client lacks
    let mut targets: Vec<Product> = Vec::with_capacity(product_ids.len());
    for id in product_ids {
        let product = match products.get(id).await {
            Ok(product) => product,
            Err(OpsiError::NotFound { .. }) => bail!("Product {} does not exist", id),
            Err(e) => return Err(e).with_context(|| format!("Failed to look up {}", id)),
        };
        targets.push(product);
    }

    client
        .products_on_client(client_id)?
        .set_products_action(&targets, action)
        .await
        .with_context(|| format!("Failed to set {} on {}", action, client_id))?;

    println!(
        "{} {} requested for {} on {}",
        "✓".green(),
        action,
        product_ids.join(", "),
        client_id
    );
    Ok(())
}

/// Upload a package file to the share
pub async fn upload(config: &OpsiConfig, file: &Path, path_on_server: &str) -> Result<()> {
    let uploader = uploader(config)?;
    let name = file_name(file)?;

    uploader
        .upload_file(path_on_server, file)
        .await
        .with_context(|| format!("Failed to upload {}", file.display()))?;

    println!(
        "{} uploaded {}",
        "✓".green(),
        uploader.target_url(path_on_server, name)
    );
    Ok(())
}

/// Upload (unless staged already) and install a package
pub async fn install(
    config: &OpsiConfig,
    file: &Path,
    skip_upload: bool,
    timeout_secs: u64,
) -> Result<()> {
    let name = file_name(file)?;

    if !skip_upload {
        upload(config, file, "").await?;
    }

    let repository_path = config.webdav.repository_path(name);
    connect(config)?
        .depot()
        .install_package_with_timeout(&repository_path, Duration::from_secs(timeout_secs))
        .await
        .with_context(|| format!("Failed to install {}", repository_path))?;

    println!("{} installed {}", "✓".green(), repository_path);
    Ok(())
}

/// Remove a product's package from the depot
pub async fn uninstall(config: &OpsiConfig, product_id: &str, timeout_secs: u64) -> Result<()> {
    connect(config)?
        .depot()
        .uninstall_package_with_timeout(product_id, Duration::from_secs(timeout_secs))
        .await
        .with_context(|| format!("Failed to uninstall {}", product_id))?;

    println!("{} uninstalled {}", "✓".green(), product_id);
    Ok(())
}

/// Print the effective configuration
pub fn show_config(config: &OpsiConfig, sources: Option<&ConfigSources>) -> Result<()> {
    print!("{}", config.redacted().to_toml());

    if let Some(sources) = sources {
        println!();
        if sources.files.is_empty() {
            println!("# files: none (defaults)");
        }
        for file in &sources.files {
            println!("# file: {}", file.display());
        }
        for var in &sources.env_overrides {
            println!("# env: {}", var);
        }
    }
    Ok(())
}
