//! The scaffold pipeline: validate, resolve, fetch, transform, write, render.

use std::path::{Path, PathBuf};

use crate::address::Address;
use crate::config::RPC_URL_VAR;
use crate::context::ServiceContext;
use crate::error::{Error, Result};
use crate::flatten;
use crate::ports::{ContractMetadata, FileSystem};
use crate::proxy::{self, ProxyResolution, IMPLEMENTATION_SLOT};
use crate::scaffold::{self, ScaffoldError};
use crate::toolchain::{Toolchain, REQUIRED_COMMANDS};

/// Files `forge init` creates that a PoC project does not want.
const SKELETON_FILES: [&str; 3] = ["src/Counter.sol", "test/Counter.t.sol", "script/Counter.s.sol"];

/// Where `cast etherscan-source` unpacks before flattening.
const DOWNLOAD_DIR: &str = ".download";

/// Call graph, class diagram and storage layout, relative to the project.
pub const ASSETS: [&str; 3] =
    ["assets/call-graph.png", "assets/class-diagram.svg", "assets/storage-layout.svg"];

/// Inputs of one scaffold run.
#[derive(Debug, Clone)]
pub struct SetupRequest {
    /// Address given on the command line.
    pub address: Address,
    /// Destination folder override.
    pub folder: Option<String>,
    /// Directory the project folder is created in.
    pub base_dir: PathBuf,
}

/// What a successful run produced.
#[derive(Debug, Clone)]
pub struct SetupReport {
    /// Root of the new project.
    pub project_dir: PathBuf,
    /// Logic/data addresses.
    pub resolution: ProxyResolution,
    /// Explorer metadata of the logic contract.
    pub metadata: ContractMetadata,
    /// Implementation the explorer reports for the input address when it
    /// differs from the slot read.
    pub disputed_implementation: Option<Address>,
    /// Flattened files under `src/`.
    pub sources: Vec<String>,
    /// Generated test file.
    pub test_file: PathBuf,
    /// Rendered diagrams.
    pub assets: Vec<PathBuf>,
}

/// Runs the whole pipeline against the ports in `ctx`.
///
/// # Errors
///
/// Fails fast on the first missing command, existing destination, failed
/// external command, explorer error, flatten error or I/O error. Work done
/// before the failure is left on disk.
pub async fn run_with_context(ctx: &ServiceContext, request: &SetupRequest) -> Result<SetupReport> {
    let tools = Toolchain::new(ctx.shell.as_ref());
    tools.require_commands(&REQUIRED_COMMANDS)?;

    if let Some(folder) = &request.folder {
        ensure_absent(ctx.fs.as_ref(), &request.base_dir.join(folder))?;
    }

    // Resolve
    let resolution = resolve(&tools, &request.address)?;
    tracing::info!(
        logic = %resolution.logic,
        data = %resolution.data,
        proxy = resolution.is_proxy(),
        "resolved contract"
    );

    // Fetch
    let metadata = ctx
        .explorer
        .contract_metadata(&resolution.logic)
        .await
        .map_err(|e| Error::Explorer(e.to_string()))?;
    let input_metadata = if resolution.is_proxy() {
        lookup_proxy(ctx, &request.address).await
    } else {
        Some(metadata.clone())
    };
    let disputed_implementation =
        input_metadata.and_then(|meta| disputed_implementation(&resolution, &meta));
    if let Some(reported) = &disputed_implementation {
        tracing::warn!(
            input = %request.address,
            reported = %reported,
            slot = %resolution.logic,
            "explorer reports a different implementation than the EIP-1967 slot"
        );
    }
    tracing::info!(
        contract = %metadata.contract_name,
        compiler = %metadata.compiler_version,
        "found verified source"
    );

    let folder = request.folder.as_deref().unwrap_or(&metadata.contract_name);
    let project_dir = request.base_dir.join(folder);
    ensure_absent(ctx.fs.as_ref(), &project_dir)?;

    tools.forge_init(&project_dir)?;
    remove_skeleton(ctx.fs.as_ref(), &project_dir)?;

    let download_dir = project_dir.join(DOWNLOAD_DIR);
    tools.download_source(&resolution.logic, &download_dir)?;

    // Transform + write
    let src_dir = project_dir.join("src");
    let flat = flatten::flatten_dir(ctx.fs.as_ref(), &download_dir, &src_dir)?;
    let primary = scaffold::locate_primary(&flat, &metadata.contract_name)
        .ok_or_else(|| ScaffoldError::PrimaryNotFound(metadata.contract_name.clone()))?;

    let target = tools.checksum(&resolution.data)?;
    let test_file = scaffold::write_scaffold(
        ctx.fs.as_ref(),
        &project_dir,
        &primary.name,
        &metadata.contract_name,
        target.as_str(),
        RPC_URL_VAR,
    )?;

    // Render
    let assets = render_assets(
        ctx.fs.as_ref(),
        &tools,
        &project_dir,
        &metadata.contract_name,
        &resolution,
    )?;

    Ok(SetupReport {
        project_dir,
        resolution,
        sources: flat.into_iter().map(|f| f.name).collect(),
        metadata,
        disputed_implementation,
        test_file,
        assets,
    })
}

fn ensure_absent(fs: &dyn FileSystem, dir: &Path) -> Result<()> {
    if fs.exists(dir) {
        return Err(Error::DestinationExists(dir.to_path_buf()));
    }
    Ok(())
}

fn resolve(tools: &Toolchain<'_>, address: &Address) -> Result<ProxyResolution> {
    let word = tools.storage_at(address, IMPLEMENTATION_SLOT)?;
    proxy::resolve(address, &word).map_err(|_| Error::UnexpectedOutput {
        command: format!("cast storage {address} {IMPLEMENTATION_SLOT}"),
        output: word,
    })
}

/// Explorer metadata of the proxy itself. A failed lookup only skips the
/// cross-check.
async fn lookup_proxy(ctx: &ServiceContext, address: &Address) -> Option<ContractMetadata> {
    match ctx.explorer.contract_metadata(address).await {
        Ok(meta) => Some(meta),
        Err(err) => {
            tracing::warn!(%address, error = %err, "could not cross-check proxy on the explorer");
            None
        }
    }
}

/// The implementation `meta` reports for the input address, if the explorer
/// flags it as a proxy of something other than the slot's logic contract.
fn disputed_implementation(
    resolution: &ProxyResolution,
    meta: &ContractMetadata,
) -> Option<Address> {
    meta.implementation
        .as_ref()
        .filter(|reported| meta.proxy && !reported.same_as(&resolution.logic))
        .cloned()
}

fn remove_skeleton(fs: &dyn FileSystem, project_dir: &Path) -> Result<()> {
    for file in SKELETON_FILES {
        let path = project_dir.join(file);
        if fs.exists(&path) {
            fs.remove_file(&path)
                .map_err(|e| Error::io(format!("failed to remove {}", path.display()), e))?;
        }
    }
    Ok(())
}

fn render_assets(
    fs: &dyn FileSystem,
    tools: &Toolchain<'_>,
    project_dir: &Path,
    contract_name: &str,
    resolution: &ProxyResolution,
) -> Result<Vec<PathBuf>> {
    let src_dir = project_dir.join("src");
    let [call_graph, class_diagram, storage_layout] = ASSETS.map(|a| project_dir.join(a));

    let dot = tools.call_graph(&src_dir)?;
    let dot_file = call_graph.with_extension("dot");
    fs.write(&dot_file, &dot)
        .map_err(|e| Error::io(format!("failed to write {}", dot_file.display()), e))?;
    tools.render_png(&dot_file, &call_graph)?;
    fs.remove_file(&dot_file)
        .map_err(|e| Error::io(format!("failed to remove {}", dot_file.display()), e))?;

    tools.class_diagram(&src_dir, &class_diagram)?;
    tools.storage_diagram(&src_dir, contract_name, &resolution.data, &storage_layout)?;

    tracing::info!(dir = %project_dir.join("assets").display(), "rendered diagrams");
    Ok(vec![call_graph, class_diagram, storage_layout])
}
