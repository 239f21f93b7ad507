//! CLI Command Implementations
//!
//! Implements the actual logic for each CLI command.

use std::path::Path;
use std::sync::Arc;

use log::info;

use super::Commands;
use crate::access::{Access, Section, User};
use crate::config::Runtime;
use crate::error::{IndexLabError, Result};
use crate::formula::{Operation, OperationKind};
use crate::indices::IndexRequest;
use crate::layers::{Layer, LayerSpec};
use crate::session::AnalysisSession;

/// Dispatch one parsed command
pub fn run(runtime: &Runtime, command: Commands) -> Result<()> {
    match command {
        Commands::Bands => list_bands(runtime),
        Commands::Ramps => list_ramps(runtime),
        Commands::Indices => list_indices(runtime),
        Commands::Formula {
            operation,
            band_a,
            band_b,
            custom,
        } => generate_formula(
            runtime,
            operation,
            band_a.as_deref(),
            band_b.as_deref(),
            custom.as_deref(),
        ),
        Commands::Validate { formula } => validate_formula(runtime, &formula),
        Commands::Sections { user } => show_sections(runtime, user.as_deref()),
        Commands::Init { path } => init_session(runtime, &path),
        Commands::Layers { path } => list_layers(runtime, &path),
        Commands::AddRaster {
            path,
            name,
            formula,
            ramp,
            user,
        } => {
            let mut spec = LayerSpec::raster(name);
            spec.formula = formula;
            spec.color_ramp = ramp;
            mutate(runtime, &path, user.as_deref(), "Added", |session, user| {
                session.add_layer(user, spec)
            })
        }
        Commands::AddIndex { path, index, user } => {
            mutate(runtime, &path, user.as_deref(), "Added", |session, user| {
                session.add_index(user, &index)
            })
        }
        Commands::BuildIndex {
            path,
            name,
            operation,
            band_a,
            band_b,
            custom,
            ramp,
            user,
        } => {
            let request = IndexRequest {
                name,
                operation: Operation::from_kind(operation, custom.as_deref()),
                band_a,
                band_b,
                color_ramp: ramp,
            };
            mutate(runtime, &path, user.as_deref(), "Built", |session, user| {
                session.build_index(user, request)
            })
        }
        Commands::Toggle { path, id, user } => {
            mutate(runtime, &path, user.as_deref(), "Toggled", |session, user| {
                session.toggle_visibility(user, id)
            })
        }
        Commands::Remove { path, id, user } => {
            mutate(runtime, &path, user.as_deref(), "Removed", |session, user| {
                session.remove_layer(user, id)
            })
        }
    }
}

/// Print the band registry.
pub fn list_bands(runtime: &Runtime) -> Result<()> {
    println!(
        "{:<5} {:<22} {:>10} {:>8}  {}",
        "ID", "NAME", "WAVELENGTH", "RES", "COLOR"
    );
    for band in runtime.catalogs.bands.iter() {
        println!(
            "{:<5} {:<22} {:>8} nm {:>6} m  {}",
            band.id, band.name, band.wavelength_nm, band.resolution_m, band.display_color
        );
    }
    Ok(())
}

/// Print the color ramps.
pub fn list_ramps(runtime: &Runtime) -> Result<()> {
    for ramp in runtime.catalogs.ramps.iter() {
        println!("{:<12} {}", ramp.key, ramp.colors.join(" "));
    }
    Ok(())
}

/// Print the predefined indices.
pub fn list_indices(runtime: &Runtime) -> Result<()> {
    for index in runtime.catalogs.indices.list_indices() {
        let (min, max) = index.value_range;
        println!("{} - {}", index.name, index.description);
        println!("  Formula: {}", index.formula);
        println!("  Bands:   {}", index.bands_used.join(", "));
        println!("  Range:   [{}, {}]  Ramp: {}", min, max, index.color_ramp);
    }
    Ok(())
}

/// Generate a formula and report whether it validates.
pub fn generate_formula(
    runtime: &Runtime,
    kind: OperationKind,
    band_a: Option<&str>,
    band_b: Option<&str>,
    custom: Option<&str>,
) -> Result<()> {
    let operation = Operation::from_kind(kind, custom);
    let formula = match (operation.uses_bands(), band_a, band_b) {
        (false, _, _) => operation.formula("", ""),
        (true, Some(a), Some(b)) => operation.formula(a, b),
        (true, _, _) => {
            return Err(IndexLabError::invalid_spec(format!(
                "{} needs two bands",
                kind.label()
            )))
        }
    };

    println!("{}", formula);
    validate_formula(runtime, &formula)
}

/// Validate a formula against the band registry.
///
/// An invalid formula is reported as an `InvalidFormula` error so the
/// process exits non-zero.
pub fn validate_formula(runtime: &Runtime, formula: &str) -> Result<()> {
    let result = runtime.catalogs.bands.validate(formula);
    if !result.is_valid {
        return Err(IndexLabError::InvalidFormula {
            errors: result.errors,
        });
    }

    let bands: Vec<&str> = result.used_bands.iter().map(String::as_str).collect();
    println!("Valid formula (bands: {})", bands.join(", "));
    Ok(())
}

/// Print the sections a user can open.
pub fn show_sections(runtime: &Runtime, email: Option<&str>) -> Result<()> {
    let user = runtime.user(email)?;
    match user {
        Some(user) => println!("{} <{}> ({})", user.name, user.email, user.role),
        None => println!("Not signed in"),
    }

    for section in Section::ALL {
        let marker = if runtime.access.can_view(user, *section) {
            "[x]"
        } else {
            "[ ]"
        };
        let requirement = section
            .required_permission()
            .map(|p| format!(" (requires {})", p))
            .unwrap_or_default();
        println!("  {} {}{}", marker, section.label(), requirement);
    }
    Ok(())
}

/// Create an empty session file.
pub fn init_session(runtime: &Runtime, path: &Path) -> Result<()> {
    info!("Creating session at: {}", path.display());

    let session = runtime.new_session();
    session.save(path)?;

    println!("Session created: {}", path.display());
    println!("Session id: {}", session.id());
    Ok(())
}

/// Print the layers of a session.
pub fn list_layers(runtime: &Runtime, path: &Path) -> Result<()> {
    let session = load_session(runtime, path)?;
    let layers = session.list_layers();

    if layers.is_empty() {
        println!("No layers in session.");
        return Ok(());
    }

    println!("{:-<72}", "");
    for layer in &layers {
        println!("{}", describe(layer));
    }
    println!("{:-<72}", "");
    println!(
        "{} layers, {} visible",
        layers.len(),
        session.stack().visible_layers().len()
    );
    Ok(())
}

fn load_session(runtime: &Runtime, path: &Path) -> Result<AnalysisSession> {
    AnalysisSession::load(
        path,
        Arc::clone(&runtime.catalogs),
        Arc::clone(&runtime.access),
    )
}

/// Load, apply one gated mutation, and save only if it went through
fn mutate(
    runtime: &Runtime,
    path: &Path,
    email: Option<&str>,
    verb: &str,
    f: impl FnOnce(&mut AnalysisSession, Option<&User>) -> Result<Access<Layer>>,
) -> Result<()> {
    let user = runtime.user(email)?;
    let mut session = load_session(runtime, path)?;

    match f(&mut session, user)? {
        Access::Granted(layer) => {
            session.save(path)?;
            println!("{}: {}", verb, describe(&layer));
        }
        restricted => println!("{}", restricted),
    }
    Ok(())
}

fn describe(layer: &Layer) -> String {
    let mut line = format!(
        "#{:<3} {:<6} {:<7} {}",
        layer.id,
        layer.kind.to_string(),
        if layer.visible { "visible" } else { "hidden" },
        layer.name
    );
    if let Some(formula) = &layer.formula {
        line.push_str(&format!("  [{}]", formula));
    }
    if let Some(ramp) = &layer.color_ramp {
        line.push_str(&format!("  ({})", ramp));
    }
    line
}
