//! Command handlers shared by the subcommands and the interactive menu.

use analyzer_core::{Coordinates, Place, PlaceCatalog, TagFilter};
use anyhow::{bail, Result};
use std::path::PathBuf;

use crate::actions::{self, Analysis, ShowOutcome};
use crate::context::AppContext;
use crate::map;
use crate::report::{report_file_name, write_pdf, ReportLayout};
use crate::services::Services;

/// Resolve the test area from CLI arguments.
///
/// Explicit coordinates win, then a catalog name, then the first catalog
/// place.
pub fn resolve_place(
    catalog: &PlaceCatalog,
    name: Option<&str>,
    coords: Option<(f64, f64)>,
) -> Result<Place> {
    if let Some((lat, lon)) = coords {
        if !Coordinates::new(lat, lon).is_valid() {
            bail!("coordinates out of range: {}, {}", lat, lon);
        }
        let label = name
            .map(str::to_string)
            .unwrap_or_else(|| format!("{:.5}, {:.5}", lat, lon));
        return Ok(Place::new(label, lat, lon));
    }

    match name {
        Some(name) => match catalog.find(name) {
            Some(place) => Ok(place.clone()),
            None => bail!(
                "unknown place {:?}; known places: {}",
                name,
                catalog.names().join(", ")
            ),
        },
        None => match catalog.places().first() {
            Some(place) => Ok(place.clone()),
            None => bail!("no places configured; pass --lat and --lon"),
        },
    }
}

/// `ta-analyzer places`
pub fn list_places(catalog: &PlaceCatalog) {
    for place in catalog.places() {
        println!("{:<32} {}", place.name, place.location);
    }
}

/// Fetch each filter and print what was found. Fetch errors are reported
/// and skipped.
pub async fn fetch_amenities(
    ctx: &mut AppContext,
    services: &Services,
    filters: &[TagFilter],
) -> Result<()> {
    ctx.print_header(&format!(
        "Amenities within {} m of {}",
        ctx.session.radius_m(),
        ctx.session.place().name
    ));

    for filter in filters {
        match actions::show_amenities(&mut ctx.session, &services.geo, filter).await {
            Ok(ShowOutcome::Found { filter, entities }) => {
                ctx.print_success(&format!("✓ {}: {} found", filter, entities));
            }
            Ok(ShowOutcome::Empty(filter)) => {
                ctx.print_warning(&format!("No amenities of type {} found", filter));
            }
            Err(e) => {
                ctx.print_error(&format!("✗ {}: {}", filter, e));
            }
        }
    }

    if !ctx.quiet {
        ctx.print_counts(&ctx.session.counts());
    }
    Ok(())
}

/// Fetch every amenity inside the place's administrative area.
pub async fn fetch_area_amenities(ctx: &mut AppContext, services: &Services) -> Result<()> {
    let area = ctx.session.place().short_name().to_string();
    ctx.print_header(&format!("Amenities in the {} area", area));

    match actions::show_area_amenities(&mut ctx.session, &services.geo).await {
        Ok(0) => ctx.print_warning(&format!("No amenities found in {}", area)),
        Ok(_) => ctx.print_counts(&ctx.session.counts()),
        Err(e) => ctx.print_error(&format!("✗ {}: {}", area, e)),
    }
    Ok(())
}

/// Run the assessment, print it and write the PDF report.
///
/// Returns the report path.
pub async fn analyze(ctx: &AppContext, services: &Services) -> Result<PathBuf> {
    let chat = services.chat()?;

    ctx.print_info(&format!(
        "Asking for an assessment of {}...",
        ctx.session.place().name
    ));

    let analysis = actions::analyze(&ctx.session, &services.geo, chat).await?;
    print_analysis(ctx, &analysis);

    let path = write_report(ctx, &analysis)?;
    ctx.print_success(&format!("✓ Report written to {}", path.display()));
    Ok(path)
}

fn print_analysis(ctx: &AppContext, analysis: &Analysis) {
    if analysis.unfiltered {
        ctx.print_info("Counted every amenity in the radius.");
    }
    ctx.print_header("Assessment");
    println!("{}", analysis.response);
}

fn write_report(ctx: &AppContext, analysis: &Analysis) -> Result<PathBuf> {
    let layout = ReportLayout::from_config(&ctx.config.report);
    let place = ctx.session.place().short_name();
    let path = ctx.config.report.output_dir.join(report_file_name(place));
    let title = format!("AI Analysis - {}", place);
    write_pdf(&analysis.response, &layout, &title, &path)
}

/// Write the GeoJSON map of everything fetched so far.
pub fn export_map(ctx: &AppContext) -> Result<PathBuf> {
    let (path, count) = map::export_map(&ctx.session, &ctx.config.report.output_dir)?;
    if count == 0 {
        ctx.print_warning("No amenities with a location to put on the map.");
    }
    ctx.print_success(&format!("✓ Map with {} markers written to {}", count, path.display()));
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_by_name() {
        let catalog = PlaceCatalog::builtin();
        let place = resolve_place(&catalog, Some("terzolas"), None).unwrap();
        assert_eq!(place.short_name(), "Terzolas");
    }

    #[test]
    fn test_resolve_defaults_to_first_place() {
        let catalog = PlaceCatalog::builtin();
        let place = resolve_place(&catalog, None, None).unwrap();
        assert_eq!(&place, &catalog.places()[0]);
    }

    #[test]
    fn test_resolve_coordinates() {
        let catalog = PlaceCatalog::builtin();
        let place = resolve_place(&catalog, None, Some((48.36964, 14.5128))).unwrap();
        assert_eq!(place.location, Coordinates::new(48.36964, 14.5128));
        assert_eq!(place.name, "48.36964, 14.51280");

        let named = resolve_place(&catalog, Some("Home"), Some((1.0, 2.0))).unwrap();
        assert_eq!(named.name, "Home");
    }

    #[test]
    fn test_resolve_rejects_bad_input() {
        let catalog = PlaceCatalog::builtin();
        assert!(resolve_place(&catalog, Some("Atlantis"), None).is_err());
        assert!(resolve_place(&catalog, None, Some((91.0, 0.0))).is_err());
        assert!(resolve_place(&PlaceCatalog::empty(), None, None).is_err());
    }
}
