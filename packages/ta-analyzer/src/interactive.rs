//! Main interactive menu loop

use analyzer_core::{Place, TagFilter, DEFAULT_COORDINATES};
use anyhow::Result;
use console::style;
use dialoguer::{Input, Select};

use crate::commands;
use crate::context::AppContext;
use crate::services::Services;

/// Menu entries, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuAction {
    ShowAmenities,
    ShowAreaAmenities,
    Analyze,
    ExportMap,
    ChangeArea,
    ChangeRadius,
    Reset,
    Exit,
}

impl MenuAction {
    const ALL: [MenuAction; 8] = [
        Self::ShowAmenities,
        Self::ShowAreaAmenities,
        Self::Analyze,
        Self::ExportMap,
        Self::ChangeArea,
        Self::ChangeRadius,
        Self::Reset,
        Self::Exit,
    ];

    fn label(self) -> &'static str {
        match self {
            Self::ShowAmenities => "🏪 Show amenities",
            Self::ShowAreaAmenities => "🏘  Show village area amenities",
            Self::Analyze => "🤖 Analyze",
            Self::ExportMap => "🗺  Export map",
            Self::ChangeArea => "📍 Change test area",
            Self::ChangeRadius => "📏 Change radius",
            Self::Reset => "🧹 Reset session",
            Self::Exit => "🛑 Exit",
        }
    }
}

/// Run the interactive menu until the user exits.
///
/// With `choose_area` the user picks the test area before the first menu.
pub async fn run_interactive(
    ctx: &mut AppContext,
    services: &Services,
    choose_area: bool,
) -> Result<()> {
    if !ctx.quiet {
        println!();
        println!("{}", style("TA Analyzer").bold());
    }

    if choose_area {
        change_area(ctx)?;
    }

    let labels: Vec<&str> = MenuAction::ALL.iter().map(|a| a.label()).collect();

    loop {
        print_status(ctx);

        let choice = Select::with_theme(&ctx.theme())
            .with_prompt("What would you like to do?")
            .items(&labels)
            .default(0)
            .interact()?;

        let action = MenuAction::ALL[choice];
        tracing::debug!(?action, "Menu action");

        // Action failures are reported and the menu continues.
        let result = match action {
            MenuAction::ShowAmenities => show_amenities(ctx, services).await,
            MenuAction::ShowAreaAmenities => commands::fetch_area_amenities(ctx, services).await,
            MenuAction::Analyze => analyze(ctx, services).await,
            MenuAction::ExportMap => commands::export_map(ctx).map(|_| ()),
            MenuAction::ChangeArea => change_area(ctx),
            MenuAction::ChangeRadius => change_radius(ctx),
            MenuAction::Reset => {
                ctx.session.clear();
                ctx.print_success("✓ Session cleared");
                Ok(())
            }
            MenuAction::Exit => {
                println!("{}", style("👋 Goodbye!").blue());
                break;
            }
        };

        if let Err(e) = result {
            ctx.print_error(&format!("✗ {:#}", e));
        }
    }

    Ok(())
}

fn print_status(ctx: &AppContext) {
    if ctx.quiet {
        return;
    }
    let session = &ctx.session;
    println!();
    println!(
        "{} {}  {} {} m  {} {}",
        style("Area:").dim(),
        style(&session.place().name).bold(),
        style("Radius:").dim(),
        session.radius_m(),
        style("Batches:").dim(),
        session.batches().len(),
    );
    println!();
}

async fn show_amenities(ctx: &mut AppContext, services: &Services) -> Result<()> {
    let filters = ctx.config.amenity_filters()?;
    let mut labels: Vec<String> = filters.iter().map(TagFilter::to_string).collect();
    labels.push("Other tag...".to_string());

    let choice = Select::with_theme(&ctx.theme())
        .with_prompt("Amenity type")
        .items(&labels)
        .default(0)
        .interact()?;

    let filter = match filters.get(choice) {
        Some(filter) => filter.clone(),
        None => {
            let input: String = Input::with_theme(&ctx.theme())
                .with_prompt("Tag (value or key=value)")
                .validate_with(|s: &String| TagFilter::parse(s).map(|_| ()))
                .interact_text()?;
            TagFilter::parse(&input)?
        }
    };

    commands::fetch_amenities(ctx, services, std::slice::from_ref(&filter)).await
}

async fn analyze(ctx: &mut AppContext, services: &Services) -> Result<()> {
    let path = commands::analyze(ctx, services).await?;
    if ctx.confirm("Open the report?", true)? {
        if let Err(e) = open::that(&path) {
            ctx.print_warning(&format!("Could not open {}: {}", path.display(), e));
        }
    }
    Ok(())
}

fn change_area(ctx: &mut AppContext) -> Result<()> {
    let catalog = ctx.config.catalog();
    let mut labels: Vec<String> = catalog.names().iter().map(|n| n.to_string()).collect();
    labels.push("Custom coordinates...".to_string());

    let position = |place: &Place| catalog.places().iter().position(|p| p == place);
    let current = position(ctx.session.place())
        .or_else(|| catalog.default_village().and_then(position))
        .unwrap_or(labels.len() - 1);

    let choice = Select::with_theme(&ctx.theme())
        .with_prompt("Test area")
        .items(&labels)
        .default(current)
        .interact()?;

    let place = match catalog.places().get(choice) {
        Some(place) => place.clone(),
        None => custom_place(ctx)?,
    };

    let changed = &place != ctx.session.place();
    ctx.session.set_place(place);
    if changed {
        ctx.print_success(&format!(
            "✓ Test area set to {}; previous results cleared",
            ctx.session.place().name
        ));
    }
    Ok(())
}

fn custom_place(ctx: &AppContext) -> Result<Place> {
    let start = DEFAULT_COORDINATES;
    let lat: f64 = Input::with_theme(&ctx.theme())
        .with_prompt("Latitude")
        .default(start.lat)
        .validate_with(|v: &f64| in_range(*v, 90.0))
        .interact_text()?;
    let lon: f64 = Input::with_theme(&ctx.theme())
        .with_prompt("Longitude")
        .default(start.lon)
        .validate_with(|v: &f64| in_range(*v, 180.0))
        .interact_text()?;
    let name: String = Input::with_theme(&ctx.theme())
        .with_prompt("Name")
        .default(format!("{:.5}, {:.5}", lat, lon))
        .interact_text()?;

    Ok(Place::new(name, lat, lon))
}

fn in_range(value: f64, limit: f64) -> std::result::Result<(), String> {
    if value.is_finite() && value.abs() <= limit {
        Ok(())
    } else {
        Err(format!("must be between -{} and {}", limit, limit))
    }
}

fn change_radius(ctx: &mut AppContext) -> Result<()> {
    let radius: u32 = Input::with_theme(&ctx.theme())
        .with_prompt("Search radius in meters")
        .default(ctx.session.radius_m())
        .validate_with(|v: &u32| {
            if *v > 0 {
                Ok(())
            } else {
                Err("radius must be greater than zero")
            }
        })
        .interact_text()?;

    let changed = radius != ctx.session.radius_m();
    ctx.session.set_radius(radius);
    if changed {
        ctx.print_success(&format!(
            "✓ Radius set to {} m; previous results cleared",
            radius
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_order() {
        assert_eq!(MenuAction::ALL[0], MenuAction::ShowAmenities);
        assert_eq!(MenuAction::ALL[MenuAction::ALL.len() - 1], MenuAction::Exit);
    }

    #[test]
    fn test_in_range() {
        assert!(in_range(46.37, 90.0).is_ok());
        assert!(in_range(-180.0, 180.0).is_ok());
        assert!(in_range(90.5, 90.0).is_err());
        assert!(in_range(f64::NAN, 90.0).is_err());
    }
}
